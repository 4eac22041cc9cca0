/// Stable machine code plus the HTTP status every occurrence maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub http_status: u16,
}

/// Malformed request shape: bad multipart, oversize body, missing field.
pub const REQUEST_SCHEMA: ErrorCode = ErrorCode {
    code: "REQUEST.SCHEMA",
    http_status: 400,
};

/// Wrong HTTP method for the route.
pub const REQUEST_METHOD: ErrorCode = ErrorCode {
    code: "REQUEST.METHOD",
    http_status: 405,
};

/// Missing, unknown, or revoked credential.
pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode {
    code: "AUTH.UNAUTHENTICATED",
    http_status: 401,
};

/// Check identifier outside the closed catalog. Deliberately a 400:
/// the route exists, the identifier does not.
pub const CATALOG_NOT_FOUND: ErrorCode = ErrorCode {
    code: "CATALOG.NOT_FOUND",
    http_status: 400,
};

/// Upstream classifier transport/quota/timeout failure.
pub const PROVIDER_UNAVAILABLE: ErrorCode = ErrorCode {
    code: "PROVIDER.UNAVAILABLE",
    http_status: 500,
};

pub const STORAGE_CONFLICT: ErrorCode = ErrorCode {
    code: "STORAGE.CONFLICT",
    http_status: 409,
};

pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode {
    code: "STORAGE.NOT_FOUND",
    http_status: 404,
};

pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode {
    code: "UNKNOWN.INTERNAL",
    http_status: 500,
};
