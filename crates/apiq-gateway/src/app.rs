use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use apiq_catalog::prelude::{normalize, Catalog, ResponseShape};
use apiq_errors::prelude::ErrorObj;
use apiq_llm::prelude::infer_mime;
use apiq_storage::prelude::ApiKeyRecord;
use apiq_types::prelude::is_valid_project_number;

use crate::state::AppState;

/// Hard ceiling on any multipart body. Requests over this are rejected
/// before the photo ever reaches the classifier.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const MAX_BATCH_PHOTOS: usize = 5;

pub fn router(state: AppState) -> Router {
    let tenant = Router::new()
        .route("/api/laundry/silver/v1/{check_id}", post(silver_check))
        .route("/api/laundry/gold/v1/{*tail}", post(gold_check))
        .route("/analytics", get(tenant_analytics))
        .route_layer(middleware::from_fn_with_state(state.clone(), tenant_gate));

    let admin = Router::new()
        .route("/admin/companies", get(admin_companies))
        .route("/admin/api-keys", post(admin_create_key))
        .route("/admin/api-keys/{key}/deactivate", post(admin_deactivate_key))
        .route("/admin/analytics", get(admin_analytics))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate));

    Router::new()
        .route("/health", get(health))
        .route("/quality-check", post(quality_check))
        .route("/admin/login", post(admin_login))
        .merge(tenant)
        .merge(admin)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

// ---- Error rendering ----------------------------------------------------

fn error_response(err: &ErrorObj) -> Response {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.user_msg }))).into_response()
}

/// Diagnostics variant for the anonymous route only: the dev message
/// is surfaced alongside the user message.
fn verbose_error_response(err: &ErrorObj) -> Response {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = json!({ "error": err.user_msg });
    if let Some(detail) = err.dev_msg.as_deref() {
        body["detail"] = json!(detail);
    }
    (status, Json(body)).into_response()
}

fn schema_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn unknown_check_response(catalog: &Catalog, check_id: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": format!("Unknown check: {check_id}"),
            "valid_checks": catalog.ids(),
        })),
    )
        .into_response()
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

// ---- Multipart intake ---------------------------------------------------

struct PhotoPart {
    filename: String,
    content_type: Option<String>,
    bytes: axum::body::Bytes,
}

#[derive(Default)]
struct FormData {
    texts: std::collections::HashMap<String, String>,
    photos: std::collections::HashMap<String, PhotoPart>,
}

fn multipart_error_response(err: &MultipartError) -> Response {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        schema_error("File too large, maximum 10MB allowed")
    } else {
        schema_error(&format!("Invalid form data: {err}"))
    }
}

/// Drain the multipart stream into memory. A part with a filename is a
/// photo; everything else is a text field.
async fn collect_form(mut multipart: Multipart) -> Result<FormData, Response> {
    let mut form = FormData::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(multipart_error_response(&err)),
        };
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() || name.starts_with("photo") {
            let filename = field.file_name().unwrap_or("upload.jpg").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|err| multipart_error_response(&err))?;
            form.photos.insert(
                name,
                PhotoPart {
                    filename,
                    content_type,
                    bytes,
                },
            );
        } else {
            let text = field
                .text()
                .await
                .map_err(|err| multipart_error_response(&err))?;
            form.texts.insert(name, text);
        }
    }
    Ok(form)
}

fn open_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, Response> {
    multipart.map_err(|_| schema_error("Must send multipart/form-data, not regular JSON"))
}

// ---- Health -------------------------------------------------------------

async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

// ---- Anonymous quality check --------------------------------------------

fn build_prompt(description: &str, language: Option<&str>) -> String {
    let mut prompt = format!(
        "Analyze this installation photo. Requirements: {description}\n\nRespond with exactly: 'PASS: [reason]' or 'FAIL: [reason]'"
    );
    if let Some(language) = language {
        let language = language.trim();
        if !language.is_empty() {
            prompt.push_str(&format!(" Answer in {language}."));
        }
    }
    prompt
}

async fn quality_check(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match open_form(multipart) {
        Ok(multipart) => multipart,
        Err(response) => return response,
    };
    let form = match collect_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    if form.photos.contains_key("photo") {
        quality_check_single(&state, &form).await
    } else if form.photos.contains_key("photo1") {
        quality_check_batch(&state, &form).await
    } else {
        schema_error("No photo found in request")
    }
}

async fn quality_check_single(state: &AppState, form: &FormData) -> Response {
    let Some(photo) = form.photos.get("photo") else {
        return schema_error("No photo found in request");
    };
    let description = form.texts.get("description").map(String::as_str).unwrap_or("");
    if description.trim().is_empty() {
        return schema_error("No description found in request");
    }

    let prompt = build_prompt(description, form.texts.get("language").map(String::as_str));
    let mime = infer_mime(photo.content_type.as_deref(), &photo.filename);

    let raw = match state.classifier.classify(&prompt, &photo.bytes, &mime).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "anonymous classification failed");
            return verbose_error_response(&err.0);
        }
    };
    let outcome = normalize(&raw, ResponseShape::Prefixed);

    info!(result = outcome.verdict.as_str(), "quality check classified");
    Json(json!({
        "result": outcome.verdict,
        "reason": outcome.reason,
        "description": description,
        "filename": photo.filename,
        "filesize": format!("{} bytes", photo.bytes.len()),
    }))
    .into_response()
}

async fn quality_check_batch(state: &AppState, form: &FormData) -> Response {
    // Scanning stops at the first missing numbered photo; descriptions
    // are validated for the whole batch before any upstream call.
    let mut batch: Vec<(String, &PhotoPart, &str)> = Vec::new();
    for index in 1..=MAX_BATCH_PHOTOS {
        let photo_field = format!("photo{index}");
        let Some(photo) = form.photos.get(&photo_field) else {
            break;
        };
        let description_field = format!("description{index}");
        let description = form
            .texts
            .get(&description_field)
            .map(String::as_str)
            .unwrap_or("");
        if description.trim().is_empty() {
            return schema_error(&format!("Missing {description_field} for {photo_field}"));
        }
        batch.push((photo_field, photo, description));
    }

    let language = form.texts.get("language").map(String::as_str);
    let mut results = Vec::with_capacity(batch.len());
    for (photo_field, photo, description) in &batch {
        let prompt = build_prompt(description, language);
        let mime = infer_mime(photo.content_type.as_deref(), &photo.filename);
        match state.classifier.classify(&prompt, &photo.bytes, &mime).await {
            Ok(raw) => {
                let outcome = normalize(&raw, ResponseShape::Prefixed);
                results.push(json!({
                    "photo": photo_field,
                    "result": outcome.verdict,
                    "reason": outcome.reason,
                    "description": description,
                    "filename": photo.filename,
                    "filesize": format!("{} bytes", photo.bytes.len()),
                }));
            }
            Err(err) => {
                warn!(photo = %photo_field, error = %err, "batch item classification failed");
                results.push(json!({
                    "photo": photo_field,
                    "error": err.0.user_msg,
                }));
            }
        }
    }

    Json(json!({
        "results": results,
        "count": results.len(),
    }))
    .into_response()
}

// ---- Tenant tiers -------------------------------------------------------

async fn silver_check(
    State(state): State<AppState>,
    Path(check_id): Path<String>,
    Extension(tenant): Extension<ApiKeyRecord>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Some(check) = state.catalog.lookup(&check_id) else {
        return unknown_check_response(&state.catalog, &check_id);
    };
    let multipart = match open_form(multipart) {
        Ok(multipart) => multipart,
        Err(response) => return response,
    };
    let form = match collect_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(photo) = form.photos.get("photo") else {
        return schema_error("No photo found in request");
    };

    let instruction = check.instruction(ResponseShape::SingleToken);
    let mime = infer_mime(photo.content_type.as_deref(), &photo.filename);
    let raw = match state.classifier.classify(&instruction, &photo.bytes, &mime).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(check = %check_id, error = %err, "silver classification failed");
            return error_response(&err.0);
        }
    };
    let outcome = normalize(&raw, ResponseShape::SingleToken);

    if let Err(err) = state.meter.record(&tenant.api_key).await {
        warn!(error = %err, "usage metering failed");
        return error_response(&err.0);
    }

    info!(check = %check_id, result = outcome.verdict.as_str(), "silver check classified");
    Json(json!({ "result": outcome.verdict })).into_response()
}

async fn gold_check(
    State(state): State<AppState>,
    Path(tail): Path<String>,
    Extension(tenant): Extension<ApiKeyRecord>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Wildcard route with a manual split so a wrong segment count is a
    // shape error, not a router miss.
    let segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() != 2 || tail.split('/').count() != 2 {
        return schema_error(
            "Expected path: /api/laundry/gold/v1/<projectNumber>/<checkId>",
        );
    }
    let (project_number, check_id) = (segments[0], segments[1]);

    if !is_valid_project_number(project_number) {
        return schema_error("Invalid project number format");
    }
    let Some(check) = state.catalog.lookup(check_id) else {
        return unknown_check_response(&state.catalog, check_id);
    };

    let multipart = match open_form(multipart) {
        Ok(multipart) => multipart,
        Err(response) => return response,
    };
    let form = match collect_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };
    let Some(photo) = form.photos.get("photo") else {
        return schema_error("No photo found in request");
    };

    let instruction = check.instruction(ResponseShape::TokenPlusReason);
    let mime = infer_mime(photo.content_type.as_deref(), &photo.filename);
    let raw = match state.classifier.classify(&instruction, &photo.bytes, &mime).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(check = %check_id, error = %err, "gold classification failed");
            return error_response(&err.0);
        }
    };
    let outcome = normalize(&raw, ResponseShape::TokenPlusReason);

    if let Err(err) = state.meter.record(&tenant.api_key).await {
        warn!(error = %err, "usage metering failed");
        return error_response(&err.0);
    }

    info!(
        check = %check_id,
        project = %project_number,
        result = outcome.verdict.as_str(),
        "gold check classified"
    );
    Json(json!({
        "result": outcome.verdict,
        "projectNumber": project_number,
        "reason": outcome.reason,
    }))
    .into_response()
}

async fn tenant_analytics(
    State(state): State<AppState>,
    Extension(tenant): Extension<ApiKeyRecord>,
) -> Response {
    match state
        .analytics
        .for_tenant(&tenant.api_key, state.window_months)
        .await
    {
        Ok(buckets) => Json(json!({
            "company_name": tenant.company_name,
            "analytics": buckets,
            "period": format!("{} months", state.window_months),
        }))
        .into_response(),
        Err(err) => error_response(&err.0),
    }
}

// ---- Admin --------------------------------------------------------------

#[derive(Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct CreateKeyPayload {
    company_name: String,
}

async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(_) => return schema_error("Invalid JSON"),
    };
    match state.admin.login(&payload.username, &payload.password) {
        Ok(token) => Json(json!({ "token": token })).into_response(),
        Err(err) => error_response(&err.0),
    }
}

async fn admin_companies(State(state): State<AppState>) -> Response {
    match state.keys.list_all().await {
        Ok(records) => {
            let companies: Vec<_> = records
                .iter()
                .map(|record| {
                    json!({
                        "api_key": record.api_key,
                        "company_name": record.company_name,
                        "created_at": record.created_at.to_rfc3339(),
                        "is_active": record.is_active,
                    })
                })
                .collect();
            Json(json!({
                "total": companies.len(),
                "companies": companies,
            }))
            .into_response()
        }
        Err(err) => error_response(&err.0),
    }
}

async fn admin_create_key(
    State(state): State<AppState>,
    payload: Result<Json<CreateKeyPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(_) => return schema_error("Invalid JSON"),
    };
    if payload.company_name.trim().is_empty() {
        return schema_error("Company name is required");
    }
    match state.keys.issue(payload.company_name.trim()).await {
        Ok(record) => {
            info!(company = %record.company_name, "api key issued");
            (
                StatusCode::CREATED,
                Json(json!({
                    "api_key": record.api_key,
                    "company_name": record.company_name,
                    "created_at": record.created_at.to_rfc3339(),
                })),
            )
                .into_response()
        }
        Err(err) => error_response(&err.0),
    }
}

async fn admin_deactivate_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Response {
    match state.keys.deactivate(&key).await {
        Ok(record) => {
            info!(company = %record.company_name, "api key deactivated");
            Json(json!({
                "api_key": record.api_key,
                "is_active": record.is_active,
            }))
            .into_response()
        }
        Err(err) => error_response(&err.0),
    }
}

async fn admin_analytics(State(state): State<AppState>) -> Response {
    match state.analytics.all_tenants(state.window_months).await {
        Ok(stats) => Json(json!({
            "analytics": stats,
            "period": format!("{} months", state.window_months),
        }))
        .into_response(),
        Err(err) => error_response(&err.0),
    }
}

// ---- Auth middleware ----------------------------------------------------

async fn tenant_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(api_key) = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "API key required. Add 'X-API-Key' header to your request."
            })),
        )
            .into_response();
    };

    match state.keys.resolve_active(&api_key).await {
        Ok(Some(record)) => {
            request.extensions_mut().insert(record);
            next.run(request).await
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid API key" })),
        )
            .into_response(),
        Err(err) => error_response(&err.0),
    }
}

async fn admin_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    let Some(token) = token else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Admin token required. Add 'Authorization: Bearer <token>' header."
            })),
        )
            .into_response();
    };

    match state.admin.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => error_response(&err.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_description_and_optional_language() {
        let prompt = build_prompt("Check the drain hose", None);
        assert!(prompt.contains("Requirements: Check the drain hose"));
        assert!(prompt.contains("'PASS: [reason]' or 'FAIL: [reason]'"));
        assert!(!prompt.contains("Answer in"));

        let prompt = build_prompt("Check the drain hose", Some("German"));
        assert!(prompt.ends_with("Answer in German."));
    }

    #[test]
    fn blank_language_is_ignored() {
        let prompt = build_prompt("Check the tap", Some("  "));
        assert!(!prompt.contains("Answer in"));
    }
}
