const PROJECT_NUMBER_MAX_LEN: usize = 50;

/// Tenant-supplied project identifiers must match `[A-Za-z0-9_-]{1,50}`.
pub fn is_valid_project_number(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= PROJECT_NUMBER_MAX_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_identifier() {
        assert!(is_valid_project_number("ABC-123_x"));
    }

    #[test]
    fn rejects_empty_and_oversize() {
        assert!(!is_valid_project_number(""));
        assert!(!is_valid_project_number(&"a".repeat(51)));
        assert!(is_valid_project_number(&"a".repeat(50)));
    }

    #[test]
    fn rejects_path_characters() {
        assert!(!is_valid_project_number("abc/def"));
        assert!(!is_valid_project_number("abc def"));
        assert!(!is_valid_project_number("abc.def"));
    }
}
