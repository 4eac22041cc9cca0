/// Resolve the image MIME type for an uploaded part: a declared
/// content type wins; otherwise infer from the filename suffix with
/// JPEG as the default.
pub fn infer_mime(declared: Option<&str>, filename: &str) -> String {
    if let Some(declared) = declared {
        let declared = declared.trim();
        if !declared.is_empty() {
            return declared.to_string();
        }
    }

    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png".to_string()
    } else if lower.ends_with(".webp") {
        "image/webp".to_string()
    } else {
        "image/jpeg".to_string()
    }
}
