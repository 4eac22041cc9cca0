use rand::RngCore;

const KEY_PREFIX: &str = "ak_";
const KEY_BYTES: usize = 16;

/// Tenant API key: fixed ASCII prefix plus 32 lowercase hex characters
/// derived from 16 random bytes.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{KEY_PREFIX}{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_fixed_prefix_and_length() {
        let key = generate_api_key();
        assert!(key.starts_with("ak_"));
        assert_eq!(key.len(), 35);
        assert!(key[3..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn keys_are_unique_in_practice() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
    }
}
