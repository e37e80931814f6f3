//! Shared key generation for storage backends.
//!
//! Key format: `generations/{user_id}/{filename}`.

/// Generate a storage key for the given user and filename.
///
/// All backends must use this format for consistency. User ids are opaque
/// strings owned by the identity provider; path separators are replaced so a
/// hostile id can never change the key layout.
pub fn generate_storage_key(user_id: &str, filename: &str) -> String {
    let safe_user: String = user_id
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '.' { '_' } else { c })
        .collect();
    format!("generations/{}/{}", safe_user, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(
            generate_storage_key("user_2abc", "img.png"),
            "generations/user_2abc/img.png"
        );
    }

    #[test]
    fn test_hostile_user_id_cannot_traverse() {
        let key = generate_storage_key("../../etc", "passwd");
        assert!(!key.contains(".."));
        assert!(key.starts_with("generations/"));
    }
}
