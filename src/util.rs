/// Lowercase a message for command lookup. No trimming: "مساعدة " does not
/// match "مساعدة".
pub fn normalize_command(text: &str) -> String {
    text.to_lowercase()
}

/// Concatenate the configured base URL and a relative asset path.
/// The base is used verbatim, only a doubled slash at the seam is avoided.
pub fn asset_url(host: &str, path: &str) -> String {
    match (host.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", host, &path[1..]),
        (false, false) => format!("{}/{}", host, path),
        _ => format!("{}{}", host, path),
    }
}

/// Storage key for per-user state, scoped by channel like the Bot Framework
/// user state store.
pub fn user_storage_key(channel_id: &str, user_id: &str) -> String {
    format!("{}/users/{}", channel_id, user_id)
}

/// Random id for outbound activities that the channel did not assign.
pub fn new_activity_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_command_lowercases() {
        assert_eq!(normalize_command("HELP"), "help");
        assert_eq!(normalize_command("Typing 1"), "typing 1");
    }

    #[test]
    fn test_normalize_command_keeps_arabic_and_whitespace() {
        assert_eq!(normalize_command("مساعدة"), "مساعدة");
        assert_eq!(normalize_command(" مساعدة "), " مساعدة ");
    }

    #[test]
    fn test_asset_url() {
        assert_eq!(
            asset_url("http://localhost:3978", "/assets/1.jpg"),
            "http://localhost:3978/assets/1.jpg"
        );
        assert_eq!(
            asset_url("http://localhost:3978/", "/assets/1.jpg"),
            "http://localhost:3978/assets/1.jpg"
        );
        assert_eq!(
            asset_url("http://localhost:3978", "assets/1.jpg"),
            "http://localhost:3978/assets/1.jpg"
        );
    }

    #[test]
    fn test_user_storage_key() {
        assert_eq!(user_storage_key("emulator", "u1"), "emulator/users/u1");
    }

    #[test]
    fn test_new_activity_id_format() {
        let id = new_activity_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
