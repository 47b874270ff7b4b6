use object_store::path::{DELIMITER, Path};
use shared_types::ObjectAddress;

/// Resolve an address to a backend path, rejecting anything that would not
/// round-trip to the same `container/key`.
pub(crate) fn object_path(address: &ObjectAddress) -> Result<Path, String> {
    if address.container.is_empty() {
        return Err("container name is empty".to_string());
    }
    if address.container.contains(DELIMITER) {
        return Err(format!(
            "container name {:?} must not contain '{DELIMITER}'",
            address.container
        ));
    }
    if address.key.is_empty() {
        return Err("object key is empty".to_string());
    }
    if address.key.starts_with(DELIMITER) || address.key.ends_with(DELIMITER) {
        return Err(format!(
            "object key {:?} must not start or end with '{DELIMITER}'",
            address.key
        ));
    }

    Path::parse(address.to_path()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(container: &str, key: &str) -> Result<Path, String> {
        object_path(&ObjectAddress::new(container, key))
    }

    #[test]
    fn test_valid_addresses() {
        assert_eq!(parse("images", "cat.png").unwrap().as_ref(), "images/cat.png");
        assert_eq!(
            parse("images", "2024/cats/cat.png").unwrap().as_ref(),
            "images/2024/cats/cat.png"
        );
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert!(parse("", "cat.png").is_err());
        assert!(parse("images", "").is_err());
        assert!(parse("images", "cats//cat.png").is_err());
    }

    #[test]
    fn test_rejects_ambiguous_parts() {
        assert!(parse("im/ages", "cat.png").is_err());
        assert!(parse("images", "/cat.png").is_err());
        assert!(parse("images", "cats/").is_err());
        assert!(parse("images", "../cat.png").is_err());
        assert!(parse("..", "cat.png").is_err());
    }
}
