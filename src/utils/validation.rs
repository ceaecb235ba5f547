//! Input validation utilities

/// Maximum source code size accepted for run or submit (64KB)
const MAX_SOURCE_CODE_SIZE: usize = 64 * 1024;

/// Validate source code before it is sent anywhere
pub fn validate_source_code(code: &str) -> Result<(), &'static str> {
    if code.trim().is_empty() {
        return Err(crate::constants::messages::EMPTY_CODE);
    }
    if code.len() > MAX_SOURCE_CODE_SIZE {
        return Err("Source code exceeds maximum size of 64KB");
    }
    Ok(())
}

/// Whether a problem's buggy-code field is a link to an external file
pub fn is_external_link(blob: &str) -> bool {
    blob.starts_with("http://") || blob.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_source_code() {
        assert!(validate_source_code("print(1)").is_ok());
        assert!(validate_source_code("").is_err());
        assert!(validate_source_code("   \n\t").is_err());
        assert!(validate_source_code(&"x".repeat(70_000)).is_err());
    }

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com/bug.py"));
        assert!(is_external_link("http://example.com/bug.py"));
        assert!(!is_external_link("def add(a, b):\n    return a - b"));
    }
}
