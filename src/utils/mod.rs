pub mod config;
pub mod errors;

pub use config::{ApiConfig, AppConfig, LoggingConfig, PollingConfig, TranslationDefaults, UploadConfig};
pub use errors::{ApiError, ErrorCategory, Result, TranslatorError};

/// Shortens an opaque id for log lines and status messages.
pub fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(7)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &id[start..]
}

#[cfg(test)]
mod tests {
    use super::short_id;

    #[test]
    fn short_id_keeps_last_eight_chars() {
        assert_eq!(short_id("task-1234567890"), "34567890");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }
}
