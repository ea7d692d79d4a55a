use crate::catalog::Strategy;
use crate::utils::errors::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub upload: UploadConfig,
    pub defaults: TranslationDefaults,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base for the upload and streaming endpoints.
    pub base_url: String,
    /// Base for document task submission and result queries.
    pub doc_base_url: String,
    pub timeout_seconds: u64,
    pub stream_agent_id: String,
    pub doc_agent_id: String,
    pub upload_purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationDefaults {
    pub source_lang: String,
    pub target_lang: String,
    pub strategy: Strategy,
    pub translate_images: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open.bigmodel.cn/api".to_string(),
            doc_base_url: "https://bigmodel.cn/api".to_string(),
            timeout_seconds: 120,
            stream_agent_id: "general_translation".to_string(),
            doc_agent_id: "doc_translation_agent".to_string(),
            upload_purpose: "agent".to_string(),
        }
    }
}

impl ApiConfig {
    /// Points every endpoint at one host, as used against local mock servers.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            doc_base_url: base_url.clone(),
            base_url,
            ..Self::default()
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval_ms: 5000,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            allowed_extensions: ["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "jpg", "jpeg", "png"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Default for TranslationDefaults {
    fn default() -> Self {
        Self {
            source_lang: "auto".to_string(),
            target_lang: "zh-CN".to_string(),
            strategy: Strategy::General,
            translate_images: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslatorError::ConfigError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TranslatorError::ConfigError(e.to_string()))
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        if let Some(p) = path {
            Self::load_from_file(p).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [polling]
            max_attempts = 3

            [defaults]
            strategy = "two_step"
            "#,
        )
        .unwrap();

        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.polling.interval_ms, 5000);
        assert_eq!(config.defaults.strategy, Strategy::TwoStep);
        assert_eq!(config.defaults.target_lang, "zh-CN");
        assert_eq!(config.api.doc_agent_id, "doc_translation_agent");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = AppConfig::from_toml_str("[polling\nmax_attempts = ").unwrap_err();
        assert!(matches!(err, TranslatorError::ConfigError(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default(Some("/nonexistent/config.toml"));
        assert_eq!(config.upload.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(config.api.base_url, "https://open.bigmodel.cn/api");
    }
}
