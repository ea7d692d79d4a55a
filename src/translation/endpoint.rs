use crate::utils::ApiConfig;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CACHE_CONTROL, PRAGMA};
use reqwest::RequestBuilder;

/// How a credential is placed in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Bearer,
    /// The document agent endpoints take the key without a prefix.
    Raw,
}

impl AuthScheme {
    pub fn header_value(&self, credential: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {}", credential),
            AuthScheme::Raw => credential.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Files,
    StreamAgent,
    DocAgent,
    AsyncResult,
}

impl Endpoint {
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Endpoint::Files | Endpoint::StreamAgent => AuthScheme::Bearer,
            Endpoint::DocAgent | Endpoint::AsyncResult => AuthScheme::Raw,
        }
    }

    pub fn url(&self, config: &ApiConfig) -> String {
        let (base, path) = match self {
            Endpoint::Files => (&config.base_url, "/paas/v4/files"),
            Endpoint::StreamAgent => (&config.base_url, "/v1/agents"),
            Endpoint::DocAgent => (&config.doc_base_url, "/v1/agents"),
            Endpoint::AsyncResult => (&config.doc_base_url, "/v1/agents/async-result"),
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// Adds the credential and any endpoint-specific headers.
    pub fn authorize(&self, builder: RequestBuilder, credential: &str) -> RequestBuilder {
        let builder = builder.header(AUTHORIZATION, self.auth_scheme().header_value(credential));
        match self {
            Endpoint::DocAgent | Endpoint::AsyncResult => builder
                .header(ACCEPT, "application/json, text/plain, */*")
                .header(ACCEPT_LANGUAGE, "zh")
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache"),
            Endpoint::Files | Endpoint::StreamAgent => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_policy_per_endpoint() {
        assert_eq!(Endpoint::Files.auth_scheme(), AuthScheme::Bearer);
        assert_eq!(Endpoint::StreamAgent.auth_scheme(), AuthScheme::Bearer);
        assert_eq!(Endpoint::DocAgent.auth_scheme(), AuthScheme::Raw);
        assert_eq!(Endpoint::AsyncResult.auth_scheme(), AuthScheme::Raw);

        assert_eq!(AuthScheme::Bearer.header_value("k"), "Bearer k");
        assert_eq!(AuthScheme::Raw.header_value("k"), "k");
    }

    #[test]
    fn urls_use_the_right_base() {
        let config = ApiConfig::default();
        assert_eq!(Endpoint::Files.url(&config), "https://open.bigmodel.cn/api/paas/v4/files");
        assert_eq!(Endpoint::StreamAgent.url(&config), "https://open.bigmodel.cn/api/v1/agents");
        assert_eq!(Endpoint::DocAgent.url(&config), "https://bigmodel.cn/api/v1/agents");
        assert_eq!(
            Endpoint::AsyncResult.url(&config),
            "https://bigmodel.cn/api/v1/agents/async-result"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let config = ApiConfig::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(Endpoint::DocAgent.url(&config), "http://127.0.0.1:1234/v1/agents");
    }
}
