use crate::utils::ApiError;
use reqwest::{Response, StatusCode};
use serde_json::Value as JsonValue;

/// Reads the whole body once and turns it into JSON or an [`ApiError`].
pub async fn normalize(response: Response) -> Result<JsonValue, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from)?;
    normalize_body(status, &body)
}

/// Decides success or failure for an already drained body.
///
/// A JSON body fails when the status is not a success or when it carries
/// `"success": false`; its own `code`/`msg` win over the transport status.
/// A body that is not JSON always fails with the transport status.
pub fn normalize_body(status: StatusCode, body: &str) -> Result<JsonValue, ApiError> {
    match serde_json::from_str::<JsonValue>(body) {
        Ok(data) => {
            let flagged = data.get("success").and_then(JsonValue::as_bool) == Some(false);
            if !status.is_success() || flagged {
                return Err(error_from_body(status, &data));
            }
            Ok(data)
        }
        Err(_) => Err(ApiError::new(
            i64::from(status.as_u16()),
            status_text(status).unwrap_or("network request failed"),
        )),
    }
}

pub(crate) fn error_from_body(status: StatusCode, data: &JsonValue) -> ApiError {
    let code = data
        .get("code")
        .and_then(code_value)
        .unwrap_or_else(|| i64::from(status.as_u16()));

    let message = ["msg", "message"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(JsonValue::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| {
            data.get("error")
                .and_then(|e| e.get("message"))
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        })
        .or_else(|| status_text(status).map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());

    ApiError::new(code, message)
}

/// Upstream codes arrive as numbers or numeric strings.
pub(crate) fn code_value(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().filter(|c| *c != 0),
        JsonValue::String(s) => s.trim().parse::<i64>().ok().filter(|c| *c != 0),
        _ => None,
    }
}

fn status_text(status: StatusCode) -> Option<&'static str> {
    status.canonical_reason()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorCategory;
    use serde_json::json;

    #[test]
    fn success_body_is_returned_unchanged() {
        let value = normalize_body(StatusCode::OK, r#"{"id":"file-1","bytes":3}"#).unwrap();
        assert_eq!(value, json!({ "id": "file-1", "bytes": 3 }));
    }

    #[test]
    fn explicit_failure_marker_fails_even_on_200() {
        let err = normalize_body(StatusCode::OK, r#"{"success":false,"code":429,"msg":"slow down"}"#)
            .unwrap_err();
        assert_eq!(err.code(), 429);
        assert_eq!(err.message(), "slow down");
        assert_eq!(err.category(), ErrorCategory::RateLimited);
    }

    #[test]
    fn error_status_uses_body_fields() {
        let err = normalize_body(StatusCode::UNAUTHORIZED, r#"{"message":"bad key"}"#).unwrap_err();
        assert_eq!(err.code(), 401);
        assert_eq!(err.message(), "bad key");
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn nested_error_message_is_used() {
        let err = normalize_body(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"1214","message":"invalid file"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), 400);
        assert_eq!(err.message(), "invalid file");
    }

    #[test]
    fn string_codes_are_parsed() {
        let err = normalize_body(StatusCode::OK, r#"{"success":false,"code":"403","msg":"no"}"#)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Forbidden);
    }

    #[test]
    fn non_json_body_fails_with_transport_status() {
        let err = normalize_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.code(), 502);
        assert_eq!(err.message(), "Bad Gateway");

        let err = normalize_body(StatusCode::OK, "not json").unwrap_err();
        assert_eq!(err.code(), 200);
        assert_eq!(err.category(), ErrorCategory::Generic);
    }

    #[test]
    fn status_text_falls_back_when_body_has_no_message() {
        let err = normalize_body(StatusCode::SERVICE_UNAVAILABLE, "{}").unwrap_err();
        assert_eq!(err.code(), 503);
        assert_eq!(err.message(), "Service Unavailable");
    }
}
