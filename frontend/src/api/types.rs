use leptos::{IntoView, View};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

pub const SUCCESS_CODE: i64 = 200;

/// `{code, data, msg}` wrapper every endpoint answers with. Some handlers say
/// `message` instead of `msg`; both are kept and read through [`Envelope::message`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }

    pub fn message(&self) -> Option<&str> {
        [self.msg.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }

    /// Leniently reads an error body; anything that is not an envelope yields an empty one.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str::<Envelope>(body).unwrap_or_default()
    }

    pub fn ensure_success(self, fallback: &str) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::business(
                self.code,
                self.message_or(fallback),
                self.data,
            ))
        }
    }

    pub fn into_data<T: DeserializeOwned>(self, fallback: &str) -> Result<T, ApiError> {
        let envelope = self.ensure_success(fallback)?;
        serde_json::from_value(envelope.data)
            .map_err(|e| ApiError::decode(format!("Failed to parse response: {}", e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response reached the client.
    Network,
    /// 401 on an authenticated endpoint; the session has been torn down.
    Unauthorized,
    /// Credentials rejected by the login endpoint.
    LoginFailed,
    Forbidden,
    /// Any other non-2xx transport status.
    Http,
    /// 2xx transport status with `code != 200`.
    Business,
    Validation,
    Decode,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl IntoView for ApiError {
    fn into_view(self) -> View {
        self.message.into_view()
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.message
    }
}

fn non_null(data: Value) -> Option<Value> {
    if data.is_null() {
        None
    } else {
        Some(data)
    }
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            status: None,
            data: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: Some(401),
            ..Self::new(ErrorKind::Unauthorized, message)
        }
    }

    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoginFailed, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: Some(403),
            ..Self::new(ErrorKind::Forbidden, message)
        }
    }

    pub fn http(status: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            status: Some(status),
            data: non_null(data),
            ..Self::new(ErrorKind::Http, message)
        }
    }

    pub fn business(code: Option<i64>, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            data: non_null(data),
            ..Self::new(ErrorKind::Business, message)
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: Option<i64>) -> Self {
        self.code = code;
        self
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

/// Identity snapshot cached beside the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetCodeRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// One page of feature-module records, from either a bare array or a
/// `{items|list|records, total, page, per_page}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub items: Vec<Value>,
    pub total: u64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl RecordPage {
    pub fn from_value(data: Value) -> Result<Self, ApiError> {
        match data {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => Ok(Self {
                total: items.len() as u64,
                items,
                page: None,
                per_page: None,
            }),
            Value::Object(mut map) => {
                let items = ["items", "list", "records"]
                    .iter()
                    .find_map(|key| match map.remove(*key) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .ok_or_else(|| ApiError::decode("Response does not contain a record list"))?;
                let read_u32 = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_u64)
                        .and_then(|v| u32::try_from(v).ok())
                };
                Ok(Self {
                    total: map
                        .get("total")
                        .and_then(Value::as_u64)
                        .unwrap_or(items.len() as u64),
                    page: read_u32("page"),
                    per_page: read_u32("per_page"),
                    items,
                })
            }
            other => Err(ApiError::decode(format!(
                "Expected a record list, got {}",
                other
            ))),
        }
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use leptos::IntoView;

    #[test]
    fn api_error_helpers_set_expected_kinds() {
        assert_eq!(ApiError::network("down").kind, ErrorKind::Network);
        assert_eq!(ApiError::unauthorized("expired").status, Some(401));
        assert!(ApiError::unauthorized("expired").is_session_expired());
        assert!(!ApiError::login_failed("bad").is_session_expired());
        assert_eq!(ApiError::forbidden("no").status, Some(403));
        let http = ApiError::http(500, "boom", Value::Null);
        assert_eq!(http.status, Some(500));
        assert!(http.data.is_none());
        assert_eq!(ApiError::validation("x").to_string(), "x");
    }

    #[test]
    fn api_error_into_view_renders_message() {
        let runtime = leptos::create_runtime();
        let html = ApiError::validation("invalid payload")
            .into_view()
            .render_to_string()
            .to_string();
        assert!(html.contains("invalid payload"));
        runtime.dispose();
    }
}
