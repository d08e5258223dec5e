use serde_json::{json, Value};

use super::{
    client::{ApiClient, RequestBody, LOGIN_ENDPOINT, LOGIN_FAILED},
    types::{
        ApiError, ChangePasswordRequest, Envelope, ErrorKind, LoginRequest, LoginResponse,
        RegisterRequest, ResetCodeRequest, ResetPasswordRequest, User, SUCCESS_CODE,
    },
};
use crate::state::session::TokenStore;

pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const SEND_RESET_CODE_ENDPOINT: &str = "/api/auth/send-reset-code";
pub const RESET_PASSWORD_ENDPOINT: &str = "/api/auth/reset-password";
pub const PROFILE_ENDPOINT: &str = "/api/auth/profile";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/api/auth/change-password";

pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTRATION_SUCCEEDED: &str = "Registration succeeded";
pub const SEND_CODE_FAILED: &str = "Failed to send the verification code";
pub const RESET_FAILED: &str = "Password reset failed";
pub const PROFILE_FAILED: &str = "Failed to load the current user";
pub const CHANGE_PASSWORD_FAILED: &str = "Failed to change the password";

/// Login, registration, password reset and logout. The only writer of the
/// session token.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &TokenStore {
        self.client.session()
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let envelope = self
            .client
            .post_envelope(LOGIN_ENDPOINT, &request)
            .await
            .map_err(|err| {
                log::info!("login failed for {}: {}", request.username, err);
                match err.kind {
                    ErrorKind::Network | ErrorKind::Decode => err,
                    _ => ApiError {
                        kind: ErrorKind::LoginFailed,
                        ..err
                    },
                }
            })?;

        let message = envelope.message_or(LOGIN_FAILED);
        let code = envelope.code;
        let parsed = if envelope.is_success() {
            serde_json::from_value::<LoginResponse>(envelope.data).ok()
        } else {
            None
        };
        match parsed {
            Some(response) if !response.token.is_empty() => {
                self.session().save(&response.token, &response.user);
                log::info!("logged in as {}", response.user.username);
                Ok(response)
            }
            _ => {
                log::info!("login refused for {}: {}", request.username, message);
                Err(ApiError::login_failed(message).with_code(code))
            }
        }
    }

    /// Some deployments omit `code` on success; a returned user is enough to
    /// count as registered and the envelope is normalized to code 200.
    pub async fn register(&self, request: RegisterRequest) -> Result<Envelope, ApiError> {
        let envelope = self.client.post_envelope(REGISTER_ENDPOINT, &request).await?;
        let has_user = envelope
            .data
            .get("user")
            .map(|user| !user.is_null())
            .unwrap_or(false);
        match envelope.code {
            None if has_user => Ok(Envelope {
                code: Some(SUCCESS_CODE),
                message: Some(envelope.message_or(REGISTRATION_SUCCEEDED)),
                msg: None,
                data: envelope.data,
            }),
            _ => envelope.ensure_success(REGISTRATION_FAILED),
        }
    }

    pub async fn send_reset_code(&self, email: &str) -> Result<Envelope, ApiError> {
        let request = ResetCodeRequest {
            email: email.trim().to_string(),
        };
        self.client
            .post_envelope(SEND_RESET_CODE_ENDPOINT, &request)
            .await?
            .ensure_success(SEND_CODE_FAILED)
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<Envelope, ApiError> {
        self.client
            .post_envelope(RESET_PASSWORD_ENDPOINT, &request)
            .await?
            .ensure_success(RESET_FAILED)
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<Envelope, ApiError> {
        self.client
            .post_envelope(CHANGE_PASSWORD_ENDPOINT, &request)
            .await?
            .ensure_success(CHANGE_PASSWORD_FAILED)
    }

    /// Fetches the signed-in user and refreshes the cached snapshot.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let data: Value = self
            .client
            .send(reqwest::Method::GET, PROFILE_ENDPOINT, &[], RequestBody::Empty)
            .await?
            .into_data(PROFILE_FAILED)?;
        // Some handlers nest the profile under `user`.
        let payload = match data.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => data,
        };
        let user: User = serde_json::from_value(payload)
            .map_err(|e| ApiError::decode(format!("Failed to parse user: {}", e)))?;
        self.session().update_user(&user);
        Ok(user)
    }

    /// Drops the local session. Nothing is sent to the server.
    pub async fn logout(&self) -> Result<Envelope, ApiError> {
        self.session().clear();
        log::info!("logged out");
        Ok(Envelope {
            code: Some(SUCCESS_CODE),
            data: json!(null),
            msg: None,
            message: Some("Logged out".into()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_valid()
    }
}
