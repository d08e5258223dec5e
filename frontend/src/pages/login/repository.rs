use crate::api::{ApiError, AuthService, Envelope, RegisterRequest, ResetPasswordRequest};

#[derive(Clone)]
pub struct LoginRepository {
    auth: AuthService,
}

impl LoginRepository {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Envelope, ApiError> {
        self.auth.register(request).await
    }

    pub async fn send_reset_code(&self, email: String) -> Result<Envelope, ApiError> {
        self.auth.send_reset_code(&email).await
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<Envelope, ApiError> {
        self.auth.reset_password(request).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::services_at;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn repository_forwards_reset_calls() {
        let server = MockServer::start_async().await;
        let send = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/send-reset-code")
                .json_body(json!({"email": "alice@example.com"}));
            then.status(200)
                .json_body(json!({"code": 200, "msg": "Code sent"}));
        });

        let fixture = services_at(&server.base_url(), "/login");
        let repo = LoginRepository::new(fixture.services.auth.clone());
        let envelope = repo
            .send_reset_code("alice@example.com".into())
            .await
            .unwrap();
        assert_eq!(envelope.message(), Some("Code sent"));
        send.assert();
        assert!(!repo.is_authenticated());
    }

    #[tokio::test]
    async fn repository_surfaces_business_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/register");
            then.status(200)
                .json_body(json!({"code": 400, "msg": "Username already exists"}));
        });

        let fixture = services_at(&server.base_url(), "/login");
        let repo = LoginRepository::new(fixture.services.auth.clone());
        let err = repo
            .register(RegisterRequest {
                username: "alice".into(),
                password: "Str0ng!pw".into(),
                email: "alice@example.com".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Username already exists");
        assert_eq!(err.code, Some(400));
    }
}
