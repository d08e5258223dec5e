use reqwest::{header, multipart::Form, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    api::types::{ApiError, Envelope},
    config,
    router::{self, SharedNavigator},
    state::{return_path::ReturnPath, session::TokenStore},
};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";

pub const REQUEST_FAILED: &str = "Request failed";
pub const LOGIN_FAILED: &str = "Login failed";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const ACCESS_DENIED: &str = "You do not have permission to access this resource";
pub const NETWORK_UNREACHABLE: &str = "Network error, please check your connection";
pub const REQUEST_TIMED_OUT: &str = "The server did not respond in time";

pub enum RequestBody {
    Empty,
    Json(Value),
    /// Sent without an explicit content type so the transport writes the boundary.
    Multipart(Form),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| ApiError::decode(format!("Failed to encode request: {}", e)))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

fn is_login_endpoint(path: &str) -> bool {
    router::path_of(path) == LOGIN_ENDPOINT
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client() -> Client {
    Client::builder()
        .timeout(config::REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|err| {
            log::warn!("falling back to default HTTP client: {}", err);
            Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_http_client() -> Client {
    Client::new()
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        log::warn!("request timed out: {}", err);
        ApiError::network(REQUEST_TIMED_OUT)
    } else {
        log::warn!("request failed before a response arrived: {}", err);
        ApiError::network(NETWORK_UNREACHABLE)
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn execute(request: RequestBuilder) -> Result<Response, ApiError> {
    request.send().await.map_err(transport_error)
}

#[cfg(target_arch = "wasm32")]
async fn execute(request: RequestBuilder) -> Result<Response, ApiError> {
    use futures::future::{self, Either};

    let send = Box::pin(request.send());
    let timeout = Box::pin(gloo_timers::future::TimeoutFuture::new(
        config::REQUEST_TIMEOUT.as_millis() as u32,
    ));
    match future::select(send, timeout).await {
        Either::Left((result, _)) => result.map_err(transport_error),
        Either::Right(_) => {
            log::warn!("request timed out after {:?}", config::REQUEST_TIMEOUT);
            Err(ApiError::network(REQUEST_TIMED_OUT))
        }
    }
}

/// Request pipeline shared by every screen: bearer token in, envelope out,
/// session teardown on an expired token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    session: TokenStore,
    return_path: ReturnPath,
    navigator: SharedNavigator,
}

impl ApiClient {
    pub fn new(session: TokenStore, return_path: ReturnPath, navigator: SharedNavigator) -> Self {
        Self {
            client: build_http_client(),
            base_url: None,
            session,
            return_path,
            navigator,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn session(&self) -> &TokenStore {
        &self.session
    }

    pub fn return_path(&self) -> &ReturnPath {
        &self.return_path
    }

    pub fn navigator(&self) -> &SharedNavigator {
        &self.navigator
    }

    async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    fn prepare(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: RequestBody,
    ) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        match body {
            RequestBody::Multipart(form) => request.multipart(form),
            RequestBody::Json(value) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            RequestBody::Empty => request.header(header::CONTENT_TYPE, "application/json"),
        }
    }

    /// Sends one request and returns the parsed envelope without judging its
    /// business code. Transport failures and non-2xx statuses are errors.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody,
    ) -> Result<Envelope, ApiError> {
        let url = format!("{}{}", self.resolved_base_url().await, path);
        log::debug!("{} {}", method, path);
        let request = self.prepare(method, &url, query, body);
        let response = execute(request).await?;
        self.interpret(path, response).await
    }

    async fn interpret(&self, path: &str, response: Response) -> Result<Envelope, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            return serde_json::from_str::<Envelope>(&body)
                .map_err(|e| ApiError::decode(format!("Failed to parse response: {}", e)));
        }

        let envelope = Envelope::from_body(&body);
        match status {
            StatusCode::UNAUTHORIZED if is_login_endpoint(path) => {
                log::info!("login rejected by server");
                Err(ApiError::login_failed(envelope.message_or(LOGIN_FAILED))
                    .with_status(status.as_u16())
                    .with_code(envelope.code))
            }
            StatusCode::UNAUTHORIZED => {
                self.handle_session_expired();
                Err(ApiError::unauthorized(envelope.message_or(SESSION_EXPIRED)).with_code(envelope.code))
            }
            StatusCode::FORBIDDEN => {
                log::warn!("access denied: {}", path);
                Err(ApiError::forbidden(envelope.message_or(ACCESS_DENIED)).with_code(envelope.code))
            }
            _ => {
                log::warn!("{} answered {}", path, status);
                let message = envelope.message_or(REQUEST_FAILED);
                Err(ApiError::http(status.as_u16(), message, envelope.data).with_code(envelope.code))
            }
        }
    }

    fn handle_session_expired(&self) {
        let location = self.navigator.current_location();
        if router::is_login_view(&location) {
            self.session.clear();
            return;
        }
        log::info!("session rejected by server; returning to login from {}", location);
        self.return_path.remember(&location);
        self.session.clear();
        self.navigator.navigate(router::LOGIN_PATH);
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, query, RequestBody::Empty)
            .await?
            .into_data(REQUEST_FAILED)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.post_envelope(path, body).await?.into_data(REQUEST_FAILED)
    }

    /// POST whose envelope is handed back as-is for the caller to interpret.
    pub async fn post_envelope<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope, ApiError> {
        self.send(Method::POST, path, &[], RequestBody::json(body)?)
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, path, &[], RequestBody::json(body)?)
            .await?
            .into_data(REQUEST_FAILED)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, &[], RequestBody::Empty)
            .await?
            .into_data(REQUEST_FAILED)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, &[], RequestBody::Multipart(form))
            .await?
            .into_data(REQUEST_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_endpoint_match_ignores_query() {
        assert!(is_login_endpoint("/api/auth/login"));
        assert!(is_login_endpoint("/api/auth/login?lang=zh"));
        assert!(!is_login_endpoint("/api/auth/profile"));
        assert!(!is_login_endpoint("/api/employees"));
    }

    #[test]
    fn request_body_kinds() {
        assert!(RequestBody::Multipart(Form::new()).is_multipart());
        assert!(!RequestBody::Empty.is_multipart());
        let body = RequestBody::json(&serde_json::json!({"name": "R&D"})).unwrap();
        assert!(matches!(body, RequestBody::Json(ref v) if v["name"] == "R&D"));
    }
}
