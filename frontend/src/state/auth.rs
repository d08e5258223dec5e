use crate::{
    api::{ApiError, AuthService, LoginRequest, User},
    state::{session::TokenStore, use_services},
};
use leptos::*;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    /// Snapshot of the persisted session. Runs the expiry sweep.
    pub fn from_session(session: &TokenStore) -> Self {
        let is_authenticated = session.is_valid();
        Self {
            user: if is_authenticated { session.user() } else { None },
            is_authenticated,
            loading: false,
        }
    }
}

fn create_auth_context() -> AuthContext {
    let services = use_services();
    let (auth_state, set_auth_state) = create_signal(AuthState::from_session(&services.session));

    #[cfg(target_arch = "wasm32")]
    {
        if auth_state.get_untracked().is_authenticated {
            let auth = services.auth.clone();
            spawn_local(async move {
                match auth.current_user().await {
                    Ok(user) => set_auth_state.update(|state| state.user = Some(user)),
                    Err(err) => {
                        log::warn!("profile refresh failed: {}", err);
                        if err.is_session_expired() {
                            set_auth_state.set(AuthState::default());
                        }
                    }
                }
            });
        }

        // Another tab logging in or out rewrites the shared token.
        let session = services.session.clone();
        let _ = window_event_listener(ev::storage, move |event: web_sys::StorageEvent| {
            let touches_session = match event.key() {
                Some(key) => key == crate::state::session::TOKEN_KEY,
                None => true,
            };
            if touches_session {
                let next = AuthState::from_session(&session);
                log::debug!("session changed in another tab: {}", next.is_authenticated);
                set_auth_state.set(next);
            }
        });
    }

    (auth_state, set_auth_state)
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

pub async fn login_request(
    request: LoginRequest,
    auth: &AuthService,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), ApiError> {
    set_auth_state.update(|state| state.loading = true);

    match auth.login(request).await {
        Ok(response) => {
            set_auth_state.update(|state| {
                state.user = Some(response.user);
                state.is_authenticated = true;
                state.loading = false;
            });
            Ok(())
        }
        Err(error) => {
            set_auth_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

pub async fn logout(auth: &AuthService, set_auth_state: WriteSignal<AuthState>) -> Result<(), ApiError> {
    let result = auth.logout().await.map(|_| ());

    set_auth_state.update(|state| {
        state.user = None;
        state.is_authenticated = false;
        state.loading = false;
    });

    result
}

pub fn use_login_action() -> Action<LoginRequest, Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let service = use_services().auth;

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let service = service.clone();
        async move { login_request(payload, &service, set_auth).await }
    })
}

pub fn use_logout_action() -> Action<(), Result<(), ApiError>> {
    let (_auth, set_auth) = use_auth();
    let service = use_services().auth;

    create_action(move |_: &()| {
        let service = service.clone();
        async move { logout(&service, set_auth).await }
    })
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::services_at;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn login_and_logout_update_auth_state() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200).json_body(serde_json::json!({
                "code": 200,
                "msg": "ok",
                "data": {
                    "token": "tok-1",
                    "user": {"id": 1, "username": "alice", "role": "admin"}
                }
            }));
        });

        let fixture = services_at(&server.base_url(), "/login");
        let runtime = create_runtime();
        let (state, set_state) = create_signal(AuthState::default());

        login_request(
            LoginRequest {
                username: "alice".into(),
                password: "secret123".into(),
            },
            &fixture.services.auth,
            set_state,
        )
        .await
        .unwrap();

        let snapshot = state.get();
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user.map(|u| u.username).as_deref(), Some("alice"));

        logout(&fixture.services.auth, set_state).await.unwrap();
        let snapshot = state.get();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_none());
        assert!(fixture.services.session.read().is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_login_clears_loading_and_keeps_state() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(serde_json::json!({"code": 401, "msg": "Invalid credentials"}));
        });

        let fixture = services_at(&server.base_url(), "/login");
        let runtime = create_runtime();
        let (state, set_state) = create_signal(AuthState::default());

        let err = login_request(
            LoginRequest {
                username: "alice".into(),
                password: "wrong-pass".into(),
            },
            &fixture.services.auth,
            set_state,
        )
        .await
        .unwrap_err();

        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(state.get(), AuthState::default());
        runtime.dispose();
    }
}
