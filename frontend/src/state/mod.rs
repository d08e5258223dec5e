pub mod auth;
pub mod return_path;
pub mod session;

use leptos::use_context;

use crate::{
    api::{ApiClient, AuthService},
    components::guard::RouteGuard,
    router::{self, SharedNavigator},
};
use return_path::ReturnPath;
use session::TokenStore;

/// Session, navigation and HTTP plumbing shared by every screen. The token
/// store and navigator are handed to each consumer here instead of being
/// reached as globals.
#[derive(Clone)]
pub struct AppServices {
    pub session: TokenStore,
    pub return_path: ReturnPath,
    pub navigator: SharedNavigator,
    pub api: ApiClient,
    pub auth: AuthService,
    pub guard: RouteGuard,
}

impl AppServices {
    pub fn new(session: TokenStore, return_path: ReturnPath, navigator: SharedNavigator) -> Self {
        let api = ApiClient::new(session.clone(), return_path.clone(), navigator.clone());
        Self::assemble(api)
    }

    /// Services talking to a fixed API address instead of the runtime-configured one.
    pub fn with_base_url(
        session: TokenStore,
        return_path: ReturnPath,
        navigator: SharedNavigator,
        base_url: impl Into<String>,
    ) -> Self {
        let api = ApiClient::new(session, return_path, navigator).with_base_url(base_url);
        Self::assemble(api)
    }

    fn assemble(api: ApiClient) -> Self {
        let session = api.session().clone();
        let return_path = api.return_path().clone();
        let navigator = api.navigator().clone();
        Self {
            auth: AuthService::new(api.clone()),
            guard: RouteGuard::new(session.clone(), return_path.clone(), navigator.clone()),
            session,
            return_path,
            navigator,
            api,
        }
    }

    pub fn platform() -> Self {
        Self::new(
            TokenStore::platform(),
            ReturnPath::platform(),
            router::platform_navigator(),
        )
    }
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>().unwrap_or_else(AppServices::platform)
}
