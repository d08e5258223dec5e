use crate::{
    components::layout::LoadingSpinner,
    router::{self, SharedNavigator, DEFAULT_LANDING, LOGIN_PATH},
    state::{
        auth::{use_auth, AuthState},
        return_path::ReturnPath,
        session::TokenStore,
        use_services,
    },
};
use leptos::*;
use leptos_router::{use_location, Location, RouterContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Denied,
}

/// Admission check for protected views. Reads the session only; never
/// touches the network.
#[derive(Clone)]
pub struct RouteGuard {
    session: TokenStore,
    return_path: ReturnPath,
    navigator: SharedNavigator,
}

impl RouteGuard {
    pub fn new(session: TokenStore, return_path: ReturnPath, navigator: SharedNavigator) -> Self {
        Self {
            session,
            return_path,
            navigator,
        }
    }

    /// Denial remembers `attempted` (unless it is the login view) and sends
    /// the user to the login view.
    pub fn evaluate(&self, attempted: &str) -> GuardDecision {
        if self.session.is_valid() {
            return GuardDecision::Allowed;
        }
        if !router::is_login_view(attempted) {
            self.return_path.remember(attempted);
        }
        log::info!("access to {} denied; redirecting to login", attempted);
        self.navigator.navigate(LOGIN_PATH);
        GuardDecision::Denied
    }

    pub fn check_current(&self) -> GuardDecision {
        self.evaluate(&self.navigator.current_location())
    }

    /// Where to go once a login succeeded: the pending return path if any,
    /// else the default landing view. Navigates there and returns it.
    pub fn complete_login(&self) -> String {
        let target = self
            .return_path
            .take()
            .filter(|path| !router::is_login_view(path))
            .unwrap_or_else(|| DEFAULT_LANDING.to_string());
        log::debug!("login complete; continuing to {}", target);
        self.navigator.navigate(&target);
        target
    }
}

/// Path + query + fragment from router parts. The router keeps the query
/// without its `?`; the fragment may or may not carry its `#`.
fn join_location(pathname: &str, search: &str, hash: &str) -> String {
    let mut location = pathname.to_string();
    let search = search.trim_start_matches('?');
    if !search.is_empty() {
        location.push('?');
        location.push_str(search);
    }
    let hash = hash.trim_start_matches('#');
    if !hash.is_empty() {
        location.push('#');
        location.push_str(hash);
    }
    location
}

/// Inside a router the attempted location comes from its state, which is
/// current before the browser's address bar is.
fn check_attempted(guard: &RouteGuard, location: Option<&Location>) -> GuardDecision {
    match location {
        Some(location) => guard.evaluate(&join_location(
            &location.pathname.get_untracked(),
            &location.search.get_untracked(),
            &location.hash.get_untracked(),
        )),
        None => guard.check_current(),
    }
}

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let (auth, set_auth) = use_auth();
    let services = use_services();
    let guard = services.guard.clone();
    let location = use_context::<RouterContext>().map(|_| use_location());

    let decision = check_attempted(&guard, location.as_ref());
    let allowed = decision == GuardDecision::Allowed;
    if allowed != auth.get_untracked().is_authenticated {
        set_auth.set(AuthState::from_session(&services.session));
    }

    let is_authenticated = create_memo(move |_| auth.get().is_authenticated);
    let is_loading = create_memo(move |_| auth.get().loading);
    create_effect(move |previous: Option<()>| {
        let state = auth.get();
        // The first run matches the evaluation done above.
        if previous.is_none() || state.loading || state.is_authenticated {
            return;
        }
        check_attempted(&guard, location.as_ref());
    });
    view! {
        <Show
            when=move || should_render_children(is_authenticated.get(), is_loading.get())
            fallback=move || {
                if is_loading.get() {
                    view! { <LoadingSpinner /> }.into_view()
                } else {
                    ().into_view()
                }
            }
        >
            {children()}
        </Show>
    }
}

fn should_render_children(is_authenticated: bool, is_loading: bool) -> bool {
    is_authenticated && !is_loading
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::services_at;
    use chrono::Duration;

    const OFFLINE: &str = "http://127.0.0.1:9";

    #[test]
    fn router_location_parts_are_joined() {
        assert_eq!(join_location("/salary/records", "x=1", "#y"), "/salary/records?x=1#y");
        assert_eq!(join_location("/salary/records", "?x=1", "y"), "/salary/records?x=1#y");
        assert_eq!(join_location("/employees", "", ""), "/employees");
    }

    #[test]
    fn guard_blocks_until_authenticated() {
        assert!(!should_render_children(false, true));
        assert!(!should_render_children(false, false));
        assert!(!should_render_children(true, true));
        assert!(should_render_children(true, false));
    }

    #[test]
    fn valid_session_is_allowed_without_side_effects() {
        let fixture = services_at(OFFLINE, "/employees");
        fixture.sign_in("tok-1");
        assert_eq!(fixture.services.guard.check_current(), GuardDecision::Allowed);
        assert!(fixture.navigator.history().is_empty());
        assert!(fixture.services.return_path.peek().is_none());
    }

    #[test]
    fn denial_remembers_location_and_round_trips_after_login() {
        let fixture = services_at(OFFLINE, "/salary/records?x=1#y");
        let guard = &fixture.services.guard;

        assert_eq!(guard.check_current(), GuardDecision::Denied);
        assert_eq!(fixture.navigator.last().as_deref(), Some(LOGIN_PATH));

        fixture.sign_in("tok-1");
        assert_eq!(guard.complete_login(), "/salary/records?x=1#y");
        assert_eq!(
            fixture.navigator.last().as_deref(),
            Some("/salary/records?x=1#y")
        );
        assert!(fixture.services.return_path.peek().is_none());
    }

    #[test]
    fn last_denial_wins() {
        let fixture = services_at(OFFLINE, "/");
        let guard = &fixture.services.guard;
        guard.evaluate("/employees");
        guard.evaluate("/departments?page=2");
        fixture.sign_in("tok-1");
        assert_eq!(guard.complete_login(), "/departments?page=2");
    }

    #[test]
    fn login_view_is_never_remembered() {
        let fixture = services_at(OFFLINE, "/login");
        assert_eq!(fixture.services.guard.check_current(), GuardDecision::Denied);
        assert!(fixture.services.return_path.peek().is_none());
        fixture.sign_in("tok-1");
        assert_eq!(fixture.services.guard.complete_login(), DEFAULT_LANDING);
    }

    #[test]
    fn expired_session_is_denied_and_swept() {
        let fixture = services_at(OFFLINE, "/positions");
        fixture.sign_in("tok-1");
        fixture.clock.advance(Duration::hours(24) + Duration::seconds(1));
        assert_eq!(fixture.services.guard.check_current(), GuardDecision::Denied);
        assert!(fixture.storage.is_empty());
        assert_eq!(fixture.services.return_path.peek().as_deref(), Some("/positions"));
    }

    #[test]
    fn session_at_exact_expiry_is_still_allowed() {
        let fixture = services_at(OFFLINE, "/positions");
        fixture.sign_in("tok-1");
        fixture.clock.advance(Duration::hours(24));
        assert_eq!(fixture.services.guard.check_current(), GuardDecision::Allowed);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::RequireAuth;
    use crate::router::LOGIN_PATH;
    use crate::state::auth::AuthState;
    use crate::test_support::helpers::{alice, provide_auth, services_at};
    use crate::test_support::ssr::render_to_string;
    use leptos::*;

    #[test]
    fn require_auth_renders_children_with_valid_session() {
        let fixture = services_at("http://127.0.0.1:9", "/employees");
        fixture.sign_in("tok-1");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(Some(alice()));
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(html.contains("protected-content"));
        assert!(fixture.navigator.history().is_empty());
    }

    #[test]
    fn require_auth_hides_children_and_redirects_without_session() {
        let fixture = services_at("http://127.0.0.1:9", "/employees?page=3");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(None);
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(!html.contains("protected-content"));
        assert_eq!(fixture.navigator.last().as_deref(), Some(LOGIN_PATH));
        assert_eq!(
            fixture.services.return_path.peek().as_deref(),
            Some("/employees?page=3")
        );
    }

    #[test]
    fn router_location_wins_over_a_lagging_address_bar() {
        use leptos_router::{Router, RouterIntegrationContext, ServerIntegration};

        // The address bar still shows the page the user is leaving.
        let fixture = services_at("http://127.0.0.1:9", "/dashboard");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_context(RouterIntegrationContext::new(ServerIntegration {
                path: "http://localhost/salary/records?month=5".to_string(),
            }));
            provide_auth(None);
            view! {
                <Router>
                    <RequireAuth>
                        {|| view! { <div>"protected-content"</div> }}
                    </RequireAuth>
                </Router>
            }
        });
        assert!(!html.contains("protected-content"));
        assert_eq!(fixture.navigator.last().as_deref(), Some(LOGIN_PATH));
        assert_eq!(
            fixture.services.return_path.peek().as_deref(),
            Some("/salary/records?month=5")
        );
    }

    #[test]
    fn stale_auth_state_does_not_outlive_the_session() {
        let fixture = services_at("http://127.0.0.1:9", "/departments");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(Some(alice()));
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(!html.contains("protected-content"));
    }

    #[test]
    fn require_auth_shows_loading_spinner_while_loading() {
        let fixture = services_at("http://127.0.0.1:9", "/employees");
        fixture.sign_in("tok-1");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            let (auth, set_auth) = create_signal(AuthState {
                user: Some(alice()),
                is_authenticated: true,
                loading: true,
            });
            provide_context((auth, set_auth));
            view! {
                <RequireAuth>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireAuth>
            }
        });
        assert!(html.contains("animate-spin"));
    }
}
