use leptos::*;
use leptos_router::*;
use std::{cell::RefCell, rc::Rc};

use crate::{
    api::Resource,
    components::guard::RequireAuth,
    pages::{
        account::AccountPage, check_in::CheckInPage, dashboard::DashboardPage, login::LoginPage,
        resources::ResourcePage,
    },
    state::{auth::AuthProvider, AppServices},
};

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING: &str = "/dashboard";
pub const CHECK_IN_PATH: &str = "/attendance/check-in";
pub const ACCOUNT_PATH: &str = "/account";

pub const PUBLIC_ROUTE_PATHS: &[&str] = &[LOGIN_PATH];

pub const PROTECTED_ROUTE_PATHS: &[&str] = &[
    "/",
    "/dashboard",
    "/employees",
    "/departments",
    "/positions",
    "/salary/structures",
    "/salary/assignments",
    "/salary/records",
    "/attendance/records",
    "/attendance/rules",
    "/attendance/leave",
    "/attendance/overtime",
    "/intern",
    "/intern/evaluations",
    CHECK_IN_PATH,
    ACCOUNT_PATH,
];

/// Path component of a location, without query or fragment.
pub fn path_of(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

pub fn is_login_view(location: &str) -> bool {
    path_of(location).trim_end_matches('/') == LOGIN_PATH
}

/// The one place forced navigations go through.
pub trait Navigator {
    /// Path + query + fragment of the current view.
    fn current_location(&self) -> String;
    fn navigate(&self, to: &str);
}

pub type SharedNavigator = Rc<dyn Navigator>;

/// Drives `window.location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_location(&self) -> String {
        let Some(window) = web_sys::window() else {
            return "/".into();
        };
        let location = window.location();
        format!(
            "{}{}{}",
            location.pathname().unwrap_or_else(|_| "/".into()),
            location.search().unwrap_or_default(),
            location.hash().unwrap_or_default()
        )
    }

    fn navigate(&self, to: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(to);
        }
    }
}

/// Navigation history kept in memory; used on the host and in tests.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    location: Rc<RefCell<String>>,
    visits: Rc<RefCell<Vec<String>>>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            location: Rc::new(RefCell::new(start.to_string())),
            visits: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Moves to `location` as a user would, without recording a forced navigation.
    pub fn visit(&self, location: &str) {
        *self.location.borrow_mut() = location.to_string();
    }

    /// Forced navigations, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn current_location(&self) -> String {
        self.location.borrow().clone()
    }

    fn navigate(&self, to: &str) {
        *self.location.borrow_mut() = to.to_string();
        self.visits.borrow_mut().push(to.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub fn platform_navigator() -> SharedNavigator {
    Rc::new(BrowserNavigator)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn platform_navigator() -> SharedNavigator {
    Rc::new(MemoryNavigator::default())
}

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_context(AppServices::platform());
    view! {
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/" view=ProtectedDashboard/>
                    <Route path="/dashboard" view=ProtectedDashboard/>
                    <Route path="/employees" view=|| protected_resource(Resource::Employees)/>
                    <Route path="/departments" view=|| protected_resource(Resource::Departments)/>
                    <Route path="/positions" view=|| protected_resource(Resource::Positions)/>
                    <Route path="/salary/structures" view=|| protected_resource(Resource::SalaryStructures)/>
                    <Route path="/salary/assignments" view=|| protected_resource(Resource::SalaryAssignments)/>
                    <Route path="/salary/records" view=|| protected_resource(Resource::SalaryRecords)/>
                    <Route path="/attendance/records" view=|| protected_resource(Resource::AttendanceRecords)/>
                    <Route path="/attendance/rules" view=|| protected_resource(Resource::AttendanceRules)/>
                    <Route path="/attendance/leave" view=|| protected_resource(Resource::Leave)/>
                    <Route path="/attendance/overtime" view=|| protected_resource(Resource::Overtime)/>
                    <Route path="/intern" view=|| protected_resource(Resource::Interns)/>
                    <Route path="/intern/evaluations" view=|| protected_resource(Resource::InternEvaluations)/>
                    <Route path=CHECK_IN_PATH view=|| view! { <RequireAuth><CheckInPage/></RequireAuth> }/>
                    <Route path=ACCOUNT_PATH view=|| view! { <RequireAuth><AccountPage/></RequireAuth> }/>
                    <Route path="/*any" view=|| view! { <Redirect path=DEFAULT_LANDING/> }/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn ProtectedDashboard() -> impl IntoView {
    view! { <RequireAuth><DashboardPage/></RequireAuth> }
}

fn protected_resource(resource: Resource) -> impl IntoView {
    view! { <RequireAuth><ResourcePage resource=resource/></RequireAuth> }
}
