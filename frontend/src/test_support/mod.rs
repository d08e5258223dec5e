#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::User;
    use crate::router::MemoryNavigator;
    use crate::state::{auth::AuthState, return_path::ReturnPath, session::TokenStore, AppServices};
    use crate::utils::{storage::MemoryStorage, time::ManualClock};
    use chrono::{TimeZone, Utc};
    use leptos::*;
    use std::rc::Rc;

    /// Services wired to in-memory storage, a manual clock and a recording
    /// navigator, with handles kept for assertions.
    pub struct ServicesFixture {
        pub services: AppServices,
        pub storage: MemoryStorage,
        pub transient: MemoryStorage,
        pub clock: ManualClock,
        pub navigator: MemoryNavigator,
    }

    impl ServicesFixture {
        pub fn sign_in(&self, token: &str) {
            self.services.session.save(token, &alice());
        }
    }

    pub fn services_at(base_url: &str, location: &str) -> ServicesFixture {
        let storage = MemoryStorage::new();
        let transient = MemoryStorage::new();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap());
        let navigator = MemoryNavigator::new(location);
        let services = AppServices::with_base_url(
            TokenStore::new(Rc::new(storage.clone()), Rc::new(clock.clone())),
            ReturnPath::new(Rc::new(transient.clone())),
            Rc::new(navigator.clone()),
            base_url,
        );
        ServicesFixture {
            services,
            storage,
            transient,
            clock,
            navigator,
        }
    }

    pub fn alice() -> User {
        User {
            id: 1,
            username: "alice".into(),
            role: "admin".into(),
            employee_id: Some(7),
            email: Some("alice@example.com".into()),
        }
    }

    pub fn provide_auth(user: Option<User>) -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
        let (auth, set_auth) = create_signal(AuthState {
            is_authenticated: user.is_some(),
            user,
            loading: false,
        });
        provide_context((auth, set_auth));
        (auth, set_auth)
    }
}
