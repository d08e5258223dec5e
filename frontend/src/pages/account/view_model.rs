use super::utils::PasswordFormState;
use crate::{
    api::{ApiError, ChangePasswordRequest, Envelope, User},
    state::{auth::use_auth, use_services},
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct AccountViewModel {
    pub profile: Resource<u32, Result<User, ApiError>>,
    pub reload: RwSignal<u32>,
    pub form: PasswordFormState,
    pub error: RwSignal<Option<ApiError>>,
    pub notice: RwSignal<Option<String>>,
    pub change_action: Action<ChangePasswordRequest, Result<Envelope, ApiError>>,
}

impl AccountViewModel {
    pub fn refresh(&self) {
        self.reload.update(|n| *n += 1);
    }

    pub fn submit(&self) {
        if self.change_action.pending().get_untracked() {
            return;
        }
        self.notice.set(None);
        match self.form.to_request() {
            Ok(request) => {
                self.error.set(None);
                self.change_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }
}

pub fn use_account_view_model() -> AccountViewModel {
    let auth = use_services().auth;
    let (_auth_state, set_auth) = use_auth();
    let reload = create_rw_signal(0u32);
    let form = PasswordFormState::default();
    let error = create_rw_signal(None::<ApiError>);
    let notice = create_rw_signal(None::<String>);

    let profile_auth = auth.clone();
    let profile = create_resource(
        move || reload.get(),
        move |_| {
            let auth = profile_auth.clone();
            async move { auth.current_user().await }
        },
    );

    let change_action = create_action(move |request: &ChangePasswordRequest| {
        let auth = auth.clone();
        let request = request.clone();
        async move { auth.change_password(request).await }
    });

    // Keep the header's username in step with the refreshed profile.
    create_effect(move |_| {
        if let Some(Ok(user)) = profile.get() {
            set_auth.update(|state| state.user = Some(user));
        }
    });

    create_effect(move |_| {
        if let Some(result) = change_action.value().get() {
            match result {
                Ok(envelope) => {
                    error.set(None);
                    form.clear();
                    notice.set(Some(envelope.message_or("Password changed")));
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    AccountViewModel {
        profile,
        reload,
        form,
        error,
        notice,
        change_action,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::test_support::{
        helpers::{provide_auth, services_at},
        ssr::with_runtime,
    };

    #[test]
    fn invalid_change_never_dispatches() {
        let fixture = services_at("http://127.0.0.1:9", "/account");
        let services = fixture.services.clone();
        with_runtime(move || {
            provide_context(services);
            provide_auth(None);
            let vm = use_account_view_model();
            vm.form.current.set("secret123".into());
            vm.form.password.set("weak".into());
            vm.form.confirm.set("weak".into());
            vm.submit();
            assert_eq!(vm.error.get().map(|e| e.kind), Some(ErrorKind::Validation));
            assert!(vm.change_action.input().get().is_none());
        });
    }
}
