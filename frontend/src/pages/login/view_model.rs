use super::{
    repository::LoginRepository,
    utils::{self, LoginFormState, RegisterFormState, ResetFormState, RESET_CODE_COOLDOWN_SECS},
};
use crate::{
    api::{ApiError, Envelope, LoginRequest, RegisterRequest, ResetPasswordRequest},
    components::guard::RouteGuard,
    state::{auth, use_services},
};
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    Login,
    Register,
    Reset,
}

#[derive(Clone)]
pub struct LoginViewModel {
    pub mode: RwSignal<LoginMode>,
    pub form: LoginFormState,
    pub register: RegisterFormState,
    pub reset: ResetFormState,
    pub error: RwSignal<Option<ApiError>>,
    pub notice: RwSignal<Option<String>>,
    pub login_action: Action<LoginRequest, Result<(), ApiError>>,
    pub register_action: Action<RegisterRequest, Result<Envelope, ApiError>>,
    pub send_code_action: Action<String, Result<Envelope, ApiError>>,
    pub reset_action: Action<ResetPasswordRequest, Result<Envelope, ApiError>>,
}

impl LoginViewModel {
    pub fn switch_mode(&self, mode: LoginMode) {
        self.error.set(None);
        self.notice.set(None);
        self.mode.set(mode);
    }

    pub fn submit_login(&self) {
        if self.login_action.pending().get_untracked() {
            return;
        }
        match self.form.to_request() {
            Ok(request) => {
                self.error.set(None);
                self.login_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn submit_register(&self) {
        if self.register_action.pending().get_untracked() {
            return;
        }
        match self.register.to_request() {
            Ok(request) => {
                self.error.set(None);
                self.register_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn request_reset_code(&self) {
        if self.send_code_action.pending().get_untracked() || !self.reset.can_request_code() {
            return;
        }
        match utils::validate_reset_email(&self.reset.email.get_untracked()) {
            Ok(email) => {
                self.error.set(None);
                self.send_code_action.dispatch(email);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn submit_reset(&self) {
        if self.reset_action.pending().get_untracked() {
            return;
        }
        match self.reset.to_request() {
            Ok(request) => {
                self.error.set(None);
                self.reset_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn start_cooldown(remaining: RwSignal<u32>) {
    remaining.set(RESET_CODE_COOLDOWN_SECS);
    spawn_local(async move {
        while remaining.get_untracked() > 0 {
            gloo_timers::future::TimeoutFuture::new(1_000).await;
            remaining.update(|secs| *secs = secs.saturating_sub(1));
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn start_cooldown(remaining: RwSignal<u32>) {
    remaining.set(RESET_CODE_COOLDOWN_SECS);
}

/// Sends an already signed-in visitor on to where they were headed.
fn redirect_if_authenticated(repo: &LoginRepository, guard: &RouteGuard) -> bool {
    if repo.is_authenticated() {
        guard.complete_login();
        true
    } else {
        false
    }
}

pub fn use_login_view_model() -> LoginViewModel {
    let services = use_services();
    let repository = LoginRepository::new(services.auth.clone());
    let guard = services.guard.clone();
    redirect_if_authenticated(&repository, &guard);

    let mode = create_rw_signal(LoginMode::default());
    let form = LoginFormState::default();
    let register = RegisterFormState::default();
    let reset = ResetFormState::default();
    let error = create_rw_signal(None::<ApiError>);
    let notice = create_rw_signal(None::<String>);
    let login_action = auth::use_login_action();

    let repo = repository.clone();
    let register_action = create_action(move |request: &RegisterRequest| {
        let repo = repo.clone();
        let request = request.clone();
        async move { repo.register(request).await }
    });
    let repo = repository.clone();
    let send_code_action = create_action(move |email: &String| {
        let repo = repo.clone();
        let email = email.clone();
        async move { repo.send_reset_code(email).await }
    });
    let repo = repository;
    let reset_action = create_action(move |request: &ResetPasswordRequest| {
        let repo = repo.clone();
        let request = request.clone();
        async move { repo.reset_password(request).await }
    });

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(()) => {
                    error.set(None);
                    form.password.set(String::new());
                    guard.complete_login();
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    create_effect(move |_| {
        if let Some(result) = register_action.value().get() {
            match result {
                Ok(envelope) => {
                    error.set(None);
                    form.username.set(register.username.get_untracked().trim().to_string());
                    register.clear();
                    notice.set(Some(envelope.message_or("Registration succeeded, please log in")));
                    mode.set(LoginMode::Login);
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    create_effect(move |_| {
        if let Some(result) = send_code_action.value().get() {
            match result {
                Ok(envelope) => {
                    error.set(None);
                    reset.code_sent.set(true);
                    start_cooldown(reset.cooldown);
                    notice.set(Some(envelope.message_or("Verification code sent")));
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    create_effect(move |_| {
        if let Some(result) = reset_action.value().get() {
            match result {
                Ok(envelope) => {
                    error.set(None);
                    reset.clear();
                    notice.set(Some(envelope.message_or("Password reset, please log in")));
                    mode.set(LoginMode::Login);
                }
                Err(err) => error.set(Some(err)),
            }
        }
    });

    LoginViewModel {
        mode,
        form,
        register,
        reset,
        error,
        notice,
        login_action,
        register_action,
        send_code_action,
        reset_action,
    }
}
