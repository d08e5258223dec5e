use super::{
    components::{form::LoginForm, register_form::RegisterForm, reset_form::ResetForm},
    view_model::{use_login_view_model, LoginMode},
};
use crate::components::{error::InlineErrorMessage, layout::SuccessMessage};
use leptos::*;

fn heading(mode: LoginMode) -> &'static str {
    match mode {
        LoginMode::Login => "HR Management System",
        LoginMode::Register => "Create an account",
        LoginMode::Reset => "Reset your password",
    }
}

#[component]
pub fn LoginPanel() -> impl IntoView {
    let vm = use_login_view_model();
    let mode = vm.mode;
    let error = vm.error;
    let notice = vm.notice;

    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <h2 class="mt-6 text-center text-3xl font-extrabold text-fg">
                    {move || heading(mode.get())}
                </h2>
                {move || notice.get().map(|message| view! { <SuccessMessage message=message /> })}
                <InlineErrorMessage error=error.into() />
                {move || {
                    let vm = vm.clone();
                    match mode.get() {
                        LoginMode::Login => view! { <LoginForm vm=vm /> }.into_view(),
                        LoginMode::Register => view! { <RegisterForm vm=vm /> }.into_view(),
                        LoginMode::Reset => view! { <ResetForm vm=vm /> }.into_view(),
                    }
                }}
            </div>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{helpers::services_at, ssr::render_to_string};

    #[test]
    fn renders_login_form_by_default() {
        let fixture = services_at("http://127.0.0.1:9", "/login");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            view! { <LoginPanel /> }
        });
        assert!(html.contains("HR Management System"));
        assert!(html.contains("Forgot password?"));
        assert!(html.contains("Create an account"));
    }

    #[test]
    fn headings_follow_mode() {
        assert_eq!(heading(LoginMode::Register), "Create an account");
        assert_eq!(heading(LoginMode::Reset), "Reset your password");
    }
}
