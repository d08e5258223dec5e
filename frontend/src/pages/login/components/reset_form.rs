use super::{
    form::{INPUT_CLASS, LINK_CLASS, SUBMIT_CLASS},
    register_form::PasswordStrength,
};
use crate::pages::login::view_model::{LoginMode, LoginViewModel};
use leptos::{ev::SubmitEvent, *};

fn send_code_label(sending: bool, cooldown: u32, code_sent: bool) -> String {
    if sending {
        "Sending...".into()
    } else if cooldown > 0 {
        format!("Resend in {}s", cooldown)
    } else if code_sent {
        "Resend code".into()
    } else {
        "Send code".into()
    }
}

#[component]
pub fn ResetForm(vm: LoginViewModel) -> impl IntoView {
    let form = vm.reset;
    let sending = vm.send_code_action.pending();
    let pending = vm.reset_action.pending();

    let on_send = {
        let vm = vm.clone();
        move |_| vm.request_reset_code()
    };
    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit_reset();
        }
    };
    let back = move |_| vm.switch_mode(LoginMode::Login);

    view! {
        <form class="mt-8 space-y-4" on:submit=on_submit>
            <div class="flex space-x-2">
                <input
                    name="email"
                    type="email"
                    autocomplete="email"
                    class=INPUT_CLASS
                    placeholder="Email"
                    prop:value=form.email
                    on:input=move |ev| form.email.set(event_target_value(&ev))
                />
                <button
                    type="button"
                    class="whitespace-nowrap px-3 py-2 rounded-md text-sm border border-border disabled:opacity-50"
                    disabled=move || { sending.get() || form.cooldown.get() > 0 }
                    on:click=on_send
                >
                    {move || send_code_label(sending.get(), form.cooldown.get(), form.code_sent.get())}
                </button>
            </div>
            <Show when=move || form.code_sent.get()>
                <input
                    name="code"
                    type="text"
                    inputmode="numeric"
                    autocomplete="one-time-code"
                    maxlength="6"
                    class=INPUT_CLASS
                    placeholder="6-digit code"
                    prop:value=form.code
                    on:input=move |ev| form.code.set(event_target_value(&ev))
                />
                <input
                    name="new_password"
                    type="password"
                    autocomplete="new-password"
                    class=INPUT_CLASS
                    placeholder="New password"
                    prop:value=form.password
                    on:input=move |ev| form.password.set(event_target_value(&ev))
                />
                <PasswordStrength password=form.password />
                <input
                    name="confirm"
                    type="password"
                    autocomplete="new-password"
                    class=INPUT_CLASS
                    placeholder="Confirm new password"
                    prop:value=form.confirm
                    on:input=move |ev| form.confirm.set(event_target_value(&ev))
                />
                <button type="submit" class=SUBMIT_CLASS disabled=move || pending.get()>
                    {move || if pending.get() { "Resetting..." } else { "Reset password" }}
                </button>
            </Show>
            <button type="button" class=LINK_CLASS on:click=back>
                "Back to login"
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::send_code_label;

    #[test]
    fn send_button_label_tracks_cooldown() {
        assert_eq!(send_code_label(true, 0, false), "Sending...");
        assert_eq!(send_code_label(false, 42, true), "Resend in 42s");
        assert_eq!(send_code_label(false, 0, true), "Resend code");
        assert_eq!(send_code_label(false, 0, false), "Send code");
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::pages::login::view_model::use_login_view_model;
    use crate::test_support::{helpers::services_at, ssr::render_to_string};

    // Tailwind `disabled:` variants in class lists do not count.
    fn disabled_attrs(html: &str) -> usize {
        html.matches("disabled").count() - html.matches("disabled:").count()
    }

    fn render_with_cooldown(cooldown: u32) -> String {
        let fixture = services_at("http://127.0.0.1:9", "/login");
        let services = fixture.services.clone();
        render_to_string(move || {
            provide_context(services);
            let vm = use_login_view_model();
            vm.reset.cooldown.set(cooldown);
            view! { <ResetForm vm=vm /> }
        })
    }

    #[test]
    fn send_code_button_is_disabled_during_cooldown() {
        let html = render_with_cooldown(30);
        assert!(html.contains("Resend in 30s"));
        assert_eq!(disabled_attrs(&html), 1);
    }

    #[test]
    fn send_code_button_is_enabled_without_cooldown() {
        let html = render_with_cooldown(0);
        assert!(html.contains("Send code"));
        assert_eq!(disabled_attrs(&html), 0);
    }
}
