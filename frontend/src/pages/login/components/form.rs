use crate::pages::login::view_model::{LoginMode, LoginViewModel};
use leptos::{ev::SubmitEvent, *};

pub const INPUT_CLASS: &str = "appearance-none rounded-md relative block w-full px-3 py-2 border border-form-control-border bg-form-control-bg placeholder-form-control-placeholder text-form-control-text focus:outline-none focus:ring-2 focus:ring-action-primary-focus focus:border-action-primary-border sm:text-sm";
pub const SUBMIT_CLASS: &str = "group relative w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg_hover focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-action-primary-focus disabled:opacity-50";
pub const LINK_CLASS: &str = "font-medium text-link hover:text-link-hover text-sm";

#[component]
pub fn LoginForm(vm: LoginViewModel) -> impl IntoView {
    let username = vm.form.username;
    let password = vm.form.password;
    let pending = vm.login_action.pending();

    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit_login();
        }
    };
    let to_register = {
        let vm = vm.clone();
        move |_| vm.switch_mode(LoginMode::Register)
    };
    let to_reset = move |_| vm.switch_mode(LoginMode::Reset);

    view! {
        <form class="mt-8 space-y-6" on:submit=on_submit>
            <div class="space-y-3">
                <div>
                    <label for="username" class="sr-only">"Username"</label>
                    <input
                        id="username"
                        name="username"
                        type="text"
                        autocomplete="username"
                        class=INPUT_CLASS
                        placeholder="Username"
                        prop:value=username
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label for="password" class="sr-only">"Password"</label>
                    <input
                        id="password"
                        name="password"
                        type="password"
                        autocomplete="current-password"
                        class=INPUT_CLASS
                        placeholder="Password"
                        prop:value=password
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </div>
            </div>
            <button type="submit" class=SUBMIT_CLASS disabled=move || pending.get()>
                {move || if pending.get() { "Logging in..." } else { "Log in" }}
            </button>
            <div class="flex justify-between">
                <button type="button" class=LINK_CLASS on:click=to_register>
                    "Create an account"
                </button>
                <button type="button" class=LINK_CLASS on:click=to_reset>
                    "Forgot password?"
                </button>
            </div>
        </form>
    }
}
