use super::form::{INPUT_CLASS, LINK_CLASS, SUBMIT_CLASS};
use crate::{
    pages::login::{
        utils::strength_label,
        view_model::{LoginMode, LoginViewModel},
    },
    utils::validation::password_strength,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn PasswordStrength(#[prop(into)] password: Signal<String>) -> impl IntoView {
    let score = move || password_strength(&password.get());
    view! {
        <Show when=move || !password.get().is_empty()>
            <div class="flex items-center space-x-2 text-xs text-fg-muted">
                <div class="flex space-x-1">
                    {move || {
                        let filled = score();
                        (1..=4u8)
                            .map(|step| {
                                let class = if step <= filled {
                                    "h-1 w-6 rounded bg-action-primary-bg"
                                } else {
                                    "h-1 w-6 rounded bg-border"
                                };
                                view! { <span class=class></span> }
                            })
                            .collect_view()
                    }}
                </div>
                <span>{move || strength_label(score())}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn RegisterForm(vm: LoginViewModel) -> impl IntoView {
    let form = vm.register;
    let pending = vm.register_action.pending();

    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit_register();
        }
    };
    let back = move |_| vm.switch_mode(LoginMode::Login);

    view! {
        <form class="mt-8 space-y-4" on:submit=on_submit>
            <input
                name="username"
                type="text"
                autocomplete="username"
                class=INPUT_CLASS
                placeholder="Username (3-20 characters)"
                prop:value=form.username
                on:input=move |ev| form.username.set(event_target_value(&ev))
            />
            <input
                name="email"
                type="email"
                autocomplete="email"
                class=INPUT_CLASS
                placeholder="Email"
                prop:value=form.email
                on:input=move |ev| form.email.set(event_target_value(&ev))
            />
            <input
                name="password"
                type="password"
                autocomplete="new-password"
                class=INPUT_CLASS
                placeholder="Password"
                prop:value=form.password
                on:input=move |ev| form.password.set(event_target_value(&ev))
            />
            <PasswordStrength password=form.password />
            <input
                name="confirm"
                type="password"
                autocomplete="new-password"
                class=INPUT_CLASS
                placeholder="Confirm password"
                prop:value=form.confirm
                on:input=move |ev| form.confirm.set(event_target_value(&ev))
            />
            <button type="submit" class=SUBMIT_CLASS disabled=move || pending.get()>
                {move || if pending.get() { "Registering..." } else { "Register" }}
            </button>
            <button type="button" class=LINK_CLASS on:click=back>
                "Back to login"
            </button>
        </form>
    }
}
