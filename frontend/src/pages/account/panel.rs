use super::{
    utils::profile_rows,
    view_model::{use_account_view_model, AccountViewModel},
};
use crate::{
    api::User,
    components::{
        error::InlineErrorMessage,
        layout::{Layout, LoadingSpinner, SuccessMessage},
    },
    pages::login::components::form::{INPUT_CLASS, SUBMIT_CLASS},
};
use leptos::{ev::SubmitEvent, *};

fn profile_card(user: User) -> View {
    let rows = profile_rows(&user)
        .into_iter()
        .map(|(label, value)| {
            view! {
                <div class="flex justify-between py-2 text-sm">
                    <dt class="text-fg-muted">{label}</dt>
                    <dd class="text-fg">{value}</dd>
                </div>
            }
        })
        .collect_view();
    view! { <dl class="divide-y divide-border">{rows}</dl> }.into_view()
}

#[component]
fn PasswordForm(vm: AccountViewModel) -> impl IntoView {
    let form = vm.form;
    let pending = vm.change_action.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        vm.submit();
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <input
                name="current_password"
                type="password"
                autocomplete="current-password"
                class=INPUT_CLASS
                placeholder="Current password"
                prop:value=form.current
                on:input=move |ev| form.current.set(event_target_value(&ev))
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
                {move || if pending.get() { "Saving..." } else { "Change password" }}
            </button>
        </form>
    }
}

#[component]
pub fn AccountPage() -> impl IntoView {
    let vm = use_account_view_model();
    let profile = vm.profile;
    let error = vm.error;
    let notice = vm.notice;
    let shown_error = Signal::derive(move || {
        error
            .get()
            .or_else(|| profile.get().and_then(|result| result.err()))
    });

    view! {
        <Layout>
            <div class="max-w-xl space-y-6">
                <div class="flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-fg">"Account"</h1>
                    <button class="text-sm text-link" on:click=move |_| vm.refresh()>"Refresh"</button>
                </div>
                {move || notice.get().map(|message| view! { <SuccessMessage message=message /> })}
                <InlineErrorMessage error=shown_error />
                <section class="bg-surface-elevated shadow rounded-lg p-6">
                    <h2 class="text-lg font-medium text-fg mb-2">"Profile"</h2>
                    {move || match profile.get() {
                        None => view! { <LoadingSpinner /> }.into_view(),
                        Some(Ok(user)) => profile_card(user),
                        Some(Err(_)) => ().into_view(),
                    }}
                </section>
                <section class="bg-surface-elevated shadow rounded-lg p-6">
                    <h2 class="text-lg font-medium text-fg mb-4">"Change password"</h2>
                    <PasswordForm vm=vm />
                </section>
            </div>
        </Layout>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::{
        helpers::{alice, provide_auth, services_at},
        ssr::render_to_string,
    };

    #[test]
    fn account_page_renders_profile_spinner_and_form() {
        let fixture = services_at("http://127.0.0.1:9", "/account");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(Some(alice()));
            view! { <AccountPage /> }
        });
        assert!(html.contains("Profile"));
        assert!(html.contains("animate-spin"));
        assert!(html.contains("current_password"));
        assert!(html.contains("Change password"));
    }

    #[test]
    fn profile_card_lists_user_fields() {
        let html = render_to_string(|| profile_card(alice()));
        assert!(html.contains("alice@example.com"));
        assert!(html.contains("Employee ID"));
    }
}
