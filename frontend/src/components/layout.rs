use crate::{
    api::Resource,
    router::{ACCOUNT_PATH, CHECK_IN_PATH, LOGIN_PATH},
    state::{
        auth::{self, use_auth},
        use_services,
    },
};
use leptos::*;

const NAV_LINK: &str =
    "text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover";

fn nav_links(on_pick: impl Fn() + Clone + 'static) -> impl IntoView {
    let dashboard = {
        let on_pick = on_pick.clone();
        view! {
            <a href="/dashboard" class=NAV_LINK on:click=move |_| on_pick()>"Dashboard"</a>
        }
    };
    let resources = Resource::ALL
        .into_iter()
        .map(|resource| {
            let on_pick = on_pick.clone();
            view! {
                <a href=resource.route() class=NAV_LINK on:click=move |_| on_pick()>
                    {resource.title()}
                </a>
            }
        })
        .collect_view();
    let self_service = [(CHECK_IN_PATH, "Check in"), (ACCOUNT_PATH, "Account")]
        .into_iter()
        .map(|(href, title)| {
            let on_pick = on_pick.clone();
            view! { <a href=href class=NAV_LINK on:click=move |_| on_pick()>{title}</a> }
        })
        .collect_view();
    view! { {dashboard}{resources}{self_service} }
}

fn display_name(auth: &auth::AuthState) -> String {
    auth.user
        .as_ref()
        .map(|user| user.username.clone())
        .unwrap_or_default()
}

#[component]
pub fn Header() -> impl IntoView {
    let (auth, _set_auth) = use_auth();
    let navigator = use_services().navigator;
    let (menu_open, set_menu_open) = create_signal(false);
    let username = move || display_name(&auth.get());

    let logout_action = auth::use_logout_action();
    let logout_pending = logout_action.pending();
    create_effect(move |_| {
        if logout_action.value().get().is_some() {
            navigator.navigate(LOGIN_PATH);
        }
    });
    let on_logout = move |_| {
        if logout_pending.get_untracked() {
            return;
        }
        set_menu_open.set(false);
        logout_action.dispatch(());
    };
    let toggle_menu = move |_| set_menu_open.update(|open| *open = !*open);
    let close_menu = move || set_menu_open.set(false);

    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <h1 class="text-xl font-semibold text-fg">"HRMS"</h1>
                    <div class="flex items-center space-x-4">
                        <span class="text-sm text-fg-muted" data-testid="current-user">
                            {username}
                        </span>
                        <button
                            on:click=on_logout
                            class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium disabled:opacity-50 hover:bg-action-ghost-bg-hover"
                            disabled={move || logout_pending.get()}
                        >
                            "Log out"
                        </button>
                        <button
                            type="button"
                            class="lg:hidden inline-flex items-center justify-center p-2 rounded-md text-fg-muted hover:text-fg hover:bg-action-ghost-bg-hover"
                            on:click=toggle_menu
                            aria-expanded=move || menu_open.get()
                            aria-controls="mobile-nav"
                        >
                            <span class="sr-only">
                                {move || if menu_open.get() { "Close menu" } else { "Open menu" }}
                            </span>
                            "☰"
                        </button>
                    </div>
                </div>
                <nav class="hidden lg:flex flex-wrap gap-1 pb-2">
                    {nav_links(|| ())}
                </nav>
                <Show when=move || menu_open.get()>
                    <div id="mobile-nav" class="lg:hidden border-t border-border">
                        <nav class="px-4 py-3 flex flex-col space-y-1">
                            {nav_links(close_menu)}
                        </nav>
                    </div>
                </Show>
            </div>
        </header>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header/>
            <main class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">
                {children()}
            </main>
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[component]
pub fn SuccessMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-status-success-bg border border-status-success-border text-status-success-text px-4 py-3 rounded mb-4">
            <p class="text-sm">{message}</p>
        </div>
    }
}
