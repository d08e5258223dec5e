use super::{
    utils::punch_time,
    view_model::{use_check_in_view_model, CheckInViewModel},
};
use crate::{
    api::{DayAttendance, Punch},
    components::{
        error::InlineErrorMessage,
        layout::{Layout, LoadingSpinner, SuccessMessage},
    },
    pages::login::components::form::{INPUT_CLASS, SUBMIT_CLASS},
};
use leptos::{ev::SubmitEvent, *};

const CARD_CLASS: &str = "bg-surface-elevated shadow rounded-lg p-6";

fn day_summary(day: &DayAttendance) -> View {
    let check_in = punch_time(day.check_in.as_deref());
    let check_out = punch_time(day.check_out.as_deref());
    view! {
        <dl class="grid grid-cols-2 gap-4">
            <div>
                <dt class="text-sm text-fg-muted">"Check in"</dt>
                <dd class="text-xl font-semibold text-fg" data-testid="check-in-time">{check_in}</dd>
            </div>
            <div>
                <dt class="text-sm text-fg-muted">"Check out"</dt>
                <dd class="text-xl font-semibold text-fg" data-testid="check-out-time">{check_out}</dd>
            </div>
        </dl>
    }
    .into_view()
}

fn punch_button(vm: CheckInViewModel, punch: Punch, day: Signal<DayAttendance>) -> impl IntoView {
    let pending = vm.punch_action.pending();
    view! {
        <button
            class="px-4 py-2 rounded-md text-sm font-medium text-action-primary-text bg-action-primary-bg disabled:opacity-50"
            disabled=move || { pending.get() || !day.get().can_punch(punch) }
            on:click=move |_| vm.punch(punch)
        >
            {punch.label()}
        </button>
    }
}

#[component]
fn FieldWorkForm(vm: CheckInViewModel) -> impl IntoView {
    let form = vm.field_work;
    let pending = vm.field_work_action.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        vm.submit_field_work();
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <input
                name="location"
                type="text"
                class=INPUT_CLASS
                placeholder="Location"
                prop:value=form.location
                on:input=move |ev| form.location.set(event_target_value(&ev))
            />
            <textarea
                name="field_reason"
                class=INPUT_CLASS
                placeholder="Reason"
                prop:value=form.reason
                on:input=move |ev| form.reason.set(event_target_value(&ev))
            ></textarea>
            <button type="submit" class=SUBMIT_CLASS disabled=move || pending.get()>
                "Record field work"
            </button>
        </form>
    }
}

#[component]
fn MakeupForm(vm: CheckInViewModel) -> impl IntoView {
    let form = vm.makeup;
    let pending = vm.makeup_action.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        vm.submit_makeup();
    };
    let on_punch = move |ev| {
        let punch = match event_target_value(&ev).as_str() {
            "check_out" => Punch::CheckOut,
            _ => Punch::CheckIn,
        };
        form.punch.set(punch);
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <input
                name="makeup_date"
                type="date"
                class=INPUT_CLASS
                prop:value=form.date
                on:input=move |ev| form.date.set(event_target_value(&ev))
            />
            <select name="makeup_type" class=INPUT_CLASS on:change=on_punch>
                <option value="check_in" selected=move || form.punch.get() == Punch::CheckIn>
                    "Check in"
                </option>
                <option value="check_out" selected=move || form.punch.get() == Punch::CheckOut>
                    "Check out"
                </option>
            </select>
            <textarea
                name="makeup_reason"
                class=INPUT_CLASS
                placeholder="Reason"
                prop:value=form.reason
                on:input=move |ev| form.reason.set(event_target_value(&ev))
            ></textarea>
            <button type="submit" class=SUBMIT_CLASS disabled=move || pending.get()>
                "Request makeup"
            </button>
        </form>
    }
}

#[component]
pub fn CheckInPage() -> impl IntoView {
    let vm = use_check_in_view_model();
    let day = vm.day;
    let error = vm.error;
    let notice = vm.notice;
    let shown_error = Signal::derive(move || {
        error
            .get()
            .or_else(|| day.get().and_then(|result| result.err()))
    });
    let loaded = Signal::derive(move || {
        day.get()
            .and_then(|result| result.ok())
            .unwrap_or_default()
    });
    let today = vm.today.format("%Y-%m-%d").to_string();

    view! {
        <Layout>
            <div class="max-w-2xl space-y-6">
                <div class="flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-fg">"Attendance"</h1>
                    <button class="text-sm text-link" on:click=move |_| vm.refresh()>"Refresh"</button>
                </div>
                {move || notice.get().map(|message| view! { <SuccessMessage message=message /> })}
                <InlineErrorMessage error=shown_error />
                <section class=CARD_CLASS>
                    <h2 class="text-lg font-medium text-fg mb-4">"Today " {today}</h2>
                    {move || match day.get() {
                        None => view! { <LoadingSpinner /> }.into_view(),
                        Some(Ok(record)) => day_summary(&record),
                        Some(Err(_)) => ().into_view(),
                    }}
                    <div class="flex space-x-3 mt-4">
                        {punch_button(vm, Punch::CheckIn, loaded)}
                        {punch_button(vm, Punch::CheckOut, loaded)}
                    </div>
                </section>
                <section class=CARD_CLASS>
                    <h2 class="text-lg font-medium text-fg mb-4">"Field work"</h2>
                    <FieldWorkForm vm=vm />
                </section>
                <section class=CARD_CLASS>
                    <h2 class="text-lg font-medium text-fg mb-4">"Makeup punch"</h2>
                    <MakeupForm vm=vm />
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

    fn has_disabled_attr(html: &str) -> bool {
        html.matches("disabled").count() > html.matches("disabled:").count()
    }

    #[test]
    fn check_in_page_renders_today_and_forms() {
        let fixture = services_at("http://127.0.0.1:9", "/attendance/check-in");
        fixture.sign_in("tok-1");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(Some(alice()));
            view! { <CheckInPage /> }
        });
        assert!(html.contains("Attendance"));
        assert!(html.contains("animate-spin"));
        assert!(html.contains("name=\"location\""));
        assert!(html.contains("name=\"makeup_date\""));
        assert!(html.contains("Request makeup"));
    }

    #[test]
    fn summary_shows_missing_punches() {
        let day = DayAttendance {
            check_in: Some("09:01:00".into()),
            check_out: None,
        };
        let html = render_to_string(move || day_summary(&day));
        assert!(html.contains("09:01:00"));
        assert!(html.contains("Not yet"));
    }

    #[test]
    fn check_out_stays_disabled_before_check_in() {
        let fixture = services_at("http://127.0.0.1:9", "/attendance/check-in");
        fixture.sign_in("tok-1");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            let vm = use_check_in_view_model();
            let day = Signal::derive(DayAttendance::default);
            view! {
                <div>
                    {punch_button(vm, Punch::CheckIn, day)}
                    {punch_button(vm, Punch::CheckOut, day)}
                </div>
            }
        });
        let check_out = html
            .split("<button")
            .find(|chunk| chunk.contains("Check out"))
            .unwrap_or_default();
        let check_in = html
            .split("<button")
            .find(|chunk| chunk.contains("Check in"))
            .unwrap_or_default();
        assert!(has_disabled_attr(check_out));
        assert!(!has_disabled_attr(check_in));
    }
}
