use super::{
    repository::{share_percent, DashboardStats, NamedCount},
    view_model::use_dashboard_view_model,
};
use crate::components::{
    error::InlineErrorMessage,
    layout::{Layout, LoadingSpinner},
};
use leptos::*;

#[component]
fn StatCard(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="bg-surface-elevated shadow rounded-lg p-6">
            <p class="text-sm text-fg-muted">{label}</p>
            <p class="mt-2 text-3xl font-semibold text-fg">{value}</p>
        </div>
    }
}

#[component]
fn Distribution(title: &'static str, rows: Vec<NamedCount>, total: u64) -> impl IntoView {
    view! {
        <div class="bg-surface-elevated shadow rounded-lg p-6">
            <h3 class="text-lg font-medium text-fg mb-4">{title}</h3>
            {if rows.is_empty() {
                view! { <p class="text-sm text-fg-muted">"No data"</p> }.into_view()
            } else {
                rows.into_iter()
                    .map(|row| {
                        let percent = share_percent(row.value, total);
                        view! {
                            <div class="mb-3">
                                <div class="flex justify-between text-sm">
                                    <span>{row.name}</span>
                                    <span>{row.value}</span>
                                </div>
                                <div class="h-2 bg-border rounded">
                                    <div
                                        class="h-2 bg-action-primary-bg rounded"
                                        style=format!("width: {}%", percent)
                                    ></div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

fn stats_view(stats: DashboardStats) -> View {
    let total = stats.total_employees;
    view! {
        <div class="grid grid-cols-1 gap-6 md:grid-cols-3">
            <StatCard label="Employees" value=stats.total_employees />
            <StatCard label="Departments" value=stats.total_departments />
            <StatCard label="Positions" value=stats.total_positions />
        </div>
        <div class="grid grid-cols-1 gap-6 lg:grid-cols-2 mt-6">
            <Distribution title="Employees by department" rows=stats.department_stats total=total />
            <Distribution title="Employees by position" rows=stats.position_stats total=total />
        </div>
    }
    .into_view()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let vm = use_dashboard_view_model();
    let stats = vm.stats;
    let error = Signal::derive(move || stats.get().and_then(|result| result.err()));

    view! {
        <Layout>
            <div class="space-y-6">
                <div class="flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-fg">"Dashboard"</h1>
                    <button class="text-sm text-link" on:click=move |_| vm.refresh()>"Refresh"</button>
                </div>
                <InlineErrorMessage error=error />
                {move || match stats.get() {
                    None => view! { <LoadingSpinner /> }.into_view(),
                    Some(Ok(data)) => stats_view(data),
                    Some(Err(_)) => ().into_view(),
                }}
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
    fn dashboard_shows_spinner_until_stats_arrive() {
        let fixture = services_at("http://127.0.0.1:9", "/dashboard");
        let services = fixture.services.clone();
        let html = render_to_string(move || {
            provide_context(services);
            provide_auth(Some(alice()));
            view! { <DashboardPage /> }
        });
        assert!(html.contains("Dashboard"));
        assert!(html.contains("animate-spin"));
    }

    #[test]
    fn stats_view_renders_cards_and_distribution() {
        let html = render_to_string(move || {
            stats_view(DashboardStats {
                total_employees: 4,
                total_departments: 2,
                total_positions: 1,
                department_stats: vec![NamedCount {
                    name: "Finance".into(),
                    value: 1,
                }],
                position_stats: Vec::new(),
            })
        });
        assert!(html.contains("Finance"));
        assert!(html.contains("width: 25%"));
        assert!(html.contains("No data"));
    }
}
