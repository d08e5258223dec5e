use super::repository::{self, DashboardStats};
use crate::{api::ApiError, state::use_services};
use leptos::*;

#[derive(Clone, Copy)]
pub struct DashboardViewModel {
    pub stats: Resource<u32, Result<DashboardStats, ApiError>>,
    pub reload: RwSignal<u32>,
}

impl DashboardViewModel {
    pub fn refresh(&self) {
        self.reload.update(|n| *n += 1);
    }
}

pub fn use_dashboard_view_model() -> DashboardViewModel {
    let api = use_services().api;
    let reload = create_rw_signal(0u32);
    let stats = create_resource(
        move || reload.get(),
        move |_| {
            let api = api.clone();
            async move { repository::fetch_stats(&api).await }
        },
    );
    DashboardViewModel { stats, reload }
}
