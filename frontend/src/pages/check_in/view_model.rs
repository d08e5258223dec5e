use super::utils::{self, FieldWorkFormState, MakeupFormState};
use crate::{
    api::{ApiError, AttendanceClient, DayAttendance, FieldWorkRequest, MakeupRequest, Punch},
    state::use_services,
};
use chrono::{Local, NaiveDate, Utc};
use leptos::*;
use serde_json::Value;

#[derive(Clone, Copy)]
pub struct CheckInViewModel {
    pub employee_id: Option<i64>,
    pub today: NaiveDate,
    pub day: Resource<u32, Result<DayAttendance, ApiError>>,
    pub reload: RwSignal<u32>,
    pub field_work: FieldWorkFormState,
    pub makeup: MakeupFormState,
    pub error: RwSignal<Option<ApiError>>,
    pub notice: RwSignal<Option<String>>,
    pub punch_action: Action<(i64, Punch), Result<Value, ApiError>>,
    pub field_work_action: Action<FieldWorkRequest, Result<Value, ApiError>>,
    pub makeup_action: Action<MakeupRequest, Result<Value, ApiError>>,
}

impl CheckInViewModel {
    pub fn refresh(&self) {
        self.reload.update(|n| *n += 1);
    }

    pub fn punch(&self, punch: Punch) {
        if self.punch_action.pending().get_untracked() {
            return;
        }
        match utils::require_employee(self.employee_id) {
            Ok(employee_id) => {
                self.error.set(None);
                self.punch_action.dispatch((employee_id, punch));
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn submit_field_work(&self) {
        if self.field_work_action.pending().get_untracked() {
            return;
        }
        match self.field_work.to_request(self.employee_id) {
            Ok(request) => {
                self.error.set(None);
                self.field_work_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn submit_makeup(&self) {
        if self.makeup_action.pending().get_untracked() {
            return;
        }
        match self.makeup.to_request(self.employee_id) {
            Ok(request) => {
                self.error.set(None);
                self.makeup_action.dispatch(request);
            }
            Err(err) => self.error.set(Some(err)),
        }
    }
}

fn on_success(
    outcome: RwSignal<Option<Result<Value, ApiError>>>,
    error: RwSignal<Option<ApiError>>,
    notice: RwSignal<Option<String>>,
    reload: RwSignal<u32>,
    message: &'static str,
    after: impl Fn() + 'static,
) {
    create_effect(move |_| match outcome.get() {
        Some(Ok(_)) => {
            error.set(None);
            notice.set(Some(message.to_string()));
            after();
            reload.update(|n| *n += 1);
        }
        Some(Err(err)) => error.set(Some(err)),
        None => {}
    });
}

pub fn use_check_in_view_model() -> CheckInViewModel {
    let services = use_services();
    let employee_id = services.session.user().and_then(|user| user.employee_id);
    let client: AttendanceClient = services.api.attendance();
    let today = Local::now().date_naive();

    let reload = create_rw_signal(0u32);
    let error = create_rw_signal(None::<ApiError>);
    let notice = create_rw_signal(None::<String>);
    let field_work = FieldWorkFormState::default();
    let makeup = MakeupFormState::new(today);

    let day_client = client.clone();
    let day = create_resource(
        move || reload.get(),
        move |_| {
            let client = day_client.clone();
            async move { client.day(today).await }
        },
    );

    let punch_client = client.clone();
    let punch_action = create_action(move |(employee_id, punch): &(i64, Punch)| {
        let client = punch_client.clone();
        let (employee_id, punch) = (*employee_id, *punch);
        async move { client.punch(employee_id, punch, Utc::now()).await }
    });

    let field_client = client.clone();
    let field_work_action = create_action(move |request: &FieldWorkRequest| {
        let client = field_client.clone();
        let request = request.clone();
        async move { client.field_work(&request).await }
    });

    let makeup_client = client;
    let makeup_action = create_action(move |request: &MakeupRequest| {
        let client = makeup_client.clone();
        let request = request.clone();
        async move { client.makeup(&request).await }
    });

    on_success(punch_action.value(), error, notice, reload, "Punch recorded", || ());
    on_success(
        field_work_action.value(),
        error,
        notice,
        reload,
        "Field work recorded",
        move || field_work.clear(),
    );
    on_success(
        makeup_action.value(),
        error,
        notice,
        reload,
        "Makeup request submitted",
        move || makeup.reset(today),
    );

    CheckInViewModel {
        employee_id,
        today,
        day,
        reload,
        field_work,
        makeup,
        error,
        notice,
        punch_action,
        field_work_action,
        makeup_action,
    }
}
