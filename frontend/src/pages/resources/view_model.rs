use super::utils::{self, EditorMode};
use crate::{
    api::{
        ApiError, ApprovalRequest, EmployeeFile, RecordPage, Resource as ApiResource,
        ResourceClient,
    },
    state::use_services,
    utils::file::PickedFile,
};
use leptos::*;
use serde_json::Value;

#[derive(Clone, Copy)]
pub struct ResourceViewModel {
    pub resource: ApiResource,
    pub page: RwSignal<u32>,
    pub reload: RwSignal<u32>,
    pub records: Resource<(u32, u32), Result<RecordPage, ApiError>>,
    pub error: RwSignal<Option<ApiError>>,
    pub delete_action: Action<String, Result<Value, ApiError>>,
    pub approve_action: Action<(String, ApprovalRequest), Result<Value, ApiError>>,
    pub notice: RwSignal<Option<String>>,
    pub editor: RwSignal<EditorMode>,
    pub draft: RwSignal<String>,
    pub load_action: Action<String, Result<Value, ApiError>>,
    pub save_action: Action<(EditorMode, Value), Result<Value, ApiError>>,
    pub upload_action: Action<(EmployeeFile, String, PickedFile), Result<Value, ApiError>>,
}

impl ResourceViewModel {
    pub fn go_to(&self, page: u32) {
        self.page.set(page.max(1));
    }

    pub fn refresh(&self) {
        self.reload.update(|n| *n += 1);
    }

    pub fn delete(&self, id: String) {
        if !self.delete_action.pending().get_untracked() {
            self.delete_action.dispatch(id);
        }
    }

    pub fn decide(&self, id: String, approved: bool) {
        if self.approve_action.pending().get_untracked() {
            return;
        }
        let status = if approved { "approved" } else { "rejected" };
        self.approve_action.dispatch((
            id,
            ApprovalRequest {
                status: status.into(),
                comment: None,
            },
        ));
    }

    pub fn start_create(&self) {
        self.error.set(None);
        self.draft.set("{\n}".into());
        self.editor.set(EditorMode::Create);
    }

    /// Opens the editor on `id`; the draft fills in once the record loads.
    pub fn start_edit(&self, id: String) {
        self.error.set(None);
        self.draft.set(String::new());
        self.editor.set(EditorMode::Edit(id.clone()));
        self.load_action.dispatch(id);
    }

    pub fn cancel_edit(&self) {
        self.editor.set(EditorMode::Closed);
        self.draft.set(String::new());
    }

    pub fn save(&self) {
        let mode = self.editor.get_untracked();
        if !mode.is_open() || self.save_action.pending().get_untracked() {
            return;
        }
        match utils::parse_draft(&self.draft.get_untracked()) {
            Ok(body) => {
                self.error.set(None);
                self.save_action.dispatch((mode, body));
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    pub fn upload(&self, kind: EmployeeFile, employee_id: String, file: PickedFile) {
        if self.upload_action.pending().get_untracked() {
            return;
        }
        match utils::check_upload(kind, &file.name, file.bytes.len()) {
            Ok(()) => {
                self.error.set(None);
                self.upload_action.dispatch((kind, employee_id, file));
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    /// Reads the file picked on the input behind `ev` and uploads it.
    #[cfg(target_arch = "wasm32")]
    pub fn pick(&self, kind: EmployeeFile, employee_id: String, ev: web_sys::Event) {
        use crate::utils::file;

        let Some(picked) = file::take_picked(&ev) else {
            return;
        };
        let vm = *self;
        spawn_local(async move {
            match file::read_file(picked).await {
                Ok(file) => vm.upload(kind, employee_id, file),
                Err(err) => vm.error.set(Some(err)),
            }
        });
    }

    /// Host builds have no file picker.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn pick(&self, _kind: EmployeeFile, _employee_id: String, _ev: web_sys::Event) {}
}

pub fn use_resource_view_model(resource: ApiResource) -> ResourceViewModel {
    let client = use_services().api.resource(resource);
    let page = create_rw_signal(1u32);
    let reload = create_rw_signal(0u32);
    let error = create_rw_signal(None::<ApiError>);

    let list_client = client.clone();
    let records = create_resource(
        move || (page.get(), reload.get()),
        move |(page, _)| {
            let client = list_client.clone();
            async move { client.list(&utils::page_query(page)).await }
        },
    );

    let delete_client = client.clone();
    let delete_action = create_action(move |id: &String| {
        let client: ResourceClient = delete_client.clone();
        let id = id.clone();
        async move { client.delete(&id).await }
    });

    let approve_client = client.clone();
    let approve_action = create_action(move |(id, request): &(String, ApprovalRequest)| {
        let client = approve_client.clone();
        let id = id.clone();
        let request = request.clone();
        async move { client.approve(&id, &request).await }
    });

    let load_client = client.clone();
    let load_action = create_action(move |id: &String| {
        let client = load_client.clone();
        let id = id.clone();
        async move { client.get(&id).await }
    });

    let save_client = client.clone();
    let save_action = create_action(move |(mode, body): &(EditorMode, Value)| {
        let client = save_client.clone();
        let (mode, body) = (mode.clone(), body.clone());
        async move {
            match mode {
                EditorMode::Edit(id) => client.update(&id, &body).await,
                EditorMode::Create | EditorMode::Closed => client.create(&body).await,
            }
        }
    });

    let upload_client = use_services().api;
    let upload_action = create_action(
        move |(kind, employee_id, file): &(EmployeeFile, String, PickedFile)| {
            let client = upload_client.clone();
            let (kind, employee_id, file) = (*kind, employee_id.clone(), file.clone());
            async move {
                client
                    .upload_employee_file(kind, &employee_id, &file.name, file.bytes)
                    .await
            }
        },
    );

    let notice = create_rw_signal(None::<String>);
    let editor = create_rw_signal(EditorMode::Closed);
    let draft = create_rw_signal(String::new());

    create_effect(move |_| match load_action.value().get() {
        Some(Ok(record)) => {
            if matches!(editor.get_untracked(), EditorMode::Edit(_)) {
                draft.set(utils::draft_from(&record));
            }
        }
        Some(Err(err)) => error.set(Some(err)),
        None => {}
    });

    create_effect(move |_| match save_action.value().get() {
        Some(Ok(_)) => {
            error.set(None);
            notice.set(Some("Record saved".into()));
            editor.set(EditorMode::Closed);
            draft.set(String::new());
            reload.update(|n| *n += 1);
        }
        Some(Err(err)) => error.set(Some(err)),
        None => {}
    });

    create_effect(move |_| match upload_action.value().get() {
        Some(Ok(_)) => {
            error.set(None);
            notice.set(Some("File uploaded".into()));
            reload.update(|n| *n += 1);
        }
        Some(Err(err)) => error.set(Some(err)),
        None => {}
    });

    for outcome in [delete_action.value(), approve_action.value()] {
        create_effect(move |_| match outcome.get() {
            Some(Ok(_)) => {
                error.set(None);
                reload.update(|n| *n += 1);
            }
            Some(Err(err)) => error.set(Some(err)),
            None => {}
        });
    }

    ResourceViewModel {
        resource,
        page,
        reload,
        records,
        error,
        delete_action,
        approve_action,
        notice,
        editor,
        draft,
        load_action,
        save_action,
        upload_action,
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::test_support::{helpers::services_at, ssr::with_runtime};

    #[test]
    fn editor_opens_for_create_and_closes_on_cancel() {
        let fixture = services_at("http://127.0.0.1:9", "/departments");
        let services = fixture.services.clone();
        with_runtime(move || {
            provide_context(services);
            let vm = use_resource_view_model(ApiResource::Departments);
            vm.start_create();
            assert_eq!(vm.editor.get(), EditorMode::Create);
            vm.cancel_edit();
            assert_eq!(vm.editor.get(), EditorMode::Closed);
            assert!(vm.draft.get().is_empty());
        });
    }

    #[test]
    fn malformed_draft_is_refused_locally() {
        let fixture = services_at("http://127.0.0.1:9", "/departments");
        let services = fixture.services.clone();
        with_runtime(move || {
            provide_context(services);
            let vm = use_resource_view_model(ApiResource::Departments);
            vm.start_create();
            vm.draft.set("not json".into());
            vm.save();
            assert_eq!(vm.error.get().map(|e| e.kind), Some(ErrorKind::Validation));
            assert!(vm.save_action.input().get().is_none());
            assert!(vm.editor.get().is_open());
        });
    }

    #[test]
    fn wrong_upload_type_never_dispatches() {
        let fixture = services_at("http://127.0.0.1:9", "/employees");
        let services = fixture.services.clone();
        with_runtime(move || {
            provide_context(services);
            let vm = use_resource_view_model(ApiResource::Employees);
            vm.upload(
                EmployeeFile::Photo,
                "7".into(),
                PickedFile {
                    name: "cv.pdf".into(),
                    bytes: vec![1, 2, 3],
                },
            );
            assert!(vm.error.get().is_some());
            assert!(vm.upload_action.input().get().is_none());
        });
    }
}
