use super::{
    utils,
    view_model::{use_resource_view_model, ResourceViewModel},
};
use crate::{
    api::{EmployeeFile, RecordPage, Resource},
    components::{
        empty_state::EmptyState,
        error::InlineErrorMessage,
        layout::{Layout, LoadingSpinner, SuccessMessage},
    },
    pages::login::components::form::INPUT_CLASS,
};
use leptos::{ev::SubmitEvent, *};
use serde_json::Value;

fn upload_controls(vm: ResourceViewModel, id: &str) -> View {
    EmployeeFile::ALL
        .into_iter()
        .map(|kind| {
            let id = id.to_string();
            view! {
                <label class="text-sm text-link cursor-pointer">
                    {kind.label()}
                    <input
                        type="file"
                        class="hidden"
                        name={format!("{}_upload", kind.label().to_lowercase())}
                        accept={utils::accept_attr(kind)}
                        on:change=move |ev| vm.pick(kind, id.clone(), ev)
                    />
                </label>
            }
        })
        .collect_view()
}

#[component]
fn RecordEditor(vm: ResourceViewModel) -> impl IntoView {
    let editor = vm.editor;
    let draft = vm.draft;
    let saving = vm.save_action.pending();
    let loading = vm.load_action.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        vm.save();
    };

    view! {
        <Show when=move || editor.get().is_open()>
            <form class="bg-surface-elevated shadow rounded-lg p-6 space-y-3" on:submit=on_submit>
                <h2 class="text-lg font-medium text-fg">{move || editor.get().title()}</h2>
                <textarea
                    name="record_json"
                    rows="10"
                    class={format!("{} font-mono", INPUT_CLASS)}
                    prop:value=draft
                    disabled=move || loading.get()
                    on:input=move |ev| draft.set(event_target_value(&ev))
                ></textarea>
                <div class="flex justify-end space-x-2">
                    <button type="button" class="text-sm text-fg-muted" on:click=move |_| vm.cancel_edit()>
                        "Cancel"
                    </button>
                    <button
                        type="submit"
                        class="px-4 py-2 rounded-md text-sm font-medium text-action-primary-text bg-action-primary-bg disabled:opacity-50"
                        disabled=move || { saving.get() || loading.get() }
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </Show>
    }
}

fn row_actions(vm: ResourceViewModel, record: &Value) -> View {
    let Some(id) = utils::record_id(record) else {
        return ().into_view();
    };
    let approvable = vm.resource.supports_approval() && utils::is_pending(record);
    let (approve_id, reject_id, edit_id) = (id.clone(), id.clone(), id.clone());
    let uploads = if vm.resource == Resource::Employees {
        upload_controls(vm, &id)
    } else {
        ().into_view()
    };
    view! {
        <td class="px-4 py-2 space-x-2 whitespace-nowrap text-right">
            {uploads}
            <button class="text-sm text-link" on:click=move |_| vm.start_edit(edit_id.clone())>
                "Edit"
            </button>
            <Show when=move || approvable>
                <button class="text-sm text-status-success-text" on:click={
                    let id = approve_id.clone();
                    move |_| vm.decide(id.clone(), true)
                }>"Approve"</button>
                <button class="text-sm text-status-warning-text" on:click={
                    let id = reject_id.clone();
                    move |_| vm.decide(id.clone(), false)
                }>"Reject"</button>
            </Show>
            <button class="text-sm text-status-error-text" on:click=move |_| vm.delete(id.clone())>
                "Delete"
            </button>
        </td>
    }
    .into_view()
}

fn records_table(vm: ResourceViewModel, page: RecordPage) -> View {
    if page.items.is_empty() {
        return view! {
            <EmptyState
                title=format!("No {} yet", vm.resource.title().to_lowercase())
                description="Records appear here once they are created."
            />
        }
        .into_view();
    }
    let columns = utils::columns(&page.items);
    let header = columns
        .iter()
        .map(|column| {
            view! {
                <th class="px-4 py-2 text-left text-xs font-medium text-fg-muted uppercase">
                    {utils::header_label(column)}
                </th>
            }
        })
        .collect_view();
    let rows = page
        .items
        .iter()
        .map(|record| {
            let cells = columns
                .iter()
                .map(|column| {
                    view! {
                        <td class="px-4 py-2 text-sm text-fg">
                            {utils::cell_text(record.get(column))}
                        </td>
                    }
                })
                .collect_view();
            view! { <tr class="border-t border-border">{cells}{row_actions(vm, record)}</tr> }
        })
        .collect_view();
    let current = vm.page.get_untracked();
    let last = utils::last_page(page.total);
    view! {
        <div class="overflow-x-auto bg-surface-elevated shadow rounded-lg">
            <table class="min-w-full">
                <thead><tr>{header}<th></th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
        <div class="flex justify-between items-center mt-4 text-sm text-fg-muted">
            <span>{format!("{} records", page.total)}</span>
            <div class="space-x-2">
                <button disabled={current <= 1} on:click=move |_| vm.go_to(current.saturating_sub(1))>"Previous"</button>
                <span>{format!("Page {} of {}", current, last)}</span>
                <button disabled={current >= last} on:click=move |_| vm.go_to(current + 1)>"Next"</button>
            </div>
        </div>
    }
    .into_view()
}

#[component]
pub fn ResourcePage(resource: Resource) -> impl IntoView {
    let vm = use_resource_view_model(resource);
    let records = vm.records;
    let error = vm.error;
    let notice = vm.notice;
    let load_error = Signal::derive(move || {
        error
            .get()
            .or_else(|| records.get().and_then(|result| result.err()))
    });

    view! {
        <Layout>
            <div class="space-y-6">
                <div class="flex justify-between items-center">
                    <h1 class="text-2xl font-bold text-fg">{resource.title()}</h1>
                    <div class="space-x-4">
                        <button class="text-sm text-link" on:click=move |_| vm.start_create()>"New"</button>
                        <button class="text-sm text-link" on:click=move |_| vm.refresh()>"Refresh"</button>
                    </div>
                </div>
                {move || notice.get().map(|message| view! { <SuccessMessage message=message /> })}
                <InlineErrorMessage error=load_error />
                <RecordEditor vm=vm />
                {move || match records.get() {
                    None => view! { <LoadingSpinner /> }.into_view(),
                    Some(Ok(page)) => records_table(vm, page),
                    Some(Err(_)) => ().into_view(),
                }}
            </div>
        </Layout>
    }
}
