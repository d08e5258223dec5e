use crate::api::{ApiError, ErrorKind};
use leptos::*;

fn detail_lines(error: &ApiError) -> Vec<String> {
    if error.kind != ErrorKind::Validation && error.kind != ErrorKind::Business {
        return Vec::new();
    }
    error
        .data
        .as_ref()
        .and_then(|data| data.get("errors"))
        .and_then(|errors| errors.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|err| err.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[component]
pub fn InlineErrorMessage(error: Signal<Option<ApiError>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ()>
            <div class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded space-y-1 my-2">
                <div class="font-bold">{move || error.get().map(|e| e.message).unwrap_or_default()}</div>
                {move || error.get().map(|e| {
                    let details = detail_lines(&e);
                    if !details.is_empty() {
                        return view! {
                            <ul class="list-disc list-inside text-sm">
                                {details.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                            </ul>
                        }.into_view();
                    }
                    match (e.code, e.status) {
                        (Some(code), _) => {
                            view! { <div class="text-xs opacity-75">{"Code: "}{code}</div> }.into_view()
                        }
                        (None, Some(status)) => {
                            view! { <div class="text-xs opacity-75">{"HTTP "}{status}</div> }.into_view()
                        }
                        _ => ().into_view(),
                    }
                }).unwrap_or_else(|| ().into_view())}
            </div>
        </Show>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;
    use serde_json::json;

    #[test]
    fn inline_error_renders_business_details() {
        let html = render_to_string(move || {
            let error = ApiError::business(
                Some(400),
                "Validation failed",
                json!({"errors": ["Name is required", "Email is invalid"]}),
            );
            let signal = create_rw_signal(Some(error));
            view! { <InlineErrorMessage error={signal.into()} /> }
        });
        assert!(html.contains("Validation failed"));
        assert!(html.contains("Name is required"));
        assert!(html.contains("Email is invalid"));
    }

    #[test]
    fn inline_error_renders_code_when_present() {
        let html = render_to_string(move || {
            let error = ApiError::business(Some(4001), "Department exists", json!(null));
            let signal = create_rw_signal(Some(error));
            view! { <InlineErrorMessage error={signal.into()} /> }
        });
        assert!(html.contains("Department exists"));
        assert!(html.contains("4001"));
    }

    #[test]
    fn inline_error_falls_back_to_status() {
        let html = render_to_string(move || {
            let error = ApiError::http(502, "Bad gateway", json!(null));
            let signal = create_rw_signal(Some(error));
            view! { <InlineErrorMessage error={signal.into()} /> }
        });
        assert!(html.contains("HTTP"));
        assert!(html.contains("502"));
    }

    #[test]
    fn nothing_renders_without_error() {
        let html = render_to_string(move || {
            let signal = create_rw_signal(None::<ApiError>);
            view! { <InlineErrorMessage error={signal.into()} /> }
        });
        assert!(!html.contains("status-error"));
    }
}
