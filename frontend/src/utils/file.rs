use crate::api::ApiError;

/// A file chosen through `<input type="file">`, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Takes the first file off the input that fired `ev` and resets the input so
/// the same file can be picked again.
#[cfg(target_arch = "wasm32")]
pub fn take_picked(ev: &web_sys::Event) -> Option<web_sys::File> {
    use wasm_bindgen::JsCast;

    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    let file = input.files()?.get(0);
    input.set_value("");
    file
}

#[cfg(target_arch = "wasm32")]
pub async fn read_file(file: web_sys::File) -> Result<PickedFile, ApiError> {
    let name = file.name();
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| ApiError::validation(format!("Could not read {}", name)))?;
    Ok(PickedFile {
        name,
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}
