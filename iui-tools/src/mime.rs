use std::path::Path;

/// Extensions whose content type must not be left to the generic guesser.
/// Browsers refuse to stream-compile WebAssembly served without
/// `application/wasm`.
pub const OVERRIDES: &[(&str, &str)] = &[
    ("wasm", "application/wasm"),
    ("js", "application/javascript"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("svg", "image/svg+xml"),
];

pub const FALLBACK: &str = "application/octet-stream";

/// Looks the extension up in [`OVERRIDES`] only.
pub fn override_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    OVERRIDES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|&(_, content_type)| content_type)
}

/// Content type for a served file: the override table first, then
/// `mime_guess`, then [`FALLBACK`].
pub fn content_type(path: &Path) -> String {
    if let Some(content_type) = override_for(path) {
        return content_type.to_string();
    }
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK)
        .to_string()
}
