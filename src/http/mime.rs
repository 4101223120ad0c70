//! Content types derived from a target's extension.

/// Type used when the target has no extension at all.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maps an extension to a content type.
///
/// `css`, `html` and `txt` are text; `js` is `application/javascript`;
/// anything else becomes `application/<ext>`.
pub fn content_type_for(extension: Option<&str>) -> String {
    let Some(ext) = extension.filter(|e| !e.is_empty()) else {
        return DEFAULT_CONTENT_TYPE.to_string();
    };

    let ext = ext.to_ascii_lowercase();
    match ext.as_str() {
        "css" | "html" | "txt" => format!("text/{ext}"),
        "js" => "application/javascript".to_string(),
        _ => format!("application/{ext}"),
    }
}

/// Whether a body of this type is offered as a download.
pub fn is_attachment(content_type: &str) -> bool {
    !(content_type.starts_with("text/")
        || content_type == "application/javascript"
        || content_type == "application/json")
}
