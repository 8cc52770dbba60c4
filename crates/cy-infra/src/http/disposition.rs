//! Filename recovery for binary downloads.

use std::path::Path;

use percent_encoding::percent_decode_str;

pub const DEFAULT_FILE_NAME: &str = "downloaded_file";

/// Name from `content-disposition`, else [`DEFAULT_FILE_NAME`]; an extension
/// is appended from `content-type` when the name has none.
pub fn resolve_file_name(disposition: Option<&str>, content_type: Option<&str>) -> String {
    let name = disposition
        .and_then(parse_disposition)
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    if Path::new(&name).extension().is_some() {
        return name;
    }
    match content_type.and_then(extension_for) {
        Some(ext) => format!("{name}.{ext}"),
        None => name,
    }
}

fn parse_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => extended = decode_ext_value(value.trim()),
            "filename" => plain = Some(value.trim().trim_matches('"').to_string()),
            _ => {}
        }
    }

    extended
        .or(plain)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// RFC 5987 `charset'lang'percent-encoded`.
fn decode_ext_value(value: &str) -> Option<String> {
    let encoded = value.splitn(3, '\'').nth(2)?;
    percent_decode_str(encoded.trim_matches('"'))
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "text/plain" => Some("txt"),
        "application/pdf" => Some("pdf"),
        "application/zip" => Some("zip"),
        "application/json" => Some("json"),
        "application/octet-stream" => None,
        _ => mime_guess::get_mime_extensions_str(&essence).and_then(|exts| exts.first().copied()),
    }
}
