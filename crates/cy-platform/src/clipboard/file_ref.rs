//! Decoding and encoding of clipboard file references.
//!
//! Each OS exposes copied files differently:
//!
//! - Linux: `text/uri-list`, one `file://` URI per line, `#` comments allowed
//! - macOS: `public.file-url`, a single percent-encoded `file://` URL
//! - Windows: `FileNameW`, a null-terminated UTF-16LE path
//!
//! Only the first entry is used. Decoded Windows paths get `\` separators;
//! POSIX paths are left as they are.

use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

const PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const FILE_SCHEME: &str = "file://";

/// First usable path in a `text/uri-list` or `public.file-url` buffer.
pub fn decode_uri_list(raw: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(decode_file_entry)
}

/// First path in a `FileNameW` buffer.
pub fn decode_file_name_w(raw: &[u8]) -> Option<PathBuf> {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    units
        .split(|unit| *unit == 0)
        .find(|entry| !entry.is_empty())
        .map(String::from_utf16_lossy)
        .and_then(|entry| decode_file_entry(&entry))
}

/// A single entry: either a `file://` URI or a bare path.
pub fn decode_file_entry(entry: &str) -> Option<PathBuf> {
    let entry = entry.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if entry.is_empty() {
        return None;
    }

    let raw = match strip_file_scheme(entry) {
        Some(rest) => {
            let decoded = percent_decode_str(rest).decode_utf8_lossy().into_owned();
            let decoded = strip_drive_slash(&decoded).to_string();
            if decoded.starts_with('/') || has_drive_letter(&decoded) {
                decoded
            } else {
                // file://server/share
                format!("//{decoded}")
            }
        }
        None if entry.contains("://") => return None,
        None => entry.to_string(),
    };

    Some(PathBuf::from(normalize_separators(raw)))
}

/// `file://` URL for a local path, as written to `text/uri-list` and
/// `public.file-url`.
pub fn encode_file_url(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let raw = if is_windows_path(&raw) {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    };
    let encoded = utf8_percent_encode(&raw, PATH_SET);

    if raw.starts_with("//") {
        format!("file:{encoded}")
    } else if raw.starts_with('/') {
        format!("{FILE_SCHEME}{encoded}")
    } else {
        format!("{FILE_SCHEME}/{encoded}")
    }
}

/// Null-terminated UTF-16LE path for `FileNameW`.
pub fn encode_file_name_w(path: &Path) -> Vec<u8> {
    let mut out: Vec<u8> = path
        .to_string_lossy()
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    out.extend_from_slice(&[0, 0]);
    out
}

fn strip_file_scheme(entry: &str) -> Option<&str> {
    let scheme = entry.get(..FILE_SCHEME.len())?;
    if !scheme.eq_ignore_ascii_case(FILE_SCHEME) {
        return None;
    }
    let rest = &entry[FILE_SCHEME.len()..];
    match rest.strip_prefix("localhost") {
        Some(local) if local.starts_with('/') => Some(local),
        _ => Some(rest),
    }
}

/// `/C:/Users` → `C:/Users`
fn strip_drive_slash(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) if has_drive_letter(rest) => rest,
        _ => path,
    }
}

fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn is_windows_path(path: &str) -> bool {
    has_drive_letter(path) || path.starts_with("\\\\") || path.starts_with("//")
}

fn normalize_separators(path: String) -> String {
    if is_windows_path(&path) {
        path.replace('/', "\\")
    } else {
        path
    }
}
