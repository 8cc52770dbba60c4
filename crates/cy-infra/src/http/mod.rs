//! Cloud clipboard HTTP API.
//!
//! - `POST {base}/app/copy`: JSON `{"text": ...}` or multipart field `file`
//! - `GET {base}/app/paste/latest`: JSON metadata first; non-text content is
//!   fetched again with a binary `Accept` header

mod client;
mod disposition;
mod wire;

pub use client::ReqwestClipboardTransport;
pub use disposition::{resolve_file_name, DEFAULT_FILE_NAME};
