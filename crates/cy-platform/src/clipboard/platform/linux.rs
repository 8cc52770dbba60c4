use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clipboard_rs::ClipboardContext;
use tracing::debug;

use cy_core::ports::SystemClipboardPort;

use super::super::common::{self, CommonClipboardImpl};
use super::super::file_ref;

const URI_LIST: &str = "text/uri-list";

/// X11 / Wayland clipboard; files travel as `text/uri-list`.
pub struct LinuxClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl LinuxClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(common::new_context()?)),
        })
    }
}

impl SystemClipboardPort for LinuxClipboard {
    fn read_file_reference(&self) -> Result<Option<PathBuf>> {
        let ctx = common::lock(&self.inner)?;
        if let Some(path) = CommonClipboardImpl::read_files(&ctx)? {
            return Ok(Some(path));
        }
        Ok(CommonClipboardImpl::read_buffer(&ctx, URI_LIST)?
            .and_then(|raw| file_ref::decode_uri_list(&raw)))
    }

    fn read_image(&self) -> Result<Option<Vec<u8>>> {
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::read_image(&ctx)
    }

    fn read_text(&self) -> Result<Option<String>> {
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::read_text(&ctx)
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::write_text(&ctx, text)
    }

    fn write_image(&self, png: &[u8]) -> Result<()> {
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::write_image(&ctx, png)
    }

    fn write_file_reference(&self, path: &Path) -> Result<()> {
        let uri = file_ref::encode_file_url(path);
        debug!(uri = %uri, "Writing file reference");
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::write_files(&ctx, vec![uri])
    }
}
