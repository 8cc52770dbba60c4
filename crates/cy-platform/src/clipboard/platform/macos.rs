use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clipboard_rs::ClipboardContext;
use tracing::{debug, debug_span};

use cy_core::ports::SystemClipboardPort;

use super::super::common::{self, CommonClipboardImpl};
use super::super::file_ref;

const FILE_URL: &str = "public.file-url";

/// macOS clipboard implementation using clipboard-rs
pub struct MacOSClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl MacOSClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(common::new_context()?)),
        })
    }
}

impl SystemClipboardPort for MacOSClipboard {
    fn read_file_reference(&self) -> Result<Option<PathBuf>> {
        let span = debug_span!("platform.macos.read_file_reference");
        span.in_scope(|| {
            let ctx = common::lock(&self.inner)?;
            let path = match CommonClipboardImpl::read_files(&ctx)? {
                Some(path) => Some(path),
                None => CommonClipboardImpl::read_buffer(&ctx, FILE_URL)?
                    .and_then(|raw| file_ref::decode_uri_list(&raw)),
            };

            debug!(found = path.is_some(), "Read file reference");
            Ok(path)
        })
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
        let span = debug_span!("platform.macos.write_image", size_bytes = png.len());
        span.in_scope(|| {
            let ctx = common::lock(&self.inner)?;
            CommonClipboardImpl::write_image(&ctx, png)
        })
    }

    fn write_file_reference(&self, path: &Path) -> Result<()> {
        let url = file_ref::encode_file_url(path);
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::write_buffer(&ctx, FILE_URL, url.into_bytes())?;

        debug!(path = %path.display(), "Wrote file reference to system clipboard");
        Ok(())
    }
}
