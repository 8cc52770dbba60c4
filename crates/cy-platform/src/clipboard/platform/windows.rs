use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clipboard_rs::{ClipboardContent, ClipboardContext};

use cy_core::ports::SystemClipboardPort;

use super::super::common::{self, CommonClipboardImpl};
use super::super::file_ref;

/// Registered name of the single-file `CFSTR_FILENAMEW` format.
const FILE_NAME_W: &str = "FileNameW";

/// Windows clipboard implementation using clipboard-rs. `CF_HDROP` comes
/// back through `get_files`; `FileNameW` covers older shells.
pub struct WindowsClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl WindowsClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Mutex::new(common::new_context()?)),
        })
    }
}

impl SystemClipboardPort for WindowsClipboard {
    fn read_file_reference(&self) -> Result<Option<PathBuf>> {
        let ctx = common::lock(&self.inner)?;
        if let Some(path) = CommonClipboardImpl::read_files(&ctx)? {
            return Ok(Some(path));
        }
        Ok(CommonClipboardImpl::read_buffer(&ctx, FILE_NAME_W)?
            .and_then(|raw| file_ref::decode_file_name_w(&raw)))
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
        let name_w = file_ref::encode_file_name_w(path);
        let ctx = common::lock(&self.inner)?;
        CommonClipboardImpl::write_contents(
            &ctx,
            vec![
                ClipboardContent::Files(vec![path.to_string_lossy().into_owned()]),
                ClipboardContent::Other(FILE_NAME_W.to_string(), name_w),
            ],
        )
    }
}
