use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::clipboard::LocalClipboardState;

/// Operating-system clipboard access.
///
/// Reads return `Ok(None)` when the format is absent; errors are reserved for
/// actual access failures.
pub trait SystemClipboardPort: Send + Sync {
    fn read_file_reference(&self) -> Result<Option<PathBuf>>;
    /// PNG-encoded image bytes.
    fn read_image(&self) -> Result<Option<Vec<u8>>>;
    fn read_text(&self) -> Result<Option<String>>;

    fn write_text(&self, text: &str) -> Result<()>;
    fn write_image(&self, png: &[u8]) -> Result<()>;
    fn write_file_reference(&self, path: &Path) -> Result<()>;

    /// 读取全部格式；单个格式读取失败视为缺失
    fn read_state(&self) -> Result<LocalClipboardState> {
        Ok(LocalClipboardState::new(
            self.read_file_reference().unwrap_or(None),
            self.read_image().unwrap_or(None),
            self.read_text()?,
        ))
    }
}

#[cfg(test)]
mockall::mock! {
    pub Clipboard {}

    impl SystemClipboardPort for Clipboard {
        fn read_file_reference(&self) -> Result<Option<PathBuf>>;
        fn read_image(&self) -> Result<Option<Vec<u8>>>;
        fn read_text(&self) -> Result<Option<String>>;
        fn write_text(&self, text: &str) -> Result<()>;
        fn write_image(&self, png: &[u8]) -> Result<()>;
        fn write_file_reference(&self, path: &Path) -> Result<()>;
    }
}
