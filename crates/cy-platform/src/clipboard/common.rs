use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext, ContentFormat, RustImageData};

use super::file_ref;

pub struct CommonClipboardImpl;

pub fn new_context() -> Result<ClipboardContext> {
    ClipboardContext::new().map_err(|e| anyhow!("Failed to create clipboard context: {}", e))
}

pub fn lock(inner: &Mutex<ClipboardContext>) -> Result<MutexGuard<'_, ClipboardContext>> {
    inner
        .lock()
        .map_err(|_| anyhow!("clipboard context lock poisoned"))
}

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

impl CommonClipboardImpl {
    pub fn read_text(ctx: &ClipboardContext) -> Result<Option<String>> {
        if !ctx.has(ContentFormat::Text) {
            return Ok(None);
        }
        let text = map_clipboard_err(ctx.get_text())?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    /// Always PNG, whatever the native image format is.
    pub fn read_image(ctx: &ClipboardContext) -> Result<Option<Vec<u8>>> {
        if !ctx.has(ContentFormat::Image) {
            return Ok(None);
        }
        let image = map_clipboard_err(ctx.get_image())?;
        if image.is_empty() {
            return Ok(None);
        }
        let png = map_clipboard_err(image.to_png())?;
        Ok(Some(png.get_bytes().to_vec()))
    }

    /// `get_files` entries, which are URIs on some platforms and bare paths
    /// on others.
    pub fn read_files(ctx: &ClipboardContext) -> Result<Option<PathBuf>> {
        if !ctx.has(ContentFormat::Files) {
            return Ok(None);
        }
        let files = map_clipboard_err(ctx.get_files())?;
        Ok(files
            .iter()
            .find_map(|entry| file_ref::decode_file_entry(entry)))
    }

    /// Raw buffer for a named platform format, if it is on the clipboard.
    pub fn read_buffer(ctx: &ClipboardContext, format: &str) -> Result<Option<Vec<u8>>> {
        let available = map_clipboard_err(ctx.available_formats())?;
        if !available.iter().any(|f| f == format) {
            return Ok(None);
        }
        map_clipboard_err(ctx.get_buffer(format)).map(Some)
    }

    pub fn write_text(ctx: &ClipboardContext, text: &str) -> Result<()> {
        map_clipboard_err(ctx.set_text(text.to_string()))
    }

    pub fn write_image(ctx: &ClipboardContext, png: &[u8]) -> Result<()> {
        let image = RustImageData::from_bytes(png).map_err(|e| anyhow!(e))?;
        map_clipboard_err(ctx.set_image(image))
    }

    pub fn write_files(ctx: &ClipboardContext, entries: Vec<String>) -> Result<()> {
        map_clipboard_err(ctx.set_files(entries))
    }

    pub fn write_buffer(ctx: &ClipboardContext, format: &str, bytes: Vec<u8>) -> Result<()> {
        map_clipboard_err(ctx.set_buffer(format, bytes))
    }

    /// Several formats in one clipboard transaction.
    pub fn write_contents(ctx: &ClipboardContext, contents: Vec<ClipboardContent>) -> Result<()> {
        map_clipboard_err(ctx.set(contents))
    }
}
