pub mod clipboard;

#[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
pub use clipboard::LocalClipboard;
