#[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
mod common;
pub mod file_ref;
mod platform;

#[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
pub use platform::LocalClipboard;
