//! winmax Platform Win32
//!
//! Windows-specific window and monitor access using Win32 APIs.
//!
//! This crate handles:
//! - Foreground window lookup
//! - Window placement and rectangle queries (GetWindowPlacement, GetWindowRect)
//! - Monitor enumeration with work areas (EnumDisplayMonitors, GetMonitorInfoW)
//! - Window positioning via SetWindowPos and ShowWindow
//! - Process executable lookup for diagnostics
//!
//! On other targets the crate only exports its error type, so the rest of
//! the workspace can be built and tested anywhere.

use thiserror::Error;
use winmax_core::WindowId;

#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use win32::{set_dpi_awareness, Win32Geometry};

/// Errors that can occur during Win32 operations.
#[derive(Debug, Error)]
pub enum Win32Error {
    #[error("{call} failed: {reason}")]
    CallFailed { call: &'static str, reason: String },

    #[error("Window not found: {0:#x}")]
    WindowNotFound(WindowId),

    #[error("Failed to enumerate monitors: {0}")]
    EnumerationFailed(String),
}

impl Win32Error {
    /// Build a `CallFailed` from the name of the API and any displayable error.
    pub fn call(call: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::CallFailed {
            call,
            reason: reason.to_string(),
        }
    }
}

/// Convert a null-terminated UTF-16 buffer into a String.
pub fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

/// File name component of a full executable path.
pub fn executable_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}
