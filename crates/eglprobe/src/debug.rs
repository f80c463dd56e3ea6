//! The EGL debug message sink.
//!
//! With `EGL_KHR_debug` available we register one process-wide callback
//! so driver diagnostics surface on stderr instead of failing silently.
//! The driver may invoke it synchronously, nested inside any later EGL
//! call, but always on this thread; the callback only formats and
//! prints, touching no shared state.

use libc::c_char;
use std::ffi::CStr;

use eglprobe_sys as sys;

/// Maps an `EGL_KHR_debug` severity to its label. Severities outside
/// the published set stay unlabeled.
pub fn severity_name(message_type: sys::EGLint) -> Option<&'static str> {
    match message_type {
        sys::EGL_DEBUG_MSG_CRITICAL_KHR => Some("CRITICAL"),
        sys::EGL_DEBUG_MSG_ERROR_KHR => Some("ERROR"),
        sys::EGL_DEBUG_MSG_WARN_KHR => Some("WARN"),
        sys::EGL_DEBUG_MSG_INFO_KHR => Some("INFO"),
        _ => None,
    }
}

/// Formats one diagnostic line the way the sink prints it.
pub fn format_message(
    error: sys::EGLenum,
    command: Option<&str>,
    message_type: sys::EGLint,
    message: Option<&str>,
) -> String {
    format!(
        "EGL {} {}: {}: {}",
        severity_name(message_type).unwrap_or(""),
        sys::error_name(error),
        command.unwrap_or(""),
        message.unwrap_or("").trim_end(),
    )
}

fn borrowed_str<'a>(ptr: *const c_char) -> Option<std::borrow::Cow<'a, str>> {
    if ptr.is_null() {
        return None;
    }
    // Safety: the driver hands us NUL-terminated strings that live for
    // the duration of the callback.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
}

/// The callback handed to `eglDebugMessageControlKHR`.
///
/// Prints one line per message straight to stderr so the diagnostics are
/// visible regardless of any log filtering.
pub unsafe extern "C" fn egl_debug_callback(
    error: sys::EGLenum,
    command: *const c_char,
    message_type: sys::EGLint,
    _thread_label: sys::EGLLabelKHR,
    _object_label: sys::EGLLabelKHR,
    message: *const c_char,
) {
    let command = borrowed_str(command);
    let message = borrowed_str(message);
    eprintln!(
        "{}",
        format_message(error, command.as_deref(), message_type, message.as_deref())
    );
}
