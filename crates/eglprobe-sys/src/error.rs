//! Loader errors and the EGL error-code mnemonic table.

use crate::EGLenum;

/// Failures while loading `libEGL` and resolving its baseline entry
/// points. Everything past loading is reported through per-call results
/// in the safe layer, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shared library could not be opened under any known name.
    #[error("could not load libEGL ({0})")]
    LibraryNotFound(#[from] libloading::Error),
    /// The library loaded but lacks an entry point every usable EGL
    /// implementation provides.
    #[error("libEGL is missing the baseline entry point `{0}`")]
    MissingSymbol(&'static str),
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Maps an EGL error code to its mnemonic.
///
/// Covers the full set published for EGL 1.5 (see the `eglGetError`
/// reference page); anything else collapses to `"unknown error"`.
pub fn error_name(code: EGLenum) -> &'static str {
    match code {
        crate::EGL_SUCCESS => "EGL_SUCCESS",
        crate::EGL_NOT_INITIALIZED => "EGL_NOT_INITIALIZED",
        crate::EGL_BAD_ACCESS => "EGL_BAD_ACCESS",
        crate::EGL_BAD_ALLOC => "EGL_BAD_ALLOC",
        crate::EGL_BAD_ATTRIBUTE => "EGL_BAD_ATTRIBUTE",
        crate::EGL_BAD_CONFIG => "EGL_BAD_CONFIG",
        crate::EGL_BAD_CONTEXT => "EGL_BAD_CONTEXT",
        crate::EGL_BAD_CURRENT_SURFACE => "EGL_BAD_CURRENT_SURFACE",
        crate::EGL_BAD_DISPLAY => "EGL_BAD_DISPLAY",
        crate::EGL_BAD_MATCH => "EGL_BAD_MATCH",
        crate::EGL_BAD_NATIVE_PIXMAP => "EGL_BAD_NATIVE_PIXMAP",
        crate::EGL_BAD_NATIVE_WINDOW => "EGL_BAD_NATIVE_WINDOW",
        crate::EGL_BAD_PARAMETER => "EGL_BAD_PARAMETER",
        crate::EGL_BAD_SURFACE => "EGL_BAD_SURFACE",
        crate::EGL_CONTEXT_LOST => "EGL_CONTEXT_LOST",
        _ => "unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_mnemonics() {
        let expected = [
            (crate::EGL_SUCCESS, "EGL_SUCCESS"),
            (crate::EGL_NOT_INITIALIZED, "EGL_NOT_INITIALIZED"),
            (crate::EGL_BAD_ACCESS, "EGL_BAD_ACCESS"),
            (crate::EGL_BAD_ALLOC, "EGL_BAD_ALLOC"),
            (crate::EGL_BAD_ATTRIBUTE, "EGL_BAD_ATTRIBUTE"),
            (crate::EGL_BAD_CONFIG, "EGL_BAD_CONFIG"),
            (crate::EGL_BAD_CONTEXT, "EGL_BAD_CONTEXT"),
            (crate::EGL_BAD_CURRENT_SURFACE, "EGL_BAD_CURRENT_SURFACE"),
            (crate::EGL_BAD_DISPLAY, "EGL_BAD_DISPLAY"),
            (crate::EGL_BAD_MATCH, "EGL_BAD_MATCH"),
            (crate::EGL_BAD_NATIVE_PIXMAP, "EGL_BAD_NATIVE_PIXMAP"),
            (crate::EGL_BAD_NATIVE_WINDOW, "EGL_BAD_NATIVE_WINDOW"),
            (crate::EGL_BAD_PARAMETER, "EGL_BAD_PARAMETER"),
            (crate::EGL_BAD_SURFACE, "EGL_BAD_SURFACE"),
            (crate::EGL_CONTEXT_LOST, "EGL_CONTEXT_LOST"),
        ];
        assert_eq!(expected.len(), 15);
        for (code, name) in expected {
            assert_eq!(error_name(code), name);
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(error_name(0x2FFF), "unknown error");
        assert_eq!(error_name(0x300F), "unknown error");
        assert_eq!(error_name(0), "unknown error");
    }
}
