//! Dynamic loading of the system `libEGL`.
//!
//! The probe never links against EGL at build time: the library is
//! dlopen'ed at startup and the baseline entry points are resolved once.
//! Extension entry points are *not* resolved here; they go through
//! [`EglApi::get_proc_address`] so that an unsupported extension shows up
//! as `None` instead of a crash.

use libc::c_char;
use libloading::Library;
use log::{debug, info};

use crate::{
    EglProc, Error, Result, PFNEGLBINDAPIPROC, PFNEGLCREATECONTEXTPROC, PFNEGLGETERRORPROC,
    PFNEGLGETPLATFORMDISPLAYPROC, PFNEGLGETPROCADDRESSPROC, PFNEGLINITIALIZEPROC,
    PFNEGLMAKECURRENTPROC, PFNEGLQUERYSTRINGPROC, PFNEGLTERMINATEPROC,
};

/// Sonames tried in order. The versioned name is what distros ship; the
/// bare `.so` only exists with development packages installed.
const LIBRARY_NAMES: &[&str] = &["libEGL.so.1", "libEGL.so"];

/// The loaded `libEGL` with its baseline entry points resolved.
///
/// The function pointers stay valid for as long as the owning `EglApi`
/// is alive, which keeps the library mapped.
pub struct EglApi {
    _library: Library,
    pub query_string: PFNEGLQUERYSTRINGPROC,
    pub get_proc_address: PFNEGLGETPROCADDRESSPROC,
    pub get_error: PFNEGLGETERRORPROC,
    pub get_platform_display: PFNEGLGETPLATFORMDISPLAYPROC,
    pub initialize: PFNEGLINITIALIZEPROC,
    pub terminate: PFNEGLTERMINATEPROC,
    pub bind_api: PFNEGLBINDAPIPROC,
    pub create_context: PFNEGLCREATECONTEXTPROC,
    pub make_current: PFNEGLMAKECURRENTPROC,
}

impl std::fmt::Debug for EglApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EglApi").finish_non_exhaustive()
    }
}

macro_rules! baseline_symbol {
    ($library:expr, $name:literal) => {
        // Safety: the symbol type matches the prototype published in the
        // Khronos EGL headers.
        *unsafe { $library.get(concat!($name, "\0").as_bytes()) }
            .map_err(|_| Error::MissingSymbol($name))?
    };
}

impl EglApi {
    /// Loads `libEGL` and resolves every baseline entry point.
    pub fn load() -> Result<Self> {
        let (name, library) = Self::open_library()?;
        info!("loaded EGL implementation from {name}");

        let api = Self {
            query_string: baseline_symbol!(library, "eglQueryString"),
            get_proc_address: baseline_symbol!(library, "eglGetProcAddress"),
            get_error: baseline_symbol!(library, "eglGetError"),
            // Core since EGL 1.5; older libraries cannot drive the
            // device-platform path at all.
            get_platform_display: baseline_symbol!(library, "eglGetPlatformDisplay"),
            initialize: baseline_symbol!(library, "eglInitialize"),
            terminate: baseline_symbol!(library, "eglTerminate"),
            bind_api: baseline_symbol!(library, "eglBindAPI"),
            create_context: baseline_symbol!(library, "eglCreateContext"),
            make_current: baseline_symbol!(library, "eglMakeCurrent"),
            _library: library,
        };
        Ok(api)
    }

    fn open_library() -> Result<(&'static str, Library)> {
        let mut candidates = LIBRARY_NAMES.iter();
        let mut name = candidates.next().copied().unwrap_or("libEGL.so.1");
        loop {
            // Safety: loading the system-managed EGL library, whose
            // constructors are well behaved.
            match unsafe { Library::new(name) } {
                Ok(library) => return Ok((name, library)),
                Err(e) => match candidates.next() {
                    Some(&next) => {
                        debug!("dlopen {name}: {e}");
                        name = next;
                    }
                    None => return Err(Error::LibraryNotFound(e)),
                },
            }
        }
    }

    /// Resolves a possibly-absent entry point by name through
    /// `eglGetProcAddress`.
    ///
    /// `name` must be NUL-terminated. Returns `None` when the
    /// implementation does not export the entry point, which is how every
    /// extension query in the probe decides to skip.
    pub fn lookup(&self, name: &'static [u8]) -> Option<EglProc> {
        debug_assert!(name.ends_with(b"\0"));
        let proc = unsafe { (self.get_proc_address)(name.as_ptr() as *const c_char) };
        if proc.is_none() {
            debug!(
                "entry point {} not exported by this EGL implementation",
                String::from_utf8_lossy(&name[..name.len() - 1])
            );
        }
        proc
    }
}
