//! `eglprobe-sys` provides the low-level EGL/OpenGL surface used by
//! `eglprobe`: raw handle aliases, the published numeric constants, the
//! function-pointer types for the entry points we call, and a dynamic
//! loader for the system `libEGL`.
//!
//! Nothing here talks to the driver on its own; the safe layer lives in
//! the `eglprobe` crate.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use libc::{c_char, c_uint, c_void};

pub mod error;
pub use error::*;
pub mod loader;
pub use loader::*;

// ---------------------------------------------------------------------------
// Base scalar and handle types (EGL/egl.h, EGL/eglext.h, GL/glcorearb.h)
// ---------------------------------------------------------------------------

pub type EGLBoolean = c_uint;
pub type EGLenum = c_uint;
pub type EGLint = i32;
/// `EGLAttrib` is `intptr_t` in the Khronos headers.
pub type EGLAttrib = isize;

pub type EGLDisplay = *mut c_void;
pub type EGLConfig = *mut c_void;
pub type EGLContext = *mut c_void;
pub type EGLSurface = *mut c_void;
pub type EGLDeviceEXT = *mut c_void;
pub type EGLLabelKHR = *mut c_void;

pub type GLenum = c_uint;
pub type GLint = i32;
pub type GLuint = c_uint;
pub type GLubyte = u8;

pub const EGL_FALSE: EGLBoolean = 0;
pub const EGL_TRUE: EGLBoolean = 1;

pub const EGL_NO_DISPLAY: EGLDisplay = std::ptr::null_mut();
pub const EGL_NO_CONTEXT: EGLContext = std::ptr::null_mut();
pub const EGL_NO_SURFACE: EGLSurface = std::ptr::null_mut();
/// From `EGL_KHR_no_config_context`.
pub const EGL_NO_CONFIG_KHR: EGLConfig = std::ptr::null_mut();

// ---------------------------------------------------------------------------
// Error codes, as returned by `eglGetError` and reported to the debug
// callback. The full list published for EGL 1.5.
// ---------------------------------------------------------------------------

pub const EGL_SUCCESS: EGLenum = 0x3000;
pub const EGL_NOT_INITIALIZED: EGLenum = 0x3001;
pub const EGL_BAD_ACCESS: EGLenum = 0x3002;
pub const EGL_BAD_ALLOC: EGLenum = 0x3003;
pub const EGL_BAD_ATTRIBUTE: EGLenum = 0x3004;
pub const EGL_BAD_CONFIG: EGLenum = 0x3005;
pub const EGL_BAD_CONTEXT: EGLenum = 0x3006;
pub const EGL_BAD_CURRENT_SURFACE: EGLenum = 0x3007;
pub const EGL_BAD_DISPLAY: EGLenum = 0x3008;
pub const EGL_BAD_MATCH: EGLenum = 0x3009;
pub const EGL_BAD_NATIVE_PIXMAP: EGLenum = 0x300A;
pub const EGL_BAD_NATIVE_WINDOW: EGLenum = 0x300B;
pub const EGL_BAD_PARAMETER: EGLenum = 0x300C;
pub const EGL_BAD_SURFACE: EGLenum = 0x300D;
pub const EGL_CONTEXT_LOST: EGLenum = 0x300E;

// ---------------------------------------------------------------------------
// String queries and attribute names
// ---------------------------------------------------------------------------

pub const EGL_VENDOR: EGLint = 0x3053;
pub const EGL_VERSION: EGLint = 0x3054;
pub const EGL_EXTENSIONS: EGLint = 0x3055;
pub const EGL_CLIENT_APIS: EGLint = 0x308D;

pub const EGL_NONE: EGLint = 0x3038;

pub const EGL_OPENGL_API: EGLenum = 0x30A2;

pub const EGL_CONTEXT_MAJOR_VERSION: EGLint = 0x3098;
pub const EGL_CONTEXT_MINOR_VERSION: EGLint = 0x30FB;
pub const EGL_CONTEXT_OPENGL_PROFILE_MASK: EGLint = 0x30FD;
pub const EGL_CONTEXT_OPENGL_CORE_PROFILE_BIT: EGLint = 0x0000_0001;

/// From `EGL_EXT_platform_device`.
pub const EGL_PLATFORM_DEVICE_EXT: EGLenum = 0x313F;
/// From `EGL_EXT_device_drm`.
pub const EGL_DRM_DEVICE_FILE_EXT: EGLint = 0x3233;
/// From `EGL_EXT_device_drm_render_node`.
pub const EGL_DRM_RENDER_NODE_FILE_EXT: EGLint = 0x3377;

/// Message severities from `EGL_KHR_debug`.
pub const EGL_DEBUG_MSG_CRITICAL_KHR: EGLint = 0x33B9;
pub const EGL_DEBUG_MSG_ERROR_KHR: EGLint = 0x33BA;
pub const EGL_DEBUG_MSG_WARN_KHR: EGLint = 0x33BB;
pub const EGL_DEBUG_MSG_INFO_KHR: EGLint = 0x33BC;

// ---------------------------------------------------------------------------
// OpenGL string/integer queries used once a context is current
// ---------------------------------------------------------------------------

pub const GL_VENDOR: GLenum = 0x1F00;
pub const GL_RENDERER: GLenum = 0x1F01;
pub const GL_VERSION: GLenum = 0x1F02;
pub const GL_EXTENSIONS: GLenum = 0x1F03;
pub const GL_SHADING_LANGUAGE_VERSION: GLenum = 0x8B8C;
pub const GL_NUM_EXTENSIONS: GLenum = 0x821D;

// ---------------------------------------------------------------------------
// Function-pointer types
// ---------------------------------------------------------------------------

/// Generic entry point as handed out by `eglGetProcAddress`. Cast to the
/// concrete type before calling.
pub type EglProc = unsafe extern "C" fn();

pub type PFNEGLQUERYSTRINGPROC = unsafe extern "C" fn(EGLDisplay, EGLint) -> *const c_char;
pub type PFNEGLGETPROCADDRESSPROC = unsafe extern "C" fn(*const c_char) -> Option<EglProc>;
pub type PFNEGLGETERRORPROC = unsafe extern "C" fn() -> EGLint;
pub type PFNEGLGETPLATFORMDISPLAYPROC =
    unsafe extern "C" fn(EGLenum, *mut c_void, *const EGLAttrib) -> EGLDisplay;
pub type PFNEGLINITIALIZEPROC =
    unsafe extern "C" fn(EGLDisplay, *mut EGLint, *mut EGLint) -> EGLBoolean;
pub type PFNEGLTERMINATEPROC = unsafe extern "C" fn(EGLDisplay) -> EGLBoolean;
pub type PFNEGLBINDAPIPROC = unsafe extern "C" fn(EGLenum) -> EGLBoolean;
pub type PFNEGLCREATECONTEXTPROC =
    unsafe extern "C" fn(EGLDisplay, EGLConfig, EGLContext, *const EGLint) -> EGLContext;
pub type PFNEGLMAKECURRENTPROC =
    unsafe extern "C" fn(EGLDisplay, EGLSurface, EGLSurface, EGLContext) -> EGLBoolean;

// Extension entry points, only reachable through `eglGetProcAddress`.

pub type EGLDEBUGPROCKHR = unsafe extern "C" fn(
    error: EGLenum,
    command: *const c_char,
    message_type: EGLint,
    thread_label: EGLLabelKHR,
    object_label: EGLLabelKHR,
    message: *const c_char,
);
pub type PFNEGLDEBUGMESSAGECONTROLKHRPROC =
    unsafe extern "C" fn(EGLDEBUGPROCKHR, *const EGLAttrib) -> EGLint;
pub type PFNEGLQUERYDEVICESEXTPROC =
    unsafe extern "C" fn(EGLint, *mut EGLDeviceEXT, *mut EGLint) -> EGLBoolean;
pub type PFNEGLQUERYDEVICESTRINGEXTPROC =
    unsafe extern "C" fn(EGLDeviceEXT, EGLint) -> *const c_char;
pub type PFNEGLGETDISPLAYDRIVERNAMEPROC = unsafe extern "C" fn(EGLDisplay) -> *const c_char;

pub type PFNGLGETSTRINGPROC = unsafe extern "C" fn(GLenum) -> *const GLubyte;
pub type PFNGLGETSTRINGIPROC = unsafe extern "C" fn(GLenum, GLuint) -> *const GLubyte;
pub type PFNGLGETINTEGERVPROC = unsafe extern "C" fn(GLenum, *mut GLint);
