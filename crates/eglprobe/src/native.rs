//! [`EglDriver`] over the system `libEGL`.
//!
//! Baseline entry points come pre-resolved from the loader; everything
//! optional sits in a lazily populated registry keyed by entry-point
//! name, where "not yet resolved" and "resolved but unsupported" are
//! distinct states. No resolved-to-null pointer is ever invoked.

use std::cell::OnceCell;
use std::ffi::CStr;
use std::ptr;

use libc::c_char;

use eglprobe_sys as sys;

use crate::debug::egl_debug_callback;
use crate::driver::{ContextVersion, DeviceQuery, EglDriver, GlQuery, StringQuery};

/// Resolves an optional entry point once per driver, caching the miss.
macro_rules! resolve {
    ($driver:expr, $field:ident, $name:literal, $typ:ty) => {
        $driver
            .$field
            .get_or_init(|| {
                $driver
                    .api
                    .lookup(concat!($name, "\0").as_bytes())
                    // Safety: the target type matches the prototype
                    // published for this entry point.
                    .map(|f| unsafe { std::mem::transmute::<sys::EglProc, $typ>(f) })
            })
            .as_ref()
            .copied()
    };
}

/// The probe's view of the real EGL implementation.
#[derive(Debug)]
pub struct NativeDriver {
    api: sys::EglApi,
    query_devices: OnceCell<Option<sys::PFNEGLQUERYDEVICESEXTPROC>>,
    query_device_string: OnceCell<Option<sys::PFNEGLQUERYDEVICESTRINGEXTPROC>>,
    debug_message_control: OnceCell<Option<sys::PFNEGLDEBUGMESSAGECONTROLKHRPROC>>,
    get_display_driver_name: OnceCell<Option<sys::PFNEGLGETDISPLAYDRIVERNAMEPROC>>,
    gl_get_string: OnceCell<Option<sys::PFNGLGETSTRINGPROC>>,
    gl_get_stringi: OnceCell<Option<sys::PFNGLGETSTRINGIPROC>>,
    gl_get_integerv: OnceCell<Option<sys::PFNGLGETINTEGERVPROC>>,
}

impl NativeDriver {
    /// Loads `libEGL` and prepares the entry-point registry.
    pub fn load() -> Result<Self, sys::Error> {
        Ok(Self {
            api: sys::EglApi::load()?,
            query_devices: OnceCell::new(),
            query_device_string: OnceCell::new(),
            debug_message_control: OnceCell::new(),
            get_display_driver_name: OnceCell::new(),
            gl_get_string: OnceCell::new(),
            gl_get_stringi: OnceCell::new(),
            gl_get_integerv: OnceCell::new(),
        })
    }

    fn string_query_attrib(query: StringQuery) -> sys::EGLint {
        match query {
            StringQuery::Version => sys::EGL_VERSION,
            StringQuery::Vendor => sys::EGL_VENDOR,
            StringQuery::Extensions => sys::EGL_EXTENSIONS,
            StringQuery::ClientApis => sys::EGL_CLIENT_APIS,
        }
    }
}

/// Copies a driver-owned C string before the owning handle can go away.
fn owned_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // Safety: EGL and GL return NUL-terminated static strings owned by
    // the implementation.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

impl EglDriver for NativeDriver {
    type Device = sys::EGLDeviceEXT;
    type Display = sys::EGLDisplay;
    type Context = sys::EGLContext;

    fn query_client_string(&self, query: StringQuery) -> Option<String> {
        let attrib = Self::string_query_attrib(query);
        owned_string(unsafe { (self.api.query_string)(sys::EGL_NO_DISPLAY, attrib) })
    }

    fn install_debug_sink(&self) -> bool {
        let Some(control) =
            resolve!(self, debug_message_control, "eglDebugMessageControlKHR", sys::PFNEGLDEBUGMESSAGECONTROLKHRPROC)
        else {
            return false;
        };
        // CRITICAL and ERROR are enabled by default; opt into the rest.
        let attribs: [sys::EGLAttrib; 5] = [
            sys::EGL_DEBUG_MSG_WARN_KHR as sys::EGLAttrib,
            sys::EGL_TRUE as sys::EGLAttrib,
            sys::EGL_DEBUG_MSG_INFO_KHR as sys::EGLAttrib,
            sys::EGL_TRUE as sys::EGLAttrib,
            sys::EGL_NONE as sys::EGLAttrib,
        ];
        unsafe { control(egl_debug_callback, attribs.as_ptr()) };
        true
    }

    fn enumerate_devices(&self) -> Option<Vec<Self::Device>> {
        let query_devices =
            resolve!(self, query_devices, "eglQueryDevicesEXT", sys::PFNEGLQUERYDEVICESEXTPROC)?;

        let mut count: sys::EGLint = 0;
        if unsafe { query_devices(0, ptr::null_mut(), &mut count) } == sys::EGL_FALSE {
            return None;
        }
        if count <= 0 {
            return Some(Vec::new());
        }

        let mut devices: Vec<sys::EGLDeviceEXT> = vec![ptr::null_mut(); count as usize];
        if unsafe { query_devices(count, devices.as_mut_ptr(), &mut count) } == sys::EGL_FALSE {
            return None;
        }
        // The driver may report fewer devices on the second call.
        devices.truncate(count.max(0) as usize);
        Some(devices)
    }

    fn query_device_string(&self, device: Self::Device, query: DeviceQuery) -> Option<String> {
        let query_device_string = resolve!(
            self,
            query_device_string,
            "eglQueryDeviceStringEXT",
            sys::PFNEGLQUERYDEVICESTRINGEXTPROC
        )?;
        let attrib = match query {
            DeviceQuery::Extensions => sys::EGL_EXTENSIONS,
            DeviceQuery::DrmDeviceFile => sys::EGL_DRM_DEVICE_FILE_EXT,
            DeviceQuery::DrmRenderNodeFile => sys::EGL_DRM_RENDER_NODE_FILE_EXT,
        };
        owned_string(unsafe { query_device_string(device, attrib) })
    }

    fn open_display(&self, device: Self::Device) -> Option<Self::Display> {
        let attribs: [sys::EGLAttrib; 1] = [sys::EGL_NONE as sys::EGLAttrib];
        let display = unsafe {
            (self.api.get_platform_display)(sys::EGL_PLATFORM_DEVICE_EXT, device, attribs.as_ptr())
        };
        if display == sys::EGL_NO_DISPLAY {
            None
        } else {
            Some(display)
        }
    }

    fn initialize_display(&self, display: Self::Display) -> bool {
        // Major/minor out-parameters are optional and unused here.
        (unsafe { (self.api.initialize)(display, ptr::null_mut(), ptr::null_mut()) })
            != sys::EGL_FALSE
    }

    fn terminate_display(&self, display: Self::Display) {
        if unsafe { (self.api.terminate)(display) } == sys::EGL_FALSE {
            let code = unsafe { (self.api.get_error)() };
            log::error!("eglTerminate failed: {}", sys::error_name(code as sys::EGLenum));
        }
    }

    fn query_display_string(&self, display: Self::Display, query: StringQuery) -> Option<String> {
        let attrib = Self::string_query_attrib(query);
        owned_string(unsafe { (self.api.query_string)(display, attrib) })
    }

    fn display_driver_name(&self, display: Self::Display) -> Option<String> {
        let get_name = resolve!(
            self,
            get_display_driver_name,
            "eglGetDisplayDriverName",
            sys::PFNEGLGETDISPLAYDRIVERNAMEPROC
        )?;
        owned_string(unsafe { get_name(display) })
    }

    fn bind_opengl_api(&self) -> bool {
        (unsafe { (self.api.bind_api)(sys::EGL_OPENGL_API) }) != sys::EGL_FALSE
    }

    fn create_context(
        &self,
        display: Self::Display,
        version: ContextVersion,
    ) -> Option<Self::Context> {
        let attribs: [sys::EGLint; 7] = [
            sys::EGL_CONTEXT_MAJOR_VERSION,
            version.major,
            sys::EGL_CONTEXT_MINOR_VERSION,
            version.minor,
            sys::EGL_CONTEXT_OPENGL_PROFILE_MASK,
            sys::EGL_CONTEXT_OPENGL_CORE_PROFILE_BIT,
            sys::EGL_NONE,
        ];
        let context = unsafe {
            (self.api.create_context)(
                display,
                sys::EGL_NO_CONFIG_KHR,
                sys::EGL_NO_CONTEXT,
                attribs.as_ptr(),
            )
        };
        if context == sys::EGL_NO_CONTEXT {
            None
        } else {
            Some(context)
        }
    }

    fn make_current_surfaceless(&self, display: Self::Display, context: Self::Context) -> bool {
        (unsafe {
            (self.api.make_current)(display, sys::EGL_NO_SURFACE, sys::EGL_NO_SURFACE, context)
        }) != sys::EGL_FALSE
    }

    fn query_gl_string(&self, query: GlQuery) -> Option<String> {
        let get_string = resolve!(self, gl_get_string, "glGetString", sys::PFNGLGETSTRINGPROC)?;
        let name = match query {
            GlQuery::Version => sys::GL_VERSION,
            GlQuery::ShadingLanguageVersion => sys::GL_SHADING_LANGUAGE_VERSION,
            GlQuery::Vendor => sys::GL_VENDOR,
            GlQuery::Renderer => sys::GL_RENDERER,
        };
        owned_string(unsafe { get_string(name) } as *const c_char)
    }

    fn query_gl_extensions(&self) -> Option<Vec<String>> {
        let get_integerv =
            resolve!(self, gl_get_integerv, "glGetIntegerv", sys::PFNGLGETINTEGERVPROC)?;
        let get_stringi = resolve!(self, gl_get_stringi, "glGetStringi", sys::PFNGLGETSTRINGIPROC)?;

        let mut count: sys::GLint = 0;
        unsafe { get_integerv(sys::GL_NUM_EXTENSIONS, &mut count) };

        let mut extensions = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count.max(0) as sys::GLuint {
            if let Some(name) =
                owned_string(unsafe { get_stringi(sys::GL_EXTENSIONS, index) } as *const c_char)
            {
                extensions.push(name);
            }
        }
        Some(extensions)
    }
}
