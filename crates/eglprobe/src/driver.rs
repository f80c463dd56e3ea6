//! The seam between the probe logic and the EGL implementation.
//!
//! Each method wraps exactly one driver call from the discovery chain
//! and reports failure through `Option`/`bool` instead of panicking or
//! unwinding; the probe decides per call whether a failure skips a
//! subsection or (in one case) ends the run.

use std::str::FromStr;

/// String queries valid against the client scope and against an
/// initialized display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringQuery {
    Version,
    Vendor,
    Extensions,
    ClientApis,
}

/// String attributes queryable on an enumerated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceQuery {
    Extensions,
    /// `EGL_DRM_DEVICE_FILE_EXT`, gated on `EGL_EXT_device_drm`.
    DrmDeviceFile,
    /// `EGL_DRM_RENDER_NODE_FILE_EXT`, gated on
    /// `EGL_EXT_device_drm_render_node`.
    DrmRenderNodeFile,
}

/// OpenGL string queries, valid only while a context is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlQuery {
    Version,
    ShadingLanguageVersion,
    Vendor,
    Renderer,
}

/// The context version requested from `eglCreateContext`, always with
/// the core-profile bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextVersion {
    pub major: i32,
    pub minor: i32,
}

impl Default for ContextVersion {
    fn default() -> Self {
        Self { major: 4, minor: 5 }
    }
}

impl std::fmt::Display for ContextVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("expected MAJOR.MINOR, e.g. 4.6")]
pub struct ParseContextVersionError;

impl FromStr for ContextVersion {
    type Err = ParseContextVersionError;

    /// Strict MAJOR.MINOR parse. Anything malformed is rejected whole;
    /// the defaults are never partially overwritten.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once('.').ok_or(ParseContextVersionError)?;
        Ok(Self {
            major: major.parse().map_err(|_| ParseContextVersionError)?,
            minor: minor.parse().map_err(|_| ParseContextVersionError)?,
        })
    }
}

/// One EGL implementation as seen by the probe.
///
/// The associated handle types are opaque to the probe; it only moves
/// them between calls. Handle validity follows the EGL rules: a device
/// is valid for the whole run, a display only between `open_display` and
/// `terminate_display`, a context only while its display lives.
pub trait EglDriver {
    type Device: Copy;
    type Display: Copy;
    type Context: Copy;

    /// `eglQueryString` against `EGL_NO_DISPLAY`. `None` for
    /// [`StringQuery::Extensions`] is the run's one fatal condition.
    fn query_client_string(&self, query: StringQuery) -> Option<String>;

    /// Registers the debug message callback. Only called when the client
    /// scope advertises `EGL_KHR_debug`; returns whether a callback was
    /// actually installed.
    fn install_debug_sink(&self) -> bool;

    /// Enumerates the physical devices. `None` when the entry point is
    /// missing or the query fails; an empty list is a valid result.
    fn enumerate_devices(&self) -> Option<Vec<Self::Device>>;

    fn query_device_string(&self, device: Self::Device, query: DeviceQuery) -> Option<String>;

    /// `eglGetPlatformDisplay` over the device platform with an empty
    /// attribute list. `None` maps the `EGL_NO_DISPLAY` sentinel.
    fn open_display(&self, device: Self::Device) -> Option<Self::Display>;

    fn initialize_display(&self, display: Self::Display) -> bool;

    /// Must be called exactly once per display that initialized
    /// successfully. Implicitly destroys any context created on it.
    fn terminate_display(&self, display: Self::Display);

    fn query_display_string(&self, display: Self::Display, query: StringQuery) -> Option<String>;

    /// The Mesa driver name, gated on `EGL_MESA_query_driver`.
    fn display_driver_name(&self, display: Self::Display) -> Option<String>;

    /// Selects desktop OpenGL (not GLES) as the client API.
    fn bind_opengl_api(&self) -> bool;

    /// Config-less core-profile context with no share context.
    fn create_context(
        &self,
        display: Self::Display,
        version: ContextVersion,
    ) -> Option<Self::Context>;

    /// Makes the context current with no draw or read surface.
    fn make_current_surfaceless(&self, display: Self::Display, context: Self::Context) -> bool;

    /// Valid only while a context is current.
    fn query_gl_string(&self, query: GlQuery) -> Option<String>;

    /// The indexed OpenGL extension list, in index order. Valid only
    /// while a context is current.
    fn query_gl_extensions(&self) -> Option<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_version_parses_major_minor() {
        let v: ContextVersion = "4.6".parse().unwrap();
        assert_eq!(v, ContextVersion { major: 4, minor: 6 });
        let v: ContextVersion = "3.3".parse().unwrap();
        assert_eq!(v, ContextVersion { major: 3, minor: 3 });
    }

    #[test]
    fn context_version_defaults_to_4_5() {
        assert_eq!(ContextVersion::default(), ContextVersion { major: 4, minor: 5 });
    }

    #[test]
    fn malformed_versions_are_rejected_whole() {
        assert!("4".parse::<ContextVersion>().is_err());
        assert!("4.".parse::<ContextVersion>().is_err());
        assert!(".5".parse::<ContextVersion>().is_err());
        assert!("four.five".parse::<ContextVersion>().is_err());
        assert!("".parse::<ContextVersion>().is_err());
    }

    #[test]
    fn context_version_display_round_trips() {
        assert_eq!(ContextVersion { major: 4, minor: 6 }.to_string(), "4.6");
    }
}
