//! Extension sets and the capability gate.

/// Client-level extension advertising `eglQueryString(EGL_NO_DISPLAY, ..)`.
pub const CLIENT_EXTENSIONS: &str = "EGL_EXT_client_extensions";
/// Client-level extension advertising the debug message callback.
pub const KHR_DEBUG: &str = "EGL_KHR_debug";
/// Client-level extension advertising device enumeration.
pub const EXT_DEVICE_BASE: &str = "EGL_EXT_device_base";
/// Device-level extension advertising the DRM device file attribute.
pub const EXT_DEVICE_DRM: &str = "EGL_EXT_device_drm";
/// Device-level extension advertising the DRM render-node file attribute.
pub const EXT_DEVICE_DRM_RENDER_NODE: &str = "EGL_EXT_device_drm_render_node";
/// Display-level extension advertising `eglGetDisplayDriverName`.
pub const MESA_QUERY_DRIVER: &str = "EGL_MESA_query_driver";
/// Display-level extension allowing context creation without a config.
pub const KHR_NO_CONFIG_CONTEXT: &str = "EGL_KHR_no_config_context";
/// Display-level extension allowing a current context with no surfaces.
pub const KHR_SURFACELESS_CONTEXT: &str = "EGL_KHR_surfaceless_context";

/// A space-separated extension list as returned by a scope-specific
/// query, or the absence of one when the query failed.
///
/// Capability tests are plain substring containment over the raw text,
/// matching how the EGL ecosystem treats these lists in practice. A
/// token that is a prefix of another token can therefore false-positive;
/// real extension names avoid this, and the ambiguity is accepted rather
/// than fixed.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet(Option<String>);

impl ExtensionSet {
    pub fn new(raw: Option<String>) -> Self {
        Self(raw)
    }

    /// The capability gate: `true` iff `token` occurs in the raw text.
    /// An absent set supports nothing.
    pub fn has(&self, token: &str) -> bool {
        match &self.0 {
            Some(raw) => raw.contains(token),
            None => false,
        }
    }

    /// The raw text, if the producing query succeeded.
    pub fn raw(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The individual tokens, in list order, with no empties even when
    /// the driver emits irregular spacing.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|raw| raw.split_whitespace())
    }
}

impl From<Option<String>> for ExtensionSet {
    fn from(raw: Option<String>) -> Self {
        Self::new(raw)
    }
}
