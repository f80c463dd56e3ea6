//! The capability-discovery state machine.
//!
//! One pass, strictly sequential: client scope, then per device an
//! identity section and a display/context section. Every stage past the
//! client probe is gated on a capability token and on the success of the
//! stage enclosing it; a missed gate writes one diagnostic line and
//! skips exactly the dependent subsection.

use std::io::{self, Write};

use crate::driver::{ContextVersion, DeviceQuery, EglDriver, GlQuery, StringQuery};
use crate::extensions::{
    ExtensionSet, EXT_DEVICE_BASE, EXT_DEVICE_DRM, EXT_DEVICE_DRM_RENDER_NODE, KHR_DEBUG,
    KHR_NO_CONFIG_CONTEXT, KHR_SURFACELESS_CONTEXT, MESA_QUERY_DRIVER,
};

/// Placeholder for a string the driver declined to return inside a
/// section that is otherwise printable.
const UNKNOWN: &str = "(unknown)";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeOptions {
    /// Context version requested from `eglCreateContext`.
    pub opengl_version: ContextVersion,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The one fatal condition: the platform cannot answer the
    /// display-less extension query at all.
    #[error(
        "eglQueryString(EGL_NO_DISPLAY, EGL_EXTENSIONS) failed, \
         EGL_EXT_client_extensions probably not supported"
    )]
    ClientExtensionsUnsupported,
    #[error("writing the report failed: {0}")]
    Io(#[from] io::Error),
}

/// Terminates an initialized display on every exit path.
///
/// Constructed only after `initialize_display` succeeds, so terminate
/// runs exactly once per initialized display and never for one that
/// failed to open or initialize.
struct InitializedDisplay<'a, D: EglDriver> {
    driver: &'a D,
    display: D::Display,
}

impl<D: EglDriver> Drop for InitializedDisplay<'_, D> {
    fn drop(&mut self) {
        self.driver.terminate_display(self.display);
    }
}

/// Runs the whole probe, writing the report to `out` and skip
/// diagnostics to `diag`.
pub fn run<D: EglDriver>(
    driver: &D,
    options: &ProbeOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<(), ProbeError> {
    let client_extensions =
        ExtensionSet::new(driver.query_client_string(StringQuery::Extensions));
    if client_extensions.raw().is_none() {
        return Err(ProbeError::ClientExtensionsUnsupported);
    }

    writeln!(out, "EGL client")?;
    writeln!(out, "==========")?;
    writeln!(out)?;
    let client_version = driver.query_client_string(StringQuery::Version);
    writeln!(out, "Client version: {}", client_version.as_deref().unwrap_or(UNKNOWN))?;
    writeln!(out, "Client extensions:")?;
    writeln!(out)?;
    for token in client_extensions.tokens() {
        writeln!(out, "{token}")?;
    }
    writeln!(out)?;
    writeln!(out)?;

    // Register the debug sink early so the stages below report driver
    // diagnostics instead of failing silently.
    if client_extensions.has(KHR_DEBUG) {
        driver.install_debug_sink();
    }

    if !client_extensions.has(EXT_DEVICE_BASE) {
        writeln!(diag, "{EXT_DEVICE_BASE} not supported, but needed for device enumeration.")?;
        return Ok(());
    }
    let Some(devices) = driver.enumerate_devices() else {
        writeln!(diag, "eglQueryDevicesEXT failed, skipping device enumeration.")?;
        return Ok(());
    };

    // The device list is one allocation, alive for the whole loop and
    // dropped once afterwards no matter how each device fared.
    for (index, device) in devices.iter().copied().enumerate() {
        probe_device(driver, index, device, options, out, diag)?;
    }

    Ok(())
}

/// Stages 3 and 4 for one device. Failures here never propagate; the
/// caller moves on to the next device regardless.
fn probe_device<D: EglDriver>(
    driver: &D,
    index: usize,
    device: D::Device,
    options: &ProbeOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<(), ProbeError> {
    writeln!(out, "EGL device {index}")?;
    writeln!(out, "============")?;
    writeln!(out)?;

    let device_extensions =
        ExtensionSet::new(driver.query_device_string(device, DeviceQuery::Extensions));
    writeln!(
        out,
        "Device extensions: {}",
        device_extensions.raw().unwrap_or(UNKNOWN)
    )?;
    // Attribute queries stay gated: some drivers fault on unsupported
    // attributes instead of returning nothing.
    if device_extensions.has(EXT_DEVICE_DRM) {
        let path = driver.query_device_string(device, DeviceQuery::DrmDeviceFile);
        writeln!(out, "    EGL_DRM_DEVICE_FILE_EXT: {}", path.as_deref().unwrap_or(UNKNOWN))?;
    }
    if device_extensions.has(EXT_DEVICE_DRM_RENDER_NODE) {
        let path = driver.query_device_string(device, DeviceQuery::DrmRenderNodeFile);
        writeln!(
            out,
            "    EGL_DRM_RENDER_NODE_FILE_EXT: {}",
            path.as_deref().unwrap_or(UNKNOWN)
        )?;
    }
    writeln!(out)?;

    probe_display(driver, device, options, out, diag)?;

    writeln!(out)?;
    writeln!(out)?;
    Ok(())
}

fn probe_display<D: EglDriver>(
    driver: &D,
    device: D::Device,
    options: &ProbeOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<(), ProbeError> {
    let Some(display) = driver.open_display(device) else {
        writeln!(
            diag,
            "eglGetPlatformDisplay(EGL_PLATFORM_DEVICE_EXT, ..) failed. \
             Can't show display information."
        )?;
        return Ok(());
    };
    if !driver.initialize_display(display) {
        // EGL defines no release call for a display handle that never
        // initialized, so the handle is simply dropped here.
        writeln!(diag, "eglInitialize failed. Can't show display information.")?;
        return Ok(());
    }
    let display = InitializedDisplay { driver, display };

    let display_extensions = ExtensionSet::new(
        driver.query_display_string(display.display, StringQuery::Extensions),
    );
    let version = driver.query_display_string(display.display, StringQuery::Version);
    writeln!(out, "Display version: {}", version.as_deref().unwrap_or(UNKNOWN))?;
    let vendor = driver.query_display_string(display.display, StringQuery::Vendor);
    writeln!(out, "Display vendor: {}", vendor.as_deref().unwrap_or(UNKNOWN))?;
    if display_extensions.has(MESA_QUERY_DRIVER) {
        match driver.display_driver_name(display.display) {
            Some(name) => {
                writeln!(out, "Display driver name: {name} (from {MESA_QUERY_DRIVER})")?;
            }
            None => writeln!(diag, "eglGetDisplayDriverName returned nothing.")?,
        }
    }
    let apis = driver.query_display_string(display.display, StringQuery::ClientApis);
    writeln!(out, "Display APIs: {}", apis.as_deref().unwrap_or(UNKNOWN))?;
    writeln!(out, "Display extensions:")?;
    writeln!(out)?;
    for token in display_extensions.tokens() {
        writeln!(out, "{token}")?;
    }
    writeln!(out)?;

    if !driver.bind_opengl_api() {
        writeln!(diag, "eglBindAPI(EGL_OPENGL_API) failed. Can't show OpenGL information.")?;
        return Ok(());
    }
    if !display_extensions.has(KHR_NO_CONFIG_CONTEXT)
        || !display_extensions.has(KHR_SURFACELESS_CONTEXT)
    {
        writeln!(
            diag,
            "{KHR_NO_CONFIG_CONTEXT} and {KHR_SURFACELESS_CONTEXT} are not supported \
             but needed to create an OpenGL context. Can't show OpenGL information."
        )?;
        return Ok(());
    }

    let Some(context) = driver.create_context(display.display, options.opengl_version) else {
        writeln!(
            diag,
            "eglCreateContext for OpenGL {} failed. Can't show OpenGL information.",
            options.opengl_version
        )?;
        return Ok(());
    };
    if !driver.make_current_surfaceless(display.display, context) {
        writeln!(diag, "eglMakeCurrent failed. Can't show OpenGL information.")?;
        return Ok(());
    }

    let gl = |query| driver.query_gl_string(query);
    writeln!(out, "OpenGL version: {}", gl(GlQuery::Version).as_deref().unwrap_or(UNKNOWN))?;
    writeln!(
        out,
        "OpenGL shading language version: {}",
        gl(GlQuery::ShadingLanguageVersion).as_deref().unwrap_or(UNKNOWN)
    )?;
    writeln!(out, "OpenGL vendor: {}", gl(GlQuery::Vendor).as_deref().unwrap_or(UNKNOWN))?;
    writeln!(out, "OpenGL renderer: {}", gl(GlQuery::Renderer).as_deref().unwrap_or(UNKNOWN))?;
    writeln!(out, "OpenGL extensions:")?;
    writeln!(out)?;
    if let Some(extensions) = driver.query_gl_extensions() {
        for name in extensions {
            writeln!(out, "{name}")?;
        }
    }

    // `display` drops here, terminating the display and with it the
    // context.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const FULL_CLIENT: &str = "EGL_EXT_client_extensions EGL_KHR_debug EGL_EXT_device_base";
    const FULL_DISPLAY: &str =
        "EGL_KHR_no_config_context EGL_KHR_surfaceless_context EGL_MESA_query_driver";

    #[derive(Clone)]
    struct StubDevice {
        extensions: &'static str,
        display_extensions: &'static str,
        open_display: bool,
        initialize: bool,
        bind_api: bool,
        create_context: bool,
        make_current: bool,
    }

    impl Default for StubDevice {
        fn default() -> Self {
            Self {
                extensions: "EGL_EXT_device_drm EGL_EXT_device_drm_render_node",
                display_extensions: FULL_DISPLAY,
                open_display: true,
                initialize: true,
                bind_api: true,
                create_context: true,
                make_current: true,
            }
        }
    }

    #[derive(Default)]
    struct Calls {
        debug_sinks_installed: usize,
        contexts_created: usize,
        displays_terminated: usize,
    }

    struct StubDriver {
        client_extensions: Option<&'static str>,
        devices: Option<Vec<StubDevice>>,
        calls: RefCell<Calls>,
    }

    impl StubDriver {
        fn new(client_extensions: &'static str, devices: Vec<StubDevice>) -> Self {
            Self {
                client_extensions: Some(client_extensions),
                devices: Some(devices),
                calls: RefCell::new(Calls::default()),
            }
        }

        fn device(&self, device: usize) -> &StubDevice {
            &self.devices.as_ref().unwrap()[device]
        }
    }

    impl EglDriver for StubDriver {
        type Device = usize;
        type Display = usize;
        type Context = usize;

        fn query_client_string(&self, query: StringQuery) -> Option<String> {
            match query {
                StringQuery::Extensions => self.client_extensions.map(str::to_owned),
                StringQuery::Version => Some("1.5".into()),
                StringQuery::Vendor => Some("stub".into()),
                StringQuery::ClientApis => None,
            }
        }

        fn install_debug_sink(&self) -> bool {
            self.calls.borrow_mut().debug_sinks_installed += 1;
            true
        }

        fn enumerate_devices(&self) -> Option<Vec<usize>> {
            Some((0..self.devices.as_ref()?.len()).collect())
        }

        fn query_device_string(&self, device: usize, query: DeviceQuery) -> Option<String> {
            match query {
                DeviceQuery::Extensions => Some(self.device(device).extensions.to_owned()),
                DeviceQuery::DrmDeviceFile => Some(format!("/dev/dri/card{device}")),
                DeviceQuery::DrmRenderNodeFile => {
                    Some(format!("/dev/dri/renderD{}", 128 + device))
                }
            }
        }

        fn open_display(&self, device: usize) -> Option<usize> {
            self.device(device).open_display.then_some(device)
        }

        fn initialize_display(&self, display: usize) -> bool {
            self.device(display).initialize
        }

        fn terminate_display(&self, _display: usize) {
            self.calls.borrow_mut().displays_terminated += 1;
        }

        fn query_display_string(&self, display: usize, query: StringQuery) -> Option<String> {
            match query {
                StringQuery::Extensions => {
                    Some(self.device(display).display_extensions.to_owned())
                }
                StringQuery::Version => Some("1.5".into()),
                StringQuery::Vendor => Some("Stub Inc.".into()),
                StringQuery::ClientApis => Some("OpenGL OpenGL_ES".into()),
            }
        }

        fn display_driver_name(&self, _display: usize) -> Option<String> {
            Some("stubdrv".into())
        }

        fn bind_opengl_api(&self) -> bool {
            // One API per driver in the stub; good enough for gating.
            self.devices.as_ref().is_some_and(|d| d.iter().any(|dev| dev.bind_api))
        }

        fn create_context(&self, display: usize, _version: ContextVersion) -> Option<usize> {
            if self.device(display).create_context {
                self.calls.borrow_mut().contexts_created += 1;
                Some(display)
            } else {
                None
            }
        }

        fn make_current_surfaceless(&self, display: usize, _context: usize) -> bool {
            self.device(display).make_current
        }

        fn query_gl_string(&self, query: GlQuery) -> Option<String> {
            Some(
                match query {
                    GlQuery::Version => "4.6 (Core Profile) Stub",
                    GlQuery::ShadingLanguageVersion => "4.60",
                    GlQuery::Vendor => "Stub Inc.",
                    GlQuery::Renderer => "Stub Rasterizer 3000",
                }
                .to_owned(),
            )
        }

        fn query_gl_extensions(&self) -> Option<Vec<String>> {
            Some(vec!["GL_ARB_stub".to_owned(), "GL_EXT_stub".to_owned()])
        }
    }

    fn run_probe(driver: &StubDriver) -> (Result<(), ProbeError>, String, String) {
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let result = run(driver, &ProbeOptions::default(), &mut out, &mut diag);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn full_capability_run_prints_all_sections() {
        let driver = StubDriver::new(FULL_CLIENT, vec![StubDevice::default()]);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        assert!(diag.is_empty(), "unexpected diagnostics: {diag}");
        assert!(out.contains("EGL client"));
        assert!(out.contains("Client version: 1.5"));
        assert!(out.contains("EGL device 0"));
        assert!(out.contains("    EGL_DRM_DEVICE_FILE_EXT: /dev/dri/card0"));
        assert!(out.contains("    EGL_DRM_RENDER_NODE_FILE_EXT: /dev/dri/renderD128"));
        assert!(out.contains("Display vendor: Stub Inc."));
        assert!(out.contains("Display driver name: stubdrv (from EGL_MESA_query_driver)"));
        assert!(out.contains("OpenGL version: 4.6 (Core Profile) Stub"));
        assert!(out.contains("OpenGL renderer: Stub Rasterizer 3000"));
        assert!(out.contains("GL_ARB_stub\n"));

        let calls = driver.calls.borrow();
        assert_eq!(calls.debug_sinks_installed, 1);
        assert_eq!(calls.contexts_created, 1);
        assert_eq!(calls.displays_terminated, 1);
    }

    #[test]
    fn missing_client_extensions_is_fatal() {
        let driver = StubDriver {
            client_extensions: None,
            devices: Some(vec![StubDevice::default()]),
            calls: RefCell::new(Calls::default()),
        };
        let (result, out, _diag) = run_probe(&driver);
        assert!(matches!(result, Err(ProbeError::ClientExtensionsUnsupported)));
        assert!(out.is_empty());
    }

    #[test]
    fn missing_device_enumeration_skips_with_diagnostic() {
        let driver = StubDriver::new("EGL_EXT_client_extensions EGL_KHR_debug", vec![]);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        assert!(out.contains("EGL client"));
        assert!(!out.contains("EGL device"));
        assert!(diag.contains("EGL_EXT_device_base not supported"));
        assert_eq!(driver.calls.borrow().displays_terminated, 0);
    }

    #[test]
    fn missing_debug_extension_skips_sink_registration() {
        let driver =
            StubDriver::new("EGL_EXT_client_extensions EGL_EXT_device_base", vec![]);
        let (result, _out, _diag) = run_probe(&driver);
        assert!(result.is_ok());
        assert_eq!(driver.calls.borrow().debug_sinks_installed, 0);
    }

    #[test]
    fn zero_devices_produce_zero_sections() {
        let driver = StubDriver::new(FULL_CLIENT, vec![]);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        assert!(!out.contains("EGL device"));
        assert!(diag.is_empty());
    }

    #[test]
    fn terminate_runs_once_per_initialized_display_only() {
        let devices = vec![
            StubDevice { open_display: false, ..StubDevice::default() },
            StubDevice { initialize: false, ..StubDevice::default() },
            StubDevice::default(),
        ];
        let driver = StubDriver::new(FULL_CLIENT, devices);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        // One failing device must not hide the ones after it.
        assert!(out.contains("EGL device 0"));
        assert!(out.contains("EGL device 1"));
        assert!(out.contains("EGL device 2"));
        assert!(diag.contains("eglGetPlatformDisplay"));
        assert!(diag.contains("eglInitialize failed"));
        assert_eq!(driver.calls.borrow().displays_terminated, 1);
    }

    #[test]
    fn context_requires_both_display_tokens() {
        for display_extensions in
            ["EGL_KHR_no_config_context", "EGL_KHR_surfaceless_context", ""]
        {
            let devices = vec![StubDevice { display_extensions, ..StubDevice::default() }];
            let driver = StubDriver::new(FULL_CLIENT, devices);
            let (result, out, diag) = run_probe(&driver);

            assert!(result.is_ok());
            assert!(!out.contains("OpenGL version:"));
            assert!(diag.contains("needed to create an OpenGL context"));
            let calls = driver.calls.borrow();
            assert_eq!(calls.contexts_created, 0);
            assert_eq!(calls.displays_terminated, 1);
        }
    }

    #[test]
    fn failed_bind_api_skips_context_but_still_terminates() {
        let devices = vec![StubDevice { bind_api: false, ..StubDevice::default() }];
        let driver = StubDriver::new(FULL_CLIENT, devices);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        assert!(out.contains("Display extensions:"));
        assert!(!out.contains("OpenGL version:"));
        assert!(diag.contains("eglBindAPI"));
        assert_eq!(driver.calls.borrow().contexts_created, 0);
        assert_eq!(driver.calls.borrow().displays_terminated, 1);
    }

    #[test]
    fn failed_make_current_skips_gl_queries_but_still_terminates() {
        let devices = vec![StubDevice { make_current: false, ..StubDevice::default() }];
        let driver = StubDriver::new(FULL_CLIENT, devices);
        let (result, out, diag) = run_probe(&driver);

        assert!(result.is_ok());
        assert!(!out.contains("OpenGL version:"));
        assert!(diag.contains("eglMakeCurrent failed"));
        assert_eq!(driver.calls.borrow().contexts_created, 1);
        assert_eq!(driver.calls.borrow().displays_terminated, 1);
    }

    #[test]
    fn device_without_drm_tokens_never_queries_paths() {
        struct PathFaultDriver(StubDriver);

        impl EglDriver for PathFaultDriver {
            type Device = usize;
            type Display = usize;
            type Context = usize;

            fn query_client_string(&self, query: StringQuery) -> Option<String> {
                self.0.query_client_string(query)
            }
            fn install_debug_sink(&self) -> bool {
                self.0.install_debug_sink()
            }
            fn enumerate_devices(&self) -> Option<Vec<usize>> {
                self.0.enumerate_devices()
            }
            fn query_device_string(&self, device: usize, query: DeviceQuery) -> Option<String> {
                // Some drivers fault on ungated attribute queries; the
                // probe must never get here for these.
                assert!(
                    query == DeviceQuery::Extensions,
                    "attribute query attempted without its capability token"
                );
                self.0.query_device_string(device, query)
            }
            fn open_display(&self, device: usize) -> Option<usize> {
                self.0.open_display(device)
            }
            fn initialize_display(&self, display: usize) -> bool {
                self.0.initialize_display(display)
            }
            fn terminate_display(&self, display: usize) {
                self.0.terminate_display(display)
            }
            fn query_display_string(&self, display: usize, query: StringQuery) -> Option<String> {
                self.0.query_display_string(display, query)
            }
            fn display_driver_name(&self, display: usize) -> Option<String> {
                self.0.display_driver_name(display)
            }
            fn bind_opengl_api(&self) -> bool {
                self.0.bind_opengl_api()
            }
            fn create_context(&self, display: usize, version: ContextVersion) -> Option<usize> {
                self.0.create_context(display, version)
            }
            fn make_current_surfaceless(&self, display: usize, context: usize) -> bool {
                self.0.make_current_surfaceless(display, context)
            }
            fn query_gl_string(&self, query: GlQuery) -> Option<String> {
                self.0.query_gl_string(query)
            }
            fn query_gl_extensions(&self) -> Option<Vec<String>> {
                self.0.query_gl_extensions()
            }
        }

        let devices = vec![StubDevice { extensions: "EGL_NV_device_cuda", ..StubDevice::default() }];
        let driver = PathFaultDriver(StubDriver::new(FULL_CLIENT, devices));
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let result = run(&driver, &ProbeOptions::default(), &mut out, &mut diag);

        assert!(result.is_ok());
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Device extensions: EGL_NV_device_cuda"));
        assert!(!out.contains("EGL_DRM_DEVICE_FILE_EXT"));
        assert!(!out.contains("EGL_DRM_RENDER_NODE_FILE_EXT"));
    }
}
