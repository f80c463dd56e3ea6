//! Command line interface.

use clap::Parser;

use crate::driver::ContextVersion;

/// Prints EGL client, device, display and OpenGL capability information.
#[derive(Debug, Parser)]
#[command(name = "eglprobe", version, about)]
pub struct Cli {
    /// OpenGL context version to request.
    #[arg(
        long = "opengl-version",
        value_name = "MAJOR.MINOR",
        default_value_t = ContextVersion::default()
    )]
    pub opengl_version: ContextVersion,
}
