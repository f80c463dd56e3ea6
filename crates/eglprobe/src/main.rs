use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use eglprobe::cli::Cli;
use eglprobe::native::NativeDriver;
use eglprobe::probe::{self, ProbeOptions};

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version land on stdout and exit 0; everything
            // else is a usage error.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };

    let driver = match NativeDriver::load() {
        Ok(driver) => driver,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    let options = ProbeOptions {
        opengl_version: cli.opengl_version,
    };
    let mut out = io::stdout().lock();
    let result = probe::run(&driver, &options, &mut out, &mut io::stderr());
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
