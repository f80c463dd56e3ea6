//! EGL/OpenGL capability prober.
//!
//! `eglprobe` walks the discovery chain a headless renderer would walk:
//! client-level extensions, the EGL device list, one display per device,
//! and finally a surfaceless OpenGL context, printing whatever each stage
//! exposes. Every optional stage is gated on the extension token that
//! advertises it and degrades to a skip (with a diagnostic on stderr)
//! when the token is missing or a call fails. Only one condition is
//! fatal: an EGL that cannot even answer the display-less extension
//! query.
//!
//! The driver surface is abstracted behind [`driver::EglDriver`] so the
//! probe logic can be exercised against a scripted stub; the real
//! implementation over the system `libEGL` is [`native::NativeDriver`].

pub mod cli;
pub mod debug;
pub mod driver;
pub mod extensions;
pub mod native;
pub mod probe;
