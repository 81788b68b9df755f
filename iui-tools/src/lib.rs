//! Build-support tooling for libiui.
//!
//! Two independent utilities share this crate:
//!
//! * `detect-compiler` resolves the compiler the build will use, runs it with
//!   `--version` and classifies the banner into a [`CompilerFamily`]. Kconfig
//!   consumes its `y`/`n` answers.
//! * `serve-wasm` validates the WebAssembly demo assets and serves them over
//!   HTTP with the headers browsers need for cross-origin isolation.

pub mod assets;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod mime;
pub mod probe;
pub mod server;

pub use assets::{AssetManifest, Preflight};
pub use compiler::{CompilerEnv, CompilerFamily};
pub use error::{ProbeError, ServeError};
pub use probe::{detect, have_emcc, query_version, DEFAULT_VERSION_TIMEOUT};
pub use server::{Server, ServerConfig, ShutdownHandle};
