//! Run a command inside a throwaway container as if it ran on the host.
//!
//! `kobako` picks a container image for the command, decides whether the command
//! should run directly or through `sh -c`, assembles a `docker run` command line that
//! mounts the caller's working directory, and then supervises the runtime process:
//! stdio is inherited, SIGINT/SIGTERM are relayed to it, and its exit status becomes
//! the launcher's own.
//!
//! The main entry point is [`Launcher`]. Everything that touches the operating system
//! (locating the runtime, spawning it, delivering signals) goes through the
//! [`ProcessHost`] trait so the rest of the pipeline can be driven by fakes in tests.
//! The pieces of the pipeline are public for callers that want to assemble
//! invocations themselves:
//!
//! - [`classify`]: image selection and exec-vs-shell dispatch
//! - [`config`]: environment overrides and computed defaults
//! - [`invocation`]: runtime argument vector assembly
//! - [`supervisor`]: spawning, signal forwarding and exit translation

pub mod classify;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod host;
pub mod invocation;
mod launcher;
pub mod supervisor;

pub use env::Environment;
pub use error::LaunchError;
pub use host::{ChildProcess, ChildStatus, ExitCode, ProcessHost, SystemHost};
pub use invocation::Invocation;
pub use launcher::Launcher;

/// Name the launcher reports in usage and help output.
pub const PROGRAM_NAME: &str = "kobako";

/// Version printed by `--version`.
///
/// Release builds stamp it through the `KOBAKO_VERSION` variable at compile time;
/// otherwise the package version is used.
pub const VERSION: &str = match option_env!("KOBAKO_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
