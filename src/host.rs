//! Operating system capabilities: locating, spawning and signalling the runtime.

use crate::invocation::Invocation;
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Exited normally with this code.
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
    /// The platform reported neither a code nor a signal.
    Unknown,
}

impl ChildStatus {
    /// Exit code the launcher reports for this termination.
    ///
    /// Signal deaths map to `128 + signal`, as shells do.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ChildStatus::Exited(code) => code,
            ChildStatus::Signaled(signal) => 128 + signal,
            ChildStatus::Unknown => 1,
        }
    }
}

impl From<ExitStatus> for ChildStatus {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ChildStatus::Exited(code),
            None => terminated_by_signal(status),
        }
    }
}

fn terminated_by_signal(status: ExitStatus) -> ChildStatus {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => ChildStatus::Signaled(signal),
        None => ChildStatus::Unknown,
    }
}

/// A spawned runtime process.
pub trait ChildProcess: Send {
    /// OS process id, used as the target for forwarded signals.
    fn id(&self) -> u32;

    /// Block until the process terminates.
    fn wait(&mut self) -> io::Result<ChildStatus>;
}

/// The side-effecting operations the launcher needs from the operating system.
///
/// [`SystemHost`] is the real implementation; tests substitute fakes so that
/// classification, assembly and supervision can run without a container runtime.
pub trait ProcessHost: Send + Sync {
    /// Resolve `program` against `search_path` (a `PATH`-style list).
    fn locate(&self, program: &str, search_path: &OsStr) -> Option<PathBuf>;

    /// Start the invocation with stdin, stdout and stderr inherited from the launcher.
    fn spawn(&self, invocation: &Invocation) -> io::Result<Box<dyn ChildProcess>>;

    /// Deliver `signal` to process `pid`. Delivering to a process that already
    /// exited is not an error.
    fn signal(&self, pid: u32, signal: Signal) -> io::Result<()>;
}

/// [`ProcessHost`] backed by `std::process` and `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl ProcessHost for SystemHost {
    fn locate(&self, program: &str, search_path: &OsStr) -> Option<PathBuf> {
        find_command_path(search_path, Path::new(program)).map(Cow::into_owned)
    }

    fn spawn(&self, invocation: &Invocation) -> io::Result<Box<dyn ChildProcess>> {
        let child = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        Ok(Box::new(SystemChild(child)))
    }

    fn signal(&self, pid: u32, signal: Signal) -> io::Result<()> {
        let pid = i32::try_from(pid).map_err(io::Error::other)?;
        match signal::kill(Pid::from_raw(pid), signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(errno.into()),
        }
    }
}

struct SystemChild(std::process::Child);

impl ChildProcess for SystemChild {
    fn id(&self) -> u32 {
        self.0.id()
    }

    fn wait(&mut self) -> io::Result<ChildStatus> {
        self.0.wait().map(ChildStatus::from)
    }
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it is an executable file.
/// - Relative with multiple components (e.g., `bin/docker`) or `./`-prefixed: returns
///   it if it is an executable file relative to the current directory.
/// - Single path component (no separators): search each directory in `search_paths`
///   (PATH) and return the first executable match.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        // Single component -> search in PATH
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
