use std::collections::HashMap;
use std::env as stdenv;
use std::io;
use std::path::PathBuf;

/// Snapshot of the caller's process environment for a single launch.
///
/// The environment contains:
/// - `vars`: the environment variables visible to the launcher (overrides, `PATH`).
/// - `current_dir`: the caller's working directory, or the error hit while reading it.
/// - `uid` / `gid`: the caller's real user and group ids.
///
/// This is the only place the launcher reads process-global state. Everything
/// downstream receives values derived from this snapshot.
#[derive(Debug)]
pub struct Environment {
    /// Key-value store of environment variables (e.g. `PATH`, `KOBAKO_IMAGE`).
    pub vars: HashMap<String, String>,
    /// Working directory of the caller.
    pub current_dir: io::Result<PathBuf>,
    /// Real user id of the caller.
    pub uid: u32,
    /// Real group id of the caller.
    pub gid: u32,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn capture() -> Self {
        let vars = stdenv::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            vars,
            current_dir: stdenv::current_dir(),
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get the value of an environment variable, treating an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_var(key).filter(|v| !v.is_empty())
    }
}
