//! Environment overrides and the resolved per-launch configuration.

use crate::classify::{Classification, Dispatch};
use crate::env::Environment;
use crate::error::LaunchError;
use std::io;
use std::path::PathBuf;

pub const IMAGE_VAR: &str = "KOBAKO_IMAGE";
pub const HOST_DIR_VAR: &str = "KOBAKO_HOST_DIR";
pub const WORKDIR_VAR: &str = "KOBAKO_WORKDIR";
pub const USER_VAR: &str = "KOBAKO_USER";
pub const RUNTIME_VAR: &str = "KOBAKO_RUNTIME";
pub const LOG_VAR: &str = "KOBAKO_LOG";

/// Mount point and working directory inside the container.
pub const DEFAULT_WORKDIR: &str = "/work";
/// Container runtime looked up on `PATH`.
pub const DEFAULT_RUNTIME: &str = "docker";

/// Values the user set through `KOBAKO_*` variables. Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub image: Option<String>,
    pub host_dir: Option<String>,
    pub workdir: Option<String>,
    pub user: Option<String>,
    pub runtime: Option<String>,
}

impl Overrides {
    pub fn from_env(env: &Environment) -> Self {
        let get = |key| env.get_non_empty(key).map(str::to_string);
        Self {
            image: get(IMAGE_VAR),
            host_dir: get(HOST_DIR_VAR),
            workdir: get(WORKDIR_VAR),
            user: get(USER_VAR),
            runtime: get(RUNTIME_VAR),
        }
    }

    /// Runtime program name (or path) to look up.
    pub fn runtime(&self) -> &str {
        self.runtime.as_deref().unwrap_or(DEFAULT_RUNTIME)
    }
}

/// Everything the invocation builder needs, resolved once per launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub image: String,
    /// Host directory bind-mounted into the container.
    pub host_dir: PathBuf,
    /// Mount target and working directory inside the container.
    pub workdir: String,
    /// Value passed to `--user`, `uid:gid` unless overridden.
    pub user: String,
    pub dispatch: Dispatch,
}

impl RuntimeConfig {
    /// Merge the classifier's decision with overrides and computed defaults.
    ///
    /// Fails only when no host directory override is set and the caller's working
    /// directory could not be determined.
    pub fn resolve(
        classification: Classification,
        overrides: &Overrides,
        env: &Environment,
    ) -> Result<Self, LaunchError> {
        let host_dir = match (&overrides.host_dir, &env.current_dir) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Ok(cwd)) => cwd.clone(),
            (None, Err(err)) => {
                return Err(LaunchError::WorkingDirectory(io::Error::new(
                    err.kind(),
                    err.to_string(),
                )));
            }
        };
        let workdir = overrides
            .workdir
            .clone()
            .unwrap_or_else(|| DEFAULT_WORKDIR.to_string());
        let user = overrides
            .user
            .clone()
            .unwrap_or_else(|| format!("{}:{}", env.uid, env.gid));

        Ok(Self {
            image: classification.image,
            host_dir,
            workdir,
            user,
            dispatch: classification.dispatch,
        })
    }
}
