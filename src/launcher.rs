use crate::classify;
use crate::cli::{LaunchArgs, USAGE};
use crate::config::{Overrides, RuntimeConfig};
use crate::env::Environment;
use crate::error::LaunchError;
use crate::host::{ExitCode, ProcessHost};
use crate::invocation::Invocation;
use crate::supervisor;
use argh::EarlyExit;
use nix::sys::signal::Signal;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Runs one command in a container: parse, classify, assemble, supervise.
///
/// The launcher owns an [`Environment`] snapshot and a [`ProcessHost`]; it never
/// reads process state on its own.
///
/// Example
/// ```no_run
/// use kobako::{Environment, Launcher, SystemHost};
/// use std::sync::Arc;
///
/// # async fn demo() {
/// let launcher = Launcher::new(Arc::new(SystemHost), Environment::capture());
/// let (_tx, signals) = tokio::sync::mpsc::channel(1);
/// let args: Vec<std::ffi::OsString> = vec!["echo".into(), "hello".into()];
/// let code = launcher
///     .run(&args, signals, &mut std::io::stdout(), &mut std::io::stderr())
///     .await;
/// assert_eq!(code, 0);
/// # }
/// ```
pub struct Launcher {
    host: Arc<dyn ProcessHost>,
    env: Environment,
}

impl Launcher {
    pub fn new(host: Arc<dyn ProcessHost>, env: Environment) -> Self {
        Self { host, env }
    }

    /// Run the launcher with `args` (without the program name) and return the
    /// process exit code.
    ///
    /// `stdout` and `stderr` receive the launcher's own messages (version, help,
    /// errors); the container runtime always inherits the real standard streams.
    /// Usage errors are printed as they are, any other error as `kobako: <message>`.
    /// Signals received on `signals` while the runtime runs are forwarded to it.
    pub async fn run(
        &self,
        args: &[OsString],
        signals: mpsc::Receiver<Signal>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> ExitCode {
        match self.launch(args, signals, stdout).await {
            Ok(code) => code,
            Err(err @ LaunchError::Usage(_)) => {
                let _ = writeln!(stderr, "{err}");
                err.exit_code()
            }
            Err(err) => {
                let _ = writeln!(stderr, "{}: {err}", crate::PROGRAM_NAME);
                err.exit_code()
            }
        }
    }

    async fn launch(
        &self,
        args: &[OsString],
        signals: mpsc::Receiver<Signal>,
        stdout: &mut dyn Write,
    ) -> Result<ExitCode, LaunchError> {
        let args = match LaunchArgs::parse(args) {
            Ok(args) => args,
            Err(EarlyExit { output, status }) => {
                if status.is_err() {
                    return Err(LaunchError::Usage(output.trim_end().to_string()));
                }
                let _ = write!(stdout, "{output}");
                return Ok(0);
            }
        };
        if args.version {
            let _ = writeln!(stdout, "{}", crate::VERSION);
            return Ok(0);
        }
        if args.command.is_empty() && !args.shell {
            return Err(LaunchError::Usage(USAGE.to_string()));
        }

        let overrides = Overrides::from_env(&self.env);
        let classification =
            classify::classify(args.command, args.shell, overrides.image.as_deref())?;
        let program = self.locate_runtime(overrides.runtime())?;
        let config = RuntimeConfig::resolve(classification, &overrides, &self.env)?;
        info!(
            image = %config.image,
            host_dir = %config.host_dir.display(),
            workdir = %config.workdir,
            user = %config.user,
            dispatch = ?config.dispatch,
            "resolved runtime config"
        );

        let invocation = Invocation::build(program, &config);
        debug!(command = %invocation.command_line(), "launching");
        supervisor::supervise(self.host.clone(), invocation, signals).await
    }

    fn locate_runtime(&self, runtime: &str) -> Result<PathBuf, LaunchError> {
        let search_path = self.env.get_var("PATH").unwrap_or_default();
        let found = self.host.locate(runtime, OsStr::new(search_path));
        debug!(runtime, found = ?found, "located container runtime");
        found.ok_or_else(|| LaunchError::RuntimeNotFound {
            runtime: runtime.to_string(),
        })
    }
}
