use anyhow::{Context, Result};
use kobako::config::LOG_VAR;
use kobako::supervisor::listen_os_signals;
use kobako::{Environment, Launcher, SystemHost};
use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let launcher = Launcher::new(Arc::new(SystemHost), Environment::capture());

    let code = runtime.block_on(async {
        let (signals, listener) =
            listen_os_signals().context("failed to subscribe to termination signals")?;
        let code = launcher
            .run(&args, signals, &mut io::stdout(), &mut io::stderr())
            .await;
        listener.abort();
        Ok::<_, anyhow::Error>(code)
    })?;

    io::stdout().flush()?;
    std::process::exit(code)
}
