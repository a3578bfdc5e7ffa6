//! Runs an [`Invocation`] to completion while relaying termination signals.
//!
//! Signals travel through an mpsc channel: [`listen_os_signals`] feeds it from the
//! operating system and [`forward_signals`] drains it into [`ProcessHost::signal`].
//! The child handle itself stays with the waiting side; the forwarder only knows
//! the pid.

use crate::error::LaunchError;
use crate::host::{ExitCode, ProcessHost};
use crate::invocation::Invocation;
use nix::sys::signal::Signal;
use std::io;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Spawn the invocation and wait for it, forwarding every signal received on
/// `signals` to the child while it runs.
///
/// Returns the child's exit code (`128 + n` if it died from signal `n`).
pub async fn supervise(
    host: Arc<dyn ProcessHost>,
    invocation: Invocation,
    signals: mpsc::Receiver<Signal>,
) -> Result<ExitCode, LaunchError> {
    let runtime = invocation.program.display().to_string();
    let mut child = host
        .spawn(&invocation)
        .map_err(|source| LaunchError::Spawn {
            runtime: runtime.clone(),
            source,
        })?;
    let pid = child.id();
    info!(pid, "container runtime started");

    let forwarder = tokio::spawn(forward_signals(host, pid, signals));
    let waited = tokio::task::spawn_blocking(move || child.wait()).await;
    forwarder.abort();

    let status = waited
        .map_err(io::Error::other)
        .and_then(|status| status)
        .map_err(|source| LaunchError::Wait { runtime, source })?;
    debug!(pid, ?status, "container runtime exited");
    Ok(status.exit_code())
}

/// Deliver each signal from `signals` to `pid` until the channel closes.
///
/// Delivery is best-effort: failures are logged and the loop keeps going.
pub async fn forward_signals(
    host: Arc<dyn ProcessHost>,
    pid: u32,
    mut signals: mpsc::Receiver<Signal>,
) {
    while let Some(signal) = signals.recv().await {
        match host.signal(pid, signal) {
            Ok(()) => debug!(pid, %signal, "forwarded signal"),
            Err(err) => warn!(pid, %signal, "failed to forward signal: {err}"),
        }
    }
}

/// Subscribe to SIGINT and SIGTERM and publish them on a channel.
///
/// Once subscribed, the signals no longer terminate the launcher itself. Must be
/// called from within a tokio runtime; abort the returned handle to stop listening.
pub fn listen_os_signals() -> io::Result<(mpsc::Receiver<Signal>, JoinHandle<()>)> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let (tx, rx) = mpsc::channel(16);

    let handle = tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = interrupt.recv() => Signal::SIGINT,
                Some(()) = terminate.recv() => Signal::SIGTERM,
                else => break,
            };
            if tx.send(received).await.is_err() {
                break;
            }
        }
    });
    Ok((rx, handle))
}
