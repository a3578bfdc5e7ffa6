#![allow(dead_code)]

use kobako::{ChildProcess, ChildStatus, Environment, Invocation, ProcessHost};
use nix::sys::signal::Signal;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Host that records every call and never touches the operating system.
pub struct FakeHost {
    runtime: Option<PathBuf>,
    status: ChildStatus,
    spawn_error: Option<io::ErrorKind>,
    pub located: Mutex<Vec<String>>,
    pub spawned: Mutex<Vec<Invocation>>,
    pub signals: Mutex<Vec<(u32, Signal)>>,
}

impl FakeHost {
    /// Runtime found at `/usr/bin/docker`; the child exits with `status`.
    pub fn exiting(status: ChildStatus) -> Self {
        Self {
            runtime: Some(PathBuf::from("/usr/bin/docker")),
            status,
            spawn_error: None,
            located: Mutex::new(Vec::new()),
            spawned: Mutex::new(Vec::new()),
            signals: Mutex::new(Vec::new()),
        }
    }

    /// Runtime missing from the search path.
    pub fn without_runtime() -> Self {
        Self {
            runtime: None,
            ..Self::exiting(ChildStatus::Exited(0))
        }
    }

    /// Runtime found but spawning fails with `kind`.
    pub fn failing_spawn(kind: io::ErrorKind) -> Self {
        Self {
            spawn_error: Some(kind),
            ..Self::exiting(ChildStatus::Exited(0))
        }
    }

    pub fn spawned_args(&self) -> Vec<Vec<String>> {
        self.spawned
            .lock()
            .unwrap()
            .iter()
            .map(|inv| {
                inv.args
                    .iter()
                    .map(|a| a.to_string_lossy().into_owned())
                    .collect()
            })
            .collect()
    }
}

impl ProcessHost for FakeHost {
    fn locate(&self, program: &str, _search_path: &OsStr) -> Option<PathBuf> {
        self.located.lock().unwrap().push(program.to_string());
        self.runtime.clone()
    }

    fn spawn(&self, invocation: &Invocation) -> io::Result<Box<dyn ChildProcess>> {
        if let Some(kind) = self.spawn_error {
            return Err(io::Error::new(kind, "spawn refused"));
        }
        self.spawned.lock().unwrap().push(invocation.clone());
        Ok(Box::new(FinishedChild(self.status)))
    }

    fn signal(&self, pid: u32, signal: Signal) -> io::Result<()> {
        self.signals.lock().unwrap().push((pid, signal));
        Ok(())
    }
}

struct FinishedChild(ChildStatus);

impl ChildProcess for FinishedChild {
    fn id(&self) -> u32 {
        1234
    }

    fn wait(&mut self) -> io::Result<ChildStatus> {
        Ok(self.0)
    }
}

/// Environment of a caller in `/home/dev/project` with uid/gid 1000.
pub fn environment(vars: &[(&str, &str)]) -> Environment {
    let mut vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.entry("PATH".to_string())
        .or_insert_with(|| "/usr/bin:/bin".to_string());
    Environment {
        vars,
        current_dir: Ok(PathBuf::from("/home/dev/project")),
        uid: 1000,
        gid: 1000,
    }
}

pub fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Command-line arguments as the launcher receives them.
pub fn argv(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}
