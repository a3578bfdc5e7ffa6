mod common;

use common::argv;
use kobako::{Environment, Launcher, SystemHost};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A `docker` stand-in that records its arguments next to itself and exits with 7.
const FAKE_DOCKER: &str = r#"#!/bin/sh
for arg in "$@"; do
    printf '%s\n' "$arg"
done > "$(dirname "$0")/args.txt"
exit 7
"#;

#[tokio::test]
async fn test_runs_runtime_found_on_path() {
    let bin = tempfile::tempdir().unwrap();
    let docker = bin.path().join("docker");
    fs::write(&docker, FAKE_DOCKER).unwrap();
    fs::set_permissions(&docker, fs::Permissions::from_mode(0o755)).unwrap();

    let env = Environment {
        vars: [("PATH".to_string(), bin.path().display().to_string())]
            .into_iter()
            .collect(),
        current_dir: Ok(PathBuf::from("/home/dev/project")),
        uid: 1000,
        gid: 1001,
    };
    let launcher = Launcher::new(Arc::new(SystemHost), env);
    let (_tx, signals) = mpsc::channel(1);
    let mut stderr = Vec::new();

    let code = launcher
        .run(
            &argv(&["--shell", "echo", "a b"]),
            signals,
            &mut Vec::new(),
            &mut stderr,
        )
        .await;

    assert_eq!(code, 7, "stderr: {}", String::from_utf8_lossy(&stderr));
    let recorded = fs::read_to_string(bin.path().join("args.txt")).unwrap();
    assert_eq!(
        recorded.lines().collect::<Vec<_>>(),
        vec![
            "run",
            "--rm",
            "-i",
            "--user",
            "1000:1001",
            "-v",
            "/home/dev/project:/work",
            "-w",
            "/work",
            "alpine:latest",
            "sh",
            "-c",
            "echo a b",
        ]
    );
}
