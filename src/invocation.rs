use crate::classify::Dispatch;
use crate::config::RuntimeConfig;
use std::ffi::OsString;
use std::path::PathBuf;

/// A fully assembled runtime command line.
///
/// Standard streams are always inherited from the launcher, so they are not part of
/// the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Path of the container runtime executable.
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Build `run --rm -i --user U -v HOST:WORKDIR -w WORKDIR IMAGE <command>`.
    ///
    /// Image names and paths are passed through as given; the runtime reports
    /// anything malformed.
    pub fn build(program: PathBuf, config: &RuntimeConfig) -> Self {
        let mut mount = config.host_dir.clone().into_os_string();
        mount.push(":");
        mount.push(&config.workdir);

        let mut args: Vec<OsString> = vec![
            "run".into(),
            "--rm".into(),
            "-i".into(),
            "--user".into(),
            config.user.clone().into(),
            "-v".into(),
            mount,
            "-w".into(),
            config.workdir.clone().into(),
            config.image.clone().into(),
        ];
        match &config.dispatch {
            Dispatch::Shell(line) => {
                args.extend([OsString::from("sh"), OsString::from("-c"), line.clone()]);
            }
            Dispatch::Exec(command) => args.extend(command.iter().cloned()),
        }

        Self { program, args }
    }

    /// Human-readable command line for logs.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dispatch: Dispatch) -> RuntimeConfig {
        RuntimeConfig {
            image: "alpine:latest".to_string(),
            host_dir: PathBuf::from("/home/dev/project"),
            workdir: "/work".to_string(),
            user: "1000:1000".to_string(),
            dispatch,
        }
    }

    fn args(inv: &Invocation) -> Vec<&str> {
        inv.args.iter().map(|a| a.to_str().unwrap()).collect()
    }

    #[test]
    fn exec_appends_command_unchanged() {
        let dispatch = Dispatch::Exec(vec!["echo".into(), "hello".into()]);
        let inv = Invocation::build(PathBuf::from("/usr/bin/docker"), &config(dispatch));

        assert_eq!(inv.program, PathBuf::from("/usr/bin/docker"));
        assert_eq!(
            args(&inv),
            vec![
                "run",
                "--rm",
                "-i",
                "--user",
                "1000:1000",
                "-v",
                "/home/dev/project:/work",
                "-w",
                "/work",
                "alpine:latest",
                "echo",
                "hello",
            ]
        );
    }

    #[test]
    fn shell_appends_sh_dash_c() {
        let dispatch = Dispatch::Shell("make && deploy".into());
        let inv = Invocation::build(PathBuf::from("docker"), &config(dispatch));

        assert_eq!(args(&inv)[10..], ["sh", "-c", "make && deploy"]);
    }

    #[test]
    fn arguments_keep_their_boundaries() {
        let dispatch = Dispatch::Exec(vec!["printf".into(), "%s\n".into(), "a b".into()]);
        let inv = Invocation::build(PathBuf::from("docker"), &config(dispatch));

        assert_eq!(args(&inv)[10..], ["printf", "%s\n", "a b"]);
    }

    #[test]
    fn non_utf8_arguments_are_passed_through() {
        use std::os::unix::ffi::OsStringExt;

        let name = OsString::from_vec(b"caf\xe9.txt".to_vec());
        let dispatch = Dispatch::Exec(vec!["cat".into(), name.clone()]);
        let inv = Invocation::build(PathBuf::from("docker"), &config(dispatch));

        assert_eq!(inv.args[10..], [OsString::from("cat"), name]);
    }

    #[test]
    fn command_line_is_space_separated() {
        let dispatch = Dispatch::Exec(vec!["true".into()]);
        let inv = Invocation::build(PathBuf::from("/bin/docker"), &config(dispatch));

        assert_eq!(
            inv.command_line(),
            "/bin/docker run --rm -i --user 1000:1000 -v /home/dev/project:/work -w /work alpine:latest true"
        );
    }
}
