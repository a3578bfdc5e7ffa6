use argh::FromArgs;
use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;

/// Short usage line printed when no command is given.
pub const USAGE: &str =
    "Usage: kobako <command> [args...] (mounts current directory into container by default)";

#[derive(FromArgs, Debug, PartialEq)]
/// Run a command inside an ephemeral container with the current directory mounted.
///
/// Options are only recognized before the command; everything from the first
/// non-option argument onward is passed to the container untouched. Use `--` to run
/// a command starting with `-`. Options given together are all options, so
/// `kobako --shell -v` prints the version.
pub struct LaunchArgs {
    #[argh(switch, short = 's')]
    /// run the command through `sh -c` inside the container, joining all arguments with spaces.
    pub shell: bool,

    #[argh(switch, short = 'v')]
    /// print the version and exit.
    pub version: bool,

    #[argh(positional, greedy)]
    /// command to run inside the container, followed by its arguments.
    pub command: Vec<OsString>,
}

impl LaunchArgs {
    /// Parse the launcher's arguments (without the program name).
    ///
    /// Only the leading option tokens go through argh; the command and its arguments
    /// are kept as given, including bytes that are not valid UTF-8.
    ///
    /// Help requests and parse errors come back as [`argh::EarlyExit`]; nothing is
    /// printed and the process is never exited from here.
    pub fn parse(args: &[OsString]) -> Result<Self, argh::EarlyExit> {
        let (options, command) = args.split_at(leading_options(args));
        let options: Vec<String> = options
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let options: Vec<&str> = options.iter().map(String::as_str).collect();

        let mut parsed = Self::from_args(&[crate::PROGRAM_NAME], &options)?;
        parsed.command.extend(command.iter().cloned());
        Ok(parsed)
    }
}

/// Number of leading tokens that belong to the launcher, including a closing `--`.
fn leading_options(args: &[OsString]) -> usize {
    let mut count = 0;
    for arg in args {
        let arg = arg.as_bytes();
        if arg == b"--" {
            return count + 1;
        }
        if arg.len() < 2 || arg[0] != b'-' {
            break;
        }
        count += 1;
    }
    count
}
