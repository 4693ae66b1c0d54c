use crate::error::SyncError;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run `prog` with `args` in `dir`, capturing both streams.
///
/// `envs` is applied to the child only. Returns the trimmed stdout on a zero
/// exit code, otherwise the trimmed stderr inside [`SyncError::CommandFailed`].
pub fn run_command_at<S: AsRef<OsStr>>(
    prog: &Path,
    args: &[S],
    dir: &Path,
    envs: &BTreeMap<&str, &str>,
) -> Result<String, SyncError> {
    let mut cmd = Command::new(prog);
    cmd.args(args)
        .current_dir(dir)
        .envs(envs)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    tracing::debug!("+ {} in {}", display_command(prog, args), dir.display());

    // A missing working directory also surfaces as `NotFound` from spawn.
    let out = cmd.output().map_err(|error| match error.kind() {
        ErrorKind::NotFound if !prog.exists() => SyncError::ClientNotFound(format!(
            "cannot execute {}: {error}",
            prog.display()
        )),
        ErrorKind::NotFound => SyncError::Io(std::io::Error::new(
            ErrorKind::NotFound,
            format!("cannot run {} in {}: {error}", prog.display(), dir.display()),
        )),
        _ => SyncError::Io(error),
    })?;
    let stdout = String::from_utf8_lossy(out.stdout.trim_ascii()).to_string();
    if !out.status.success() {
        return Err(SyncError::CommandFailed {
            code: out.status.code(),
            stderr: String::from_utf8_lossy(out.stderr.trim_ascii()).to_string(),
        });
    }
    Ok(stdout)
}

// Never includes the environment, which carries the password.
fn display_command<S: AsRef<OsStr>>(prog: &Path, args: &[S]) -> String {
    std::iter::once(prog.as_os_str())
        .chain(args.iter().map(AsRef::as_ref))
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_trimmed_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let envs = BTreeMap::from([("GREETING", "hello")]);
        let out = run_command_at(
            Path::new("/bin/sh"),
            &["-c", "echo \"  $GREETING from $(pwd)  \""],
            dir.path(),
            &envs,
        )
        .unwrap();
        let expected_dir = dir.path().canonicalize().unwrap();
        assert_eq!(out, format!("hello from {}", expected_dir.display()));
    }

    #[test]
    fn failure_carries_trimmed_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command_at(
            Path::new("/bin/sh"),
            &["-c", "echo '  broken  ' >&2; exit 3"],
            dir.path(),
            &BTreeMap::new(),
        )
        .unwrap_err();
        match err {
            SyncError::CommandFailed { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command_at(
            Path::new("/definitely/not/here/p4"),
            &["sync"],
            dir.path(),
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::ClientNotFound(_)));
    }

    #[test]
    fn missing_working_directory_is_not_a_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command_at(
            Path::new("/bin/sh"),
            &["-c", "exit 0"],
            &dir.path().join("gone"),
            &BTreeMap::new(),
        )
        .unwrap_err();
        match err {
            SyncError::Io(error) => {
                assert_eq!(error.kind(), ErrorKind::NotFound);
                assert!(error.to_string().contains("gone"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn display_omits_environment() {
        assert_eq!(display_command(Path::new("p4"), &["sync", "-q"]), "p4 sync -q");
    }
}
