use crate::error::SyncError;
use crate::utils::run_command_at;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const P4_PROGRAM: &str = "p4";

pub const P4PORT: &str = "P4PORT";
pub const P4USER: &str = "P4USER";
pub const P4PASSWD: &str = "P4PASSWD";

/// Credentials handed to a single `p4` invocation through its environment.
pub struct Credentials<'a> {
    pub server: &'a str,
    pub user: &'a str,
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    /// Environment overlay for the child process. The calling process is left untouched.
    pub fn env_overlay(&self) -> BTreeMap<&'static str, &'a str> {
        BTreeMap::from([
            (P4PORT, self.server),
            (P4USER, self.user),
            (P4PASSWD, self.password),
        ])
    }
}

#[derive(Clone, Debug)]
pub struct P4Client {
    path: PathBuf,
}

impl P4Client {
    /// Tries to figure out if `p4` is installed.
    pub fn lookup() -> Option<Self> {
        which::which(P4_PROGRAM).ok().map(|path| Self { path })
    }

    /// Uses the binary at `path` instead of searching `PATH`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `p4 sync` inside `working_dir`.
    pub fn sync(&self, working_dir: &Path, credentials: &Credentials<'_>) -> Result<(), SyncError> {
        let stdout = run_command_at(
            &self.path,
            &["sync"],
            working_dir,
            &credentials.env_overlay(),
        )?;
        if !stdout.is_empty() {
            tracing::debug!("p4 sync output:\n{stdout}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_maps_credentials_to_p4_variables() {
        let credentials = Credentials {
            server: "ssl:perforce.example.com:1666",
            user: "alice",
            password: "secret",
        };
        let overlay = credentials.env_overlay();
        assert_eq!(overlay.len(), 3);
        assert_eq!(overlay[P4PORT], "ssl:perforce.example.com:1666");
        assert_eq!(overlay[P4USER], "alice");
        assert_eq!(overlay[P4PASSWD], "secret");
    }

    #[test]
    fn pinned_client_keeps_its_path() {
        let client = P4Client::at("/opt/perforce/bin/p4");
        assert_eq!(client.path(), Path::new("/opt/perforce/bin/p4"));
    }

    #[test]
    fn sync_with_missing_binary_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let client = P4Client::at(dir.path().join("no-such-p4"));
        let credentials = Credentials {
            server: "perforce:1666",
            user: "bob",
            password: "hunter2",
        };
        let err = client.sync(dir.path(), &credentials).unwrap_err();
        assert!(matches!(err, SyncError::ClientNotFound(_)));
    }
}
