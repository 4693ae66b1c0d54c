use crate::config::{
    ConnectionParameters, PASSWORD_KEY, Params, SERVER_KEY, TARGET_DIRECTORY_KEY, USER_KEY,
};
use crate::error::{ConnectorError, SyncError};
use crate::icon::{default_asset_dir, load_icon};
use crate::logger::{Logger, TracingLogger};
use crate::p4::{Credentials, P4_PROGRAM, P4Client};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONNECTION_TYPE: &str = "Perforce";

/// What a host needs to render a connection form for a connector.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConnectionSchema {
    pub connection_type: String,
    pub fields: Vec<String>,
}

/// Capabilities every data source exposes to the hosting framework.
pub trait DataSource {
    /// Pulls remote data into the local target.
    fn fetch(&self) -> Result<(), ConnectorError>;

    /// SVG markup identifying the connector type.
    fn icon(&self) -> String;

    fn connection_data(&self) -> ConnectionSchema;
}

/// Host-provided wiring. The connector keeps it but does not interpret it.
#[derive(Clone, Debug, Default)]
pub struct ConnectorContext {
    pub name: String,
    pub session: Option<String>,
    pub dependency_data_sources: Vec<String>,
    pub subscribers: Vec<String>,
}

impl ConnectorContext {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Keeps a local directory in sync with a Perforce depot via `p4 sync`.
pub struct PerforceConnector {
    context: ConnectorContext,
    params: Params,
    logger: Arc<dyn Logger>,
    /// Pinned client; when unset, `p4` is looked up on `PATH` at fetch time.
    client: Option<P4Client>,
    asset_dir: Option<PathBuf>,
}

impl PerforceConnector {
    pub fn new(context: ConnectorContext, params: Params) -> Self {
        Self {
            context,
            params,
            logger: Arc::new(TracingLogger),
            client: None,
            asset_dir: default_asset_dir(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_client(mut self, client: P4Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Directory searched for `icon.svg`.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.context.name
    }

    pub fn context(&self) -> &ConnectorContext {
        &self.context
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn resolve_client(&self) -> Result<P4Client, SyncError> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => P4Client::lookup().ok_or_else(|| {
                SyncError::ClientNotFound(format!("`{P4_PROGRAM}` is not on PATH"))
            }),
        }
    }
}

/// `create_dir_all` treats an empty path as already present, so it is rejected here.
fn create_target_directory(path: &Path) -> std::io::Result<()> {
    if path.as_os_str().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "target directory path is empty",
        ));
    }
    std::fs::create_dir_all(path)
}

impl DataSource for PerforceConnector {
    fn fetch(&self) -> Result<(), ConnectorError> {
        let ConnectionParameters {
            server,
            user,
            password,
            target_directory,
        } = ConnectionParameters::from_params(&self.params)?;
        let target = target_directory.display();

        self.logger.log(&format!(
            "Starting fetch process for Perforce server '{server}' into directory '{target}'."
        ));

        if !target_directory.exists() {
            if let Err(source) = create_target_directory(&target_directory) {
                self.logger
                    .log(&format!("Failed to create directory '{target}': {source}"));
                return Err(ConnectorError::CreateDirectory {
                    path: target_directory.clone(),
                    source,
                });
            }
            self.logger.log(&format!("Created directory: {target}"));
        }

        let credentials = Credentials {
            server: &server,
            user: &user,
            password: &password,
        };
        self.logger.log(&format!(
            "Fetching repositories for Perforce server '{server}'."
        ));
        let result = self
            .resolve_client()
            .and_then(|client| client.sync(&target_directory, &credentials));

        match result {
            Ok(()) => self
                .logger
                .log("Successfully synchronized Perforce workspace."),
            Err(SyncError::CommandFailed { stderr, .. }) => self
                .logger
                .log(&format!("Error syncing Perforce workspace: {stderr}")),
            Err(SyncError::ClientNotFound(detail)) => self
                .logger
                .log(&format!("Perforce client '{P4_PROGRAM}' not found: {detail}")),
            Err(error @ SyncError::Io(_)) => self
                .logger
                .log(&format!("Unexpected error syncing Perforce workspace: {error}")),
        }
        Ok(())
    }

    fn icon(&self) -> String {
        load_icon(self.asset_dir.as_deref())
    }

    fn connection_data(&self) -> ConnectionSchema {
        ConnectionSchema {
            connection_type: CONNECTION_TYPE.to_string(),
            fields: [SERVER_KEY, USER_KEY, PASSWORD_KEY, TARGET_DIRECTORY_KEY]
                .map(String::from)
                .to_vec(),
        }
    }
}
