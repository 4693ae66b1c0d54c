use anyhow::Context;
use clap::Parser;
use perforce_connector::config::{
    ConnectionParameters, DEFAULT_CONFIG_FILE, ParamOverrides, global_config_dir, load_params,
    resolve_config_path,
};
use perforce_connector::icon::{default_asset_dir, load_icon};
use perforce_connector::{ConnectorContext, DataSource, P4Client, Params, PerforceConnector};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[clap(version, about = "Synchronize a local directory with a Perforce server")]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Parser)]
enum Command {
    /// Create a config file with placeholder connection parameters.
    Init {
        #[clap(long, default_value(DEFAULT_CONFIG_FILE))]
        config_path: PathBuf,
    },
    /// Run `p4 sync` into the configured target directory.
    Fetch {
        /// Defaults to `perforce-connector.toml` in the current directory, then
        /// the platform config directory.
        #[clap(long)]
        config_path: Option<PathBuf>,
        #[clap(long, default_value = "perforce")]
        name: String,
        #[clap(long, env = "P4PORT")]
        server: Option<String>,
        #[clap(long, env = "P4USER")]
        user: Option<String>,
        #[clap(long, env = "P4PASSWD", hide_env_values = true)]
        password: Option<String>,
        #[clap(long, env = "P4_TARGET_DIRECTORY")]
        target_directory: Option<PathBuf>,
        /// Use this `p4` binary instead of searching PATH.
        #[clap(long)]
        p4: Option<PathBuf>,
    },
    /// Print the connection schema as JSON.
    Schema,
    /// Print the connector icon as SVG.
    Icon {
        #[clap(long)]
        asset_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.cmd {
        Command::Init { config_path } => {
            if config_path.exists() {
                return Err(anyhow::anyhow!(
                    "{} already exists, not overwriting it",
                    config_path.display()
                ));
            }
            let config = ConnectionParameters {
                server: "ssl:<perforce-host>:1666".to_string(),
                user: "<user>".to_string(),
                password: "<password>".to_string(),
                target_directory: PathBuf::from("<target-directory>"),
            };
            config.write(&config_path).context("cannot write config")?;
            println!("Created config file at {}", config_path.display());
        }
        Command::Fetch {
            config_path,
            name,
            server,
            user,
            password,
            target_directory,
            p4,
        } => {
            let global_dir = global_config_dir();
            let config_path =
                resolve_config_path(config_path, Path::new(""), global_dir.as_deref())?;
            let mut params = match config_path {
                Some(path) => load_params(&path).context(
                    "cannot load config. Run the `init` command to initialize it.",
                )?,
                None => Params::new(),
            };
            ParamOverrides {
                server,
                user,
                password,
                target_directory,
            }
            .apply(&mut params);

            let mut connector = PerforceConnector::new(ConnectorContext::named(name), params);
            if let Some(p4) = p4 {
                connector = connector.with_client(P4Client::at(p4));
            }
            connector.fetch().context("fetch failed")?;
        }
        Command::Schema => {
            let connector = PerforceConnector::new(ConnectorContext::default(), Params::new());
            let schema = serde_json::to_string_pretty(&connector.connection_data())
                .context("cannot serialize connection schema")?;
            println!("{schema}");
        }
        Command::Icon { asset_dir } => {
            let asset_dir = asset_dir.or_else(default_asset_dir);
            println!("{}", load_icon(asset_dir.as_deref()));
        }
    }

    Ok(())
}
