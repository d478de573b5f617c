use std::fs;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use tally::auth::password;
use tally::config::{self, ServerConfig};
use tally::server::{AppState, create_router};
use tally::store::{SqliteStore, Store};
use tally::types::User;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A habit-tracking server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the server (create the database and schema)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// IANA time zone all "today" calculations use (e.g. "Asia/Ho_Chi_Minh")
        #[arg(long)]
        timezone: Option<String>,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("tally.db");
    if db_path.exists() {
        bail!("Server already initialized. Database exists at: {}", db_path.display());
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Database created at {}", db_path.display());

    if !non_interactive {
        create_first_user_prompt(&store)?;
    }

    Ok(())
}

fn create_first_user_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    let create_user = inquire::Confirm::new("Would you like to create a user now?")
        .with_default(false)
        .prompt()?;

    if !create_user {
        return Ok(());
    }

    let email = inquire::Text::new("Email:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Email cannot be empty".into())
            } else if !input.contains('@') {
                Err("Invalid email address".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Password:")
        .with_validator(|input: &str| {
            if input.len() < 8 {
                Err("Password must be at least 8 characters".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.trim().to_lowercase(),
        password_hash: password::hash_password(&password)?,
        created_at: now,
        updated_at: now,
    };

    store.create_user(&user)?;

    println!();
    println!("Created user '{}'. Sign in through the API to get a session token.", user.email);
    println!();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tally=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            data_dir,
            non_interactive,
        } => {
            run_init(data_dir, non_interactive)?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            timezone,
        } => {
            let mut config = ServerConfig::load(data_dir.into())?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(timezone) = timezone {
                config.timezone = config::parse_timezone(&timezone)?;
            }

            if !config.db_path().exists() {
                bail!(
                    "Server not initialized. Run 'tally init' first to create the database."
                );
            }

            let store = SqliteStore::new(config.db_path())?;

            info!("Tracking days in {}", config.timezone);

            let state = Arc::new(AppState {
                store: Arc::new(store),
                timezone: config.timezone,
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
