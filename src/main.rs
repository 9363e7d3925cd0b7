//! EduLearn - Learning Platform Backend
//! Mission: Courses, materials and enrollments behind JWT auth and role-based access

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edulearn_backend::{
    api::{create_router, AppState},
    auth::{JwtHandler, PasswordHasher},
    config::Config,
    store::Database,
};

#[derive(Parser, Debug)]
#[command(name = "edulearn")]
#[command(about = "EduLearn API server")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Loads .env first so RUST_LOG from it reaches the filter below.
    let mut config = Config::from_env().context("Failed to load configuration")?;
    init_tracing();

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    info!("🚀 EduLearn backend starting");

    let db = Arc::new(Database::open(&config.database_path)?);
    let jwt = Arc::new(JwtHandler::new(
        config.jwt_secret.as_bytes(),
        config.application_name.clone(),
        config.token_lifetime,
    ));
    let hasher = PasswordHasher::new(config.bcrypt_cost);
    info!(
        "🔐 Token service ready (issuer: {}, lifetime: {}m, bcrypt cost: {})",
        config.application_name,
        jwt.lifetime().num_minutes(),
        hasher.cost()
    );

    let state = AppState::new(db, jwt, hasher);

    if let Some(admin) = &config.admin {
        state
            .users
            .ensure_admin(&admin.name, &admin.email, &admin.password)
            .context("Failed to create bootstrap admin")?;
    }

    let app = create_router(state)?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edulearn_backend=debug,edulearn=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
