use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use photoquiz::db::Db;
use photoquiz::{names, utils, AppState};

#[derive(Parser)]
#[command(version = utils::VERSION, about = "Photography quiz and course recommendation backend")]
struct Args {
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    #[arg(long, env = "DATABASE_URL", default_value = "file:photoquiz.db")]
    database_url: String,

    /// Create the admin account (or rotate its password) at startup.
    #[arg(long, env = "ADMIN_PASSWORD")]
    admin_password: Option<String>,

    /// Mark the admin session cookie `Secure`; enable behind TLS.
    #[arg(long, env = "SECURE_COOKIES")]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoquiz=debug,axum=info".into()),
        )
        .init();

    let args = Args::parse();
    tracing::info!("photoquiz {} starting", utils::VERSION);

    let db = Db::new(&args.database_url).await?;

    if let Some(password) = &args.admin_password {
        db.ensure_admin(names::DEFAULT_ADMIN_USERNAME, &utils::hash_password(password))
            .await?;
    }

    let app = photoquiz::router(AppState {
        db,
        secure_cookies: args.secure_cookies,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
