use dotenvy::dotenv;
use dsx_dashboard::{
    api::{self, AppState},
    config::{database, settings},
    core::{contact::ResendMailer, seed},
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Open the in-memory store and create the tables
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Load the demo data set
    seed::seed_demo_data(&db)
        .await
        .inspect_err(|e| error!("Failed to seed demo data: {}", e))?;

    // 6. Serve the API; RESEND_API_KEY is read here, not stored in AppConfig
    let state = AppState {
        db,
        mailer: Arc::new(ResendMailer::from_env()),
        config: Arc::new(app_config),
    };
    api::serve(state).await
}
