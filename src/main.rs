use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use gatepass_server::config::Config;
use gatepass_server::registry::{PgTicketRegistry, TicketRegistry};
use gatepass_server::routes::create_routes;
use gatepass_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let registry: Arc<dyn TicketRegistry> = Arc::new(PgTicketRegistry::new(pool));
    let app = create_routes(AppState::new(registry));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🎟️ Check-in server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
