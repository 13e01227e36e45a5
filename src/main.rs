use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ielts_coach::{build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ielts_coach=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Using backend at {}", config.api_base_url);

  let state = AppState::new(&config).expect("Failed to create HTTP client");
  let app = build_router(state);

  let bind_addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config.server_port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
