mod config;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");

    // Chat proxy is optional: the widget can still talk to the endpoint directly.
    match config.chat_upstream.as_deref() {
        Some(upstream) => tracing::info!(%upstream, "chat proxy enabled"),
        None => tracing::warn!("CHAT_UPSTREAM_URL not set; chat proxy disabled"),
    }
    if let Some(dir) = &config.site_dir {
        tracing::info!(site_dir = %dir.display(), "serving static site");
    }

    let state = state::AppState::new(&config).expect("http client init failed");
    let app = routes::app(state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "folio listening");
    axum::serve(listener, app).await.expect("server failed");
}
