use dietplanner::{app, state::AppState};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "dietplanner=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");

    let fmt = tracing_subscriber::fmt().with_env_filter(env_filter);
    if json_logs {
        fmt.with_target(false).json().init();
    } else {
        fmt.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::init().await?;
    app::serve(app::build_app(state)).await
}
