use std::process::ExitCode;

use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use schedule_server::cache::CachedSchedulerClient;
use schedule_server::config::ServerConfig;
use schedule_server::scheduler::{MockSchedulerClient, ScheduleBackend, SchedulerClient};
use schedule_server::web::{AppState, create_router};

fn init_logger() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_backend(config: &ServerConfig) -> Result<ScheduleBackend, Box<dyn std::error::Error>> {
    match &config.mock_dir {
        Some(dir) => {
            let mock = MockSchedulerClient::new(dir)?;
            Ok(ScheduleBackend::Mock(mock))
        }
        None => {
            let client = SchedulerClient::new(config.scheduler.clone())?;
            Ok(ScheduleBackend::Live(CachedSchedulerClient::new(
                client,
                &config.cache,
            )))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let backend = match build_backend(&config) {
        Ok(backend) => backend,
        Err(e) => {
            error!("failed to set up schedule source: {e}");
            return ExitCode::FAILURE;
        }
    };
    match &backend {
        ScheduleBackend::Mock(mock) => {
            let routes = mock.available_routes().await;
            info!(source = backend.describe(), ?routes, "schedule source ready");
        }
        ScheduleBackend::Live(_) => {
            info!(source = backend.describe(), url = %config.scheduler.base_url, "schedule source ready");
        }
    }

    let state = AppState::new(backend, config.views.clone());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Duty schedule server listening on http://{}", config.bind_addr);
    info!("  GET  /health                      - Health check");
    info!("  GET  /api/routes/:id/grid         - Event-by-duty grid");
    info!("  GET  /api/routes/:id/duty-board   - Duty board");
    info!("  GET  /api/routes/:id/timetable    - Public timetable");
    info!("  POST /api/views                   - All views for a posted schedule");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
