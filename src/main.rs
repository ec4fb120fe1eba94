use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skytrail::config::Config;
use skytrail::server;
use skytrail::source::HttpSource;
use skytrail::state::LiveState;
use skytrail::tracker::{Tracker, TrackerSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skytrail=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    info!("tracking {:?} from {}", config.geofence, config.source_url);

    let state = LiveState::new(config.filter.clone());
    let source = Arc::new(HttpSource::new(&config.source_url, config.fetch_timeout())?);
    let mut tracker = Tracker::new(state.clone(), source, TrackerSettings::from(&config));
    tracker.start()?;

    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    tracker.stop().await;
    Ok(())
}
