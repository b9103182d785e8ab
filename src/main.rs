//! Tabata Timer - interval workout timer server
//!
//! This is the main entry point for the tabata-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use tabata_timer::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    services::{check_player_available, CommandSoundPlayer, LogSoundPlayer, SoundPlayer, TracingErrorReporter},
    state::{AppServices, AppState},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tabata_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting tabata-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms",
        config.host, config.port, config.tick_ms
    );

    // Fall back to logging cues when no usable player is configured
    let player: Arc<dyn SoundPlayer> = match &config.sound_command {
        Some(program) => match check_player_available(program).await {
            Ok(()) => Arc::new(CommandSoundPlayer::new(program.clone(), config.sound_dir.clone())),
            Err(e) => {
                warn!("{}, sound cues will only be logged", e);
                Arc::new(LogSoundPlayer)
            }
        },
        None => Arc::new(LogSoundPlayer),
    };

    let state = AppState::launch(AppServices {
        clock: Arc::new(SystemClock::new()),
        player,
        reporter: Arc::new(TracingErrorReporter),
        tick_interval: config.tick_interval(),
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  PUT  /inputs - Set cycles, work, rest, warmup and cooldown");
    info!("  POST /start  - Start a workout (?wait=true to block until applied)");
    info!("  POST /pause  - Pause the running workout");
    info!("  POST /resume - Resume the paused workout");
    info!("  POST /reset  - Discard the workout");
    info!("  GET  /status - Timer state and display strings");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
