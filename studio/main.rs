/// plant-doctor Studio
///
/// Browser front-end for leaf-photo disease classification.
/// Served by a synchronous tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Pick a plant, upload a leaf photo and press Predict. Model artifacts are
/// read from `<model_root>/<Plant>/`; `cargo run -- seed` writes demo ones.

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tiny_http::Server;
use tracing::info;

use plant_doctor::logging::init_logging;
use plant_doctor::workflow::PredictWorkflow;
use plant_doctor::AppConfig;

use state::StudioState;

fn main() -> Result<()> {
    // Optional single argument: path to a JSON config file.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_logging(&config.log_level, true)?;

    let addr = config.socket_addr()?;
    let server = Server::http(addr).map_err(|e| anyhow::anyhow!("Failed to bind HTTP server: {}", e))?;

    let shared_state = Arc::new(Mutex::new(StudioState::new(PredictWorkflow::from_config(&config))));

    println!("╔══════════════════════════════════════════════╗");
    println!("║          plant-doctor Studio                 ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{:<37}║", addr);
    println!("╚══════════════════════════════════════════════╝");
    info!(model_root = %config.model_root.display(), batch_size = config.batch_size, "studio ready");

    // One thread per request; a predict run does not block page loads.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
