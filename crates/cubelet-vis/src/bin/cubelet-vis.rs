//! Cubelet puzzle server
//!
//! Serve a puzzle session to the 3D view.

use std::env;
use std::sync::Arc;

use cubelet_vis::{ScriptedSolver, Session, SessionConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cubelet_vis=info,cubelet_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();

    let port: u16 = args.get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let seed: Option<u64> = args.get(2).and_then(|s| s.parse().ok());

    let config = SessionConfig {
        seed,
        ..SessionConfig::default()
    };

    println!("Cubelet Puzzle Server");
    println!("=====================");
    println!();
    println!("  Scramble length:  {}", config.scramble.length);
    println!("  Autoplay every:   {:?}", config.autoplay_interval);
    println!("  Solver latency:   {:?}", config.solve_latency);
    match seed {
        Some(seed) => println!("  Seed:             {}", seed),
        None => println!("  Seed:             random"),
    }
    println!();
    println!("Starting server on http://localhost:{}", port);
    println!();

    let provider = Arc::new(ScriptedSolver::new(config.solve_latency));
    let server = VisServer::new(Session::new(config), provider);
    server.serve(port).await?;

    Ok(())
}
