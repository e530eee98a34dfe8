//! Standalone demo client binary.
//!
//! Usage:
//!   cargo run -p demo_client -- [--addr 127.0.0.1:5000] [--hz 30] [--seconds 30]
//!
//! The client connects to the server, announces its player, walks it in a
//! small square, and mirrors every other connected player it hears about.
//! Point several instances at one server to watch them move around.

use std::env;
use std::time::Duration;

use anyhow::Context;
use demo_client::client::ClientSession;
use demo_client::presentation::HeadlessScene;
use demo_shared::config::ClientConfig;
use tracing::info;

struct DemoArgs {
    cfg: ClientConfig,
    run_secs: u64,
}

fn parse_args() -> DemoArgs {
    let mut cfg = ClientConfig::default();
    let mut run_secs = 30;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.server_addr = args[i + 1].clone();
                i += 2;
            }
            "--hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1].parse().unwrap_or(cfg.tick_hz);
                i += 2;
            }
            "--seconds" if i + 1 < args.len() => {
                run_secs = args[i + 1].parse().unwrap_or(run_secs);
                i += 2;
            }
            _ => i += 1,
        }
    }
    DemoArgs { cfg, run_secs }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args();
    let hz = args.cfg.tick_hz.max(1);
    info!(server = %args.cfg.server_addr, hz, "Starting demo client");

    let mut session = ClientSession::connect(&args.cfg, HeadlessScene::new())
        .await
        .context("connect")?;

    let tick_interval = Duration::from_secs_f32(1.0 / hz as f32);
    let dt = tick_interval.as_secs_f32();
    let total_ticks = args.run_secs * hz as u64;

    for n in 0..total_ticks {
        session.registry_mut().presentation_mut().autopilot_step(dt);
        session.tick().await?;

        if n % hz as u64 == 0 {
            let pos = session.local_player().position;
            info!(
                players = session.registry().tracked_count(),
                x = pos.x,
                y = pos.y,
                "Status"
            );
        }

        tokio::time::sleep(tick_interval).await;
    }

    session.close("demo finished").await?;
    Ok(())
}
