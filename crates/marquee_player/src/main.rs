// SPDX-License-Identifier: MIT OR Apache-2.0
//! Marquee headless preview player.
//!
//! Parses a declarative RON layout into a timeline tree of logging stub
//! widgets and drives the root on the real-time driver. This is the harness
//! the engine is developed against; the production player swaps the stubs
//! for real rendering widgets behind the same `PlaybackUnit` contract.

mod layout;
mod widgets;

use clap::Parser;
use marquee_timeline::{Driver, PlaybackUnit, DEFAULT_TICK_PERIOD_MS};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "marquee-player")]
#[command(about = "Headless preview of a Marquee layout: schedules slots and logs transport calls")]
#[command(version)]
struct Cli {
    /// Layout description (RON)
    layout: PathBuf,

    /// How long to run the preview, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    run_for_ms: u64,

    /// Driver polling period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_PERIOD_MS)]
    tick_period_ms: u64,

    /// Start the preview from this offset instead of zero
    #[arg(long)]
    seek_ms: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("marquee_player=info".parse().unwrap())
        .add_directive("marquee_timeline=debug".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let desc = match layout::load(&cli.layout) {
        Ok(desc) => desc,
        Err(e) => {
            tracing::error!("could not load {}: {}", cli.layout.display(), e);
            std::process::exit(1);
        }
    };

    let mut root = layout::build(&desc);
    tracing::info!(
        items = root.item_count(),
        duration_ms = root.duration(),
        looping = root.looping(),
        "layout loaded"
    );

    let offset = cli.seek_ms.unwrap_or(0);
    if let Some(seek_ms) = cli.seek_ms {
        // Pre-stage widgets at the deep-linked position before playing.
        if let Err(e) = root.seek(seek_ms) {
            tracing::warn!("seek failed: {}", e);
        }
    }
    if let Err(e) = root.play(offset) {
        tracing::warn!("play failed: {}", e);
    }

    let mut driver = Driver::new();
    let started = Instant::now();
    let run_for = Duration::from_millis(cli.run_for_ms);
    while started.elapsed() < run_for {
        driver.tick(&mut root);
        std::thread::sleep(Duration::from_millis(cli.tick_period_ms));
    }

    // Active widgets must release their resources on teardown.
    if let Err(e) = root.pause() {
        tracing::warn!("pause failed: {}", e);
    }
    tracing::info!(stopped_at_ms = root.time_ms(), "preview finished");
}
