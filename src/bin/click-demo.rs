// Copyright (c) 2025 - Cowboy AI, Inc.
//! Click Demo
//!
//! Terminal stand-in for the canvas page: clicks and strategy selection are
//! typed on stdin, markers are kept on an in-memory surface.
//!
//! ```text
//! click X Y        click at (X, Y)
//! strategy NAME    switch | merge | concat | exhaust
//! show             print live markers
//! history          print every draw and clear so far
//! quit
//! ```
//!
//! Run with: RUST_LOG=debug cargo run --bin click-demo
//!
//! Configuration comes from SCHEDULER_DELAY_MS, SCHEDULER_STRATEGY and
//! SCHEDULER_CLICK_FEEDBACK.

use anyhow::{bail, Context, Result};
use click_scheduler::frp::Discrete;
use click_scheduler::{InputSource, RecordingSurface, SchedulerConfig, Strategy, StreamScheduler};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

enum Command {
    Click(i32, i32),
    Select(Strategy),
    Show,
    History,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some("click") => {
            let x = words.next().context("click needs X")?.parse().context("X must be an integer")?;
            let y = words.next().context("click needs Y")?.parse().context("Y must be an integer")?;
            Command::Click(x, y)
        }
        Some("strategy") => {
            let name = words.next().context("strategy needs a name")?;
            Command::Select(name.parse()?)
        }
        Some("show") => Command::Show,
        Some("history") => Command::History,
        Some("quit") | Some("exit") => Command::Quit,
        Some(other) => bail!("unknown command: {other}"),
        None => bail!("empty command"),
    };
    Ok(command)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = SchedulerConfig::from_env().context("Invalid scheduler configuration")?;
    info!("Configuration loaded:");
    info!("  - delay: {} ms", config.delay_ms);
    info!("  - strategy: {}", config.initial_strategy);
    info!("  - click feedback: {}", config.click_feedback);

    let source = InputSource::new();
    let surface = Arc::new(RecordingSurface::new());
    let mut scheduler = StreamScheduler::spawn(config, source.clone(), surface.clone())
        .context("Failed to start scheduler")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Click(x, y)) => {
                let event = source.emit(x, y);
                println!("click #{} at {}", event.seq, event.at);
            }
            Ok(Command::Select(strategy)) => {
                scheduler.set_strategy(strategy);
                println!("strategy: {} ({})", strategy, strategy.color());
            }
            Ok(Command::Show) => {
                let markers = surface.live_markers();
                println!("{} live marker(s), strategy {}", markers.len(), scheduler.strategy());
                for marker in markers {
                    println!("  {} {}x{} at {}", marker.color, marker.size, marker.size, marker.at);
                }
            }
            Ok(Command::History) => {
                for (time, op) in surface.timeline().occurrences() {
                    println!("  {time:>6} ms  {op:?}");
                }
            }
            Ok(Command::Quit) => break,
            Err(e) => warn!("{e:#}"),
        }
    }

    scheduler.stop();
    info!("Click demo finished");
    Ok(())
}
