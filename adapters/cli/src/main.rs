#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Road Skirmish encounter headlessly.

mod config;
mod script;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use road_skirmish_core::WELCOME_BANNER;
use road_skirmish_encounter::{Encounter, PresentationEvent, TickReport};
use script::InputScript;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Frames simulated when neither a script nor a frame count is supplied.
const DEFAULT_FRAMES: usize = 600;

/// Runs an encounter from a configuration file and a scripted input sequence.
#[derive(Debug, Parser)]
#[command(name = "road-skirmish", version, about)]
struct Args {
    /// Encounter configuration in TOML; the reference encounter when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Scripted input in TOML; the player idles when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Seed for the creature's direction choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,
    /// Number of frames to simulate; defaults to the script's length.
    #[arg(long)]
    frames: Option<usize>,
    /// Emit every tick report as a JSON line instead of a text log.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Road Skirmish command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    let frames = args.frames.unwrap_or(match script.frame_count() {
        0 => DEFAULT_FRAMES,
        count => count,
    });

    let mut encounter =
        Encounter::new(&config, args.seed).context("invalid encounter configuration")?;
    info!(seed = args.seed, frames, "encounter ready");

    let dt = Duration::from_millis(args.frame_ms);
    let mut out = BufWriter::new(io::stdout().lock());
    if !args.json {
        writeln!(out, "{WELCOME_BANNER}")?;
    }

    let mut last = None;
    for input in script.frames().take(frames) {
        let report = encounter.on_tick(dt, input.intent, input.attack);
        if args.json {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
        } else if !report.events.is_empty() {
            writeln!(out, "{}", describe(&report))?;
        }
        let resolved = encounter.is_resolved();
        last = Some(report);
        if resolved {
            break;
        }
    }

    if !args.json {
        writeln!(out, "{}", summarize(last.as_ref()))?;
    }
    out.flush()?;
    Ok(())
}

fn describe(report: &TickReport) -> String {
    let events = report
        .events
        .iter()
        .map(describe_event)
        .collect::<Vec<_>>()
        .join("; ");
    format!("[tick {:>5}] {events}", report.tick)
}

fn describe_event(event: &PresentationEvent) -> String {
    match event {
        PresentationEvent::PlayerAttacked => "player attacks".to_owned(),
        PresentationEvent::AttackRecovered => "player recovers".to_owned(),
        PresentationEvent::CreatureDamaged {
            amount,
            remaining_hp,
        } => format!("creature takes {amount} damage ({remaining_hp} hp left)"),
        PresentationEvent::CreatureDefeated => "creature defeated".to_owned(),
        PresentationEvent::MovementBlocked { agent, axis } => {
            format!("{agent:?} blocked on the {axis:?} axis")
        }
    }
}

fn summarize(last: Option<&TickReport>) -> String {
    let Some(report) = last else {
        return "no frames simulated".to_owned();
    };

    let player = report.player.position;
    let creature = match report.creature {
        Some(creature) => format!(
            "creature at ({:.1}, {:.1}) with {} hp",
            creature.position.x(),
            creature.position.y(),
            creature.stats.hp
        ),
        None => "creature defeated".to_owned(),
    };
    format!(
        "after {} ticks: player at ({:.1}, {:.1}), {creature}",
        report.tick,
        player.x(),
        player.y()
    )
}
