//! trim-inspect - check a playlist definition before publishing it
//!
//! Prints every item's trim window, validation problems and cue indicator
//! geometry, dry-runs the playlist through the sequencer, and optionally draws
//! an amplitude analysis as a text waveform.
//!
//! Usage:
//!   trim-inspect <playlist.yaml> [--config engine.yaml] [--samples analysis.yaml]
//!                [--position SECONDS] [--bars N]

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use clipcue_core::config::{default_config_path, load_config, EngineConfig};
use clipcue_core::playback::{PlaybackCommand, PlaybackWindowController};
use clipcue_core::playlist::{
    load_definition, AdvanceOutcome, Clock, ManualClock, PlaylistSequencer,
};
use clipcue_core::{timecode, PlayableItem};
use clipcue_widgets::waveform::played_ratio;
use clipcue_widgets::{compute_bars_with_epsilon, RenderedBar, WaveformConfig};

/// Glyphs from quietest to loudest
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Upper bound on dry-run steps, in case a definition never finishes
const MAX_DRY_RUN_TICKS: usize = 1_000_000;

struct Args {
    playlist: PathBuf,
    config: Option<PathBuf>,
    samples: Option<PathBuf>,
    position: f64,
    bars: Option<usize>,
}

/// Amplitude analysis file: `samples: [0.1, 0.4, ...]`
#[derive(Deserialize)]
struct SampleFile {
    samples: Vec<f32>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut playlist = None;
    let mut config = None;
    let mut samples = None;
    let mut position = 0.0;
    let mut bars = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?));
            }
            "--samples" => {
                samples = Some(PathBuf::from(args.next().context("--samples needs a path")?));
            }
            "--position" => {
                let value = args.next().context("--position needs seconds")?;
                position = value
                    .parse()
                    .with_context(|| format!("Invalid --position {:?}", value))?;
            }
            "--bars" => {
                let value = args.next().context("--bars needs a count")?;
                bars = Some(value.parse().with_context(|| format!("Invalid --bars {:?}", value))?);
            }
            flag if flag.starts_with("--") => bail!("Unknown option {}", flag),
            path => playlist = Some(PathBuf::from(path)),
        }
    }

    Ok(Args {
        playlist: playlist.context("Usage: trim-inspect <playlist.yaml> [options]")?,
        config,
        samples,
        position,
        bars,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| default_config_path("engine.yaml"));
    let config: EngineConfig = load_config(&config_path);

    let definition = load_definition(&args.playlist)?;
    let items = definition.build()?;

    println!("Playlist: {} ({} items)", definition.title, items.len());
    let mut problems = 0;
    for (idx, item) in items.iter().enumerate() {
        problems += report_item(idx, item);
    }

    dry_run(items.clone(), &config);

    if let Some(path) = &args.samples {
        let duration = items.first().map(|item| item.duration).unwrap_or(0.0);
        draw_waveform(path, args.bars, played_ratio(args.position, duration))?;
    }

    if problems > 0 {
        bail!("{} trim window problem(s) found", problems);
    }
    Ok(())
}

/// Print one item; returns the number of violations
fn report_item(idx: usize, item: &PlayableItem) -> usize {
    let controller = PlaybackWindowController::for_item(item);
    let geometry = controller.indicator_geometry();

    println!();
    println!("[{}] {} ({})", idx, item.title, item.source_id);
    println!("    duration  {}", timecode::format(item.duration));
    println!("    window    {}", item.trim_window());
    if geometry.is_visible() {
        println!(
            "    indicator left {:.2}%  width {:.2}%",
            geometry.left_percent, geometry.width_percent
        );
    } else {
        println!("    indicator hidden");
    }
    for violation in controller.violations() {
        println!("    ! {}", violation);
    }
    controller.violations().len()
}

/// Play the list against a simulated player ticking once per second
///
/// Returns the indices of the items played, in order.
fn dry_run(items: Vec<PlayableItem>, config: &EngineConfig) -> Vec<usize> {
    if items.is_empty() {
        return Vec::new();
    }

    let clock = ManualClock::new();
    let mut sequencer = PlaylistSequencer::new(items, &config.playlist, Box::new(clock.clone()));
    let mut commands = Vec::new();
    sequencer.start(&mut commands);

    println!();
    println!("Dry run (advance delay {:?}):", config.playlist.advance_delay());

    let mut played = vec![0];
    let mut position = 0.0;
    for _ in 0..MAX_DRY_RUN_TICKS {
        for command in commands.drain(..) {
            match command {
                PlaybackCommand::SeekTo(to) => position = to,
                PlaybackCommand::Load { .. } => position = 0.0,
                _ => {}
            }
            let at = timecode::format_precise(clock.now().as_secs_f64());
            println!("    {:>10}  {:?}", at, command);
        }

        let duration = sequencer.current_item().map(|item| item.duration).unwrap_or(0.0);
        if sequencer.pending_advance().is_none() {
            sequencer.on_position_tick(position, duration, &mut commands);
            if position >= duration {
                sequencer.on_natural_end();
            }
            position = (position + 1.0).min(duration);
        }

        clock.advance(Duration::from_secs(1));
        let at = timecode::format_precise(clock.now().as_secs_f64());
        match sequencer.poll(&mut commands) {
            Some(AdvanceOutcome::Finished) => {
                println!("    {:>10}  end of playlist", at);
                break;
            }
            Some(AdvanceOutcome::Advanced { index: 0 }) => {
                println!("    {:>10}  wrapped to first item", at);
                played.push(0);
                break;
            }
            Some(AdvanceOutcome::Advanced { index }) => played.push(index),
            None => {}
        }
    }
    sequencer.teardown();
    played
}

fn draw_waveform(path: &Path, bars: Option<usize>, ratio: f64) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read samples: {:?}", path))?;
    let file: SampleFile = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse samples: {:?}", path))?;

    let config = WaveformConfig::default();
    let bar_count = bars.unwrap_or(config.bar_count);
    let rendered = compute_bars_with_epsilon(&file.samples, bar_count, ratio, config.epsilon)?;
    let (levels, progress) = waveform_lines(&rendered);

    println!();
    println!("Waveform ({} samples, {:.0}% played):", file.samples.len(), ratio * 100.0);
    println!("    {}", levels);
    println!("    {}", progress);
    Ok(())
}

/// Glyph line and played-marker line for a set of bars
fn waveform_lines(bars: &[RenderedBar]) -> (String, String) {
    let levels = bars.iter().map(glyph).collect();
    let progress = bars
        .iter()
        .map(|bar| if bar.played { '=' } else { ' ' })
        .collect();
    (levels, progress)
}

fn glyph(bar: &RenderedBar) -> char {
    let level = (bar.height_ratio * (LEVELS.len() - 1) as f64).round() as usize;
    LEVELS[level.min(LEVELS.len() - 1)]
}
