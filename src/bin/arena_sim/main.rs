// arena-sim - Headless host loop for the arena scene
//
// Decodes the level's assets from disk, drives the level for a number of
// frames the way the browser's animation loop would, and prints a summary.
//
// Usage: cargo run --bin arena-sim -- --assets frontend/assets/images --frames 7200

mod host;

use std::path::PathBuf;

use clap::Parser;

use arena_fx::{Canvas, Config, Level, Result};

use crate::host::Host;

#[derive(Parser, Debug)]
#[command(name = "arena-sim", about = "Run the arena backdrop without a browser")]
struct Cli {
    #[arg(long, default_value_t = 1200)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Frames to simulate
    #[arg(long, default_value_t = 7200)]
    frames: u32,

    /// RNG seed, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the images; `image_path` from the config is ignored
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Stored background preference
    #[arg(long)]
    background: Option<String>,

    #[arg(long, default_value_t = 200.0)]
    player_health: f64,

    #[arg(long, default_value_t = 200.0)]
    bot_health: f64,

    /// Frame at which the host starts reporting pause
    #[arg(long)]
    pause_at: Option<u32>,

    #[arg(short, long)]
    verbose: bool,
}

/// `RUST_LOG` wins unless `--verbose` asks for debug output.
fn logger(verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger(cli.verbose).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_json(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    config.image_path = String::new();

    let rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let canvas = Canvas::new(cli.width, cli.height);
    let level = Level::new(config, canvas, cli.background.as_deref(), rng)?;
    let mut host = Host::new(level, cli.assets.clone());

    println!(
        "Simulating {} frames at {}x{} ({} environment)...",
        cli.frames,
        cli.width,
        cli.height,
        host.level().environment()
    );

    host.load_background();

    let mut first_signal = None;
    for frame in 0..cli.frames {
        let paused = cli.pause_at.is_some_and(|at| frame >= at);
        let signal = host.frame(cli.player_health, cli.bot_health, paused);

        if let Some(signal) = signal {
            if signal.is_terminal() && first_signal.is_none() {
                first_signal = Some((frame, signal));
            }
        }
    }

    let stats = host.stats();
    println!("  spawned:        {}", host.level().particles().spawned());
    println!("  culled:         {}", host.level().particles().culled());
    println!("  live:           {}", host.level().particles().len());
    println!("  draw commands:  {}", stats.commands);
    println!("  sprite draws:   {}", stats.sprites);
    match first_signal {
        Some((frame, signal)) => println!("  round ended:    {signal} at frame {frame}"),
        None => println!("  round ended:    no"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_records() {
        assert_eq!(logger(true).build().filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn verbose_flag_parses() {
        let cli = Cli::parse_from(["arena-sim", "-v", "--frames", "10"]);
        assert!(cli.verbose);
        assert_eq!(cli.frames, 10);
    }
}
