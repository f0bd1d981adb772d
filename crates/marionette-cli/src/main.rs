use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use marionette_core::MarionetteConfig;
use marionette_rig::{validate_picture, DisplayList, DrawCommand, Picture, PictureDocument};

#[derive(Parser)]
#[command(
    name = "marionette",
    version,
    about = "Marionette: inspect and scrub saved 2D actor pictures"
)]
struct Cli {
    /// Path to a marionette.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Info,

    /// Load a picture and check its structure
    Check {
        /// Path to the picture document (.json)
        file: PathBuf,
    },

    /// Print every drawable's placed transform at a point in time
    Place {
        file: PathBuf,

        /// Time in seconds
        #[arg(long, conflicts_with = "frame")]
        time: Option<f64>,

        /// Frame number
        #[arg(long)]
        frame: Option<u64>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the display list drawn at a point in time
    Render {
        file: PathBuf,

        /// Time in seconds (default: the saved cursor)
        #[arg(long)]
        time: Option<f64>,

        /// Emit JSON instead of one command per line
        #[arg(long)]
        json: bool,
    },

    /// Sample a drawable's rotation channel across the timeline
    Sample {
        file: PathBuf,

        /// Actor name
        #[arg(long)]
        actor: String,

        /// Drawable name within the actor
        #[arg(long)]
        drawable: String,

        /// Seconds between samples (default: one frame)
        #[arg(long)]
        step: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MarionetteConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => MarionetteConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => cmd_info(&config),
        Commands::Check { file } => cmd_check(&file, &config),
        Commands::Place {
            file,
            time,
            frame,
            json,
        } => cmd_place(&file, &config, time, frame, json),
        Commands::Render { file, time, json } => cmd_render(&file, &config, time, json),
        Commands::Sample {
            file,
            actor,
            drawable,
            step,
        } => cmd_sample(&file, &config, &actor, &drawable, step),
    }
}

fn load_picture(file: &Path, config: &MarionetteConfig) -> Result<Picture> {
    let document = PictureDocument::load_from_file(file)
        .with_context(|| format!("failed to read picture: {}", file.display()))?;
    let picture = document
        .into_picture(Picture::with_config(config)?)
        .with_context(|| format!("invalid picture: {}", file.display()))?;
    Ok(picture)
}

fn cmd_info(config: &MarionetteConfig) -> Result<()> {
    println!("Marionette {}", env!("CARGO_PKG_VERSION"));
    println!("   Frame rate:  {} fps", config.timeline.frame_rate);
    println!("   Frames:      {}", config.timeline.num_frames);
    println!("   Angle wrap:  {:?}", config.channel.angle_wrap);
    println!("   Log level:   {}", config.logging.level);
    Ok(())
}

fn cmd_check(file: &Path, config: &MarionetteConfig) -> Result<()> {
    println!("Checking {}", file.display());
    let picture = load_picture(file, config)?;
    println!("   ✓ Load OK ({} actors)", picture.len());

    if let Err(errors) = validate_picture(&picture) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("validation failed:\n  {}", messages.join("\n  "));
    }
    println!("   ✓ Structure OK");

    for (_, actor) in picture.actors() {
        let keyed = actor
            .tree()
            .iter()
            .filter(|(_, node)| node.angle_channel().has_keyframes())
            .count();
        println!(
            "   {}: {} drawables, {} animated",
            actor.name(),
            actor.tree().len(),
            keyed
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct PlacedRow<'a> {
    actor: &'a str,
    drawable: &'a str,
    depth: usize,
    x: f64,
    y: f64,
    rotation: f64,
}

fn cmd_place(
    file: &Path,
    config: &MarionetteConfig,
    time: Option<f64>,
    frame: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut picture = load_picture(file, config)?;
    match (time, frame) {
        (_, Some(frame)) => picture.set_frame(frame)?,
        (Some(time), None) => picture.set_time(time)?,
        (None, None) => picture.update(),
    }

    let mut rows = Vec::new();
    for (_, actor) in picture.actors() {
        let tree = actor.tree();
        for id in tree.depth_first() {
            let Some(node) = tree.get(id) else { continue };
            rows.push(PlacedRow {
                actor: actor.name(),
                drawable: node.name(),
                depth: tree.ancestors(id).count(),
                x: node.placed_position().x,
                y: node.placed_position().y,
                rotation: node.placed_rotation(),
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "t = {} (frame {})",
        picture.timeline().timestamp(),
        picture.timeline().current_frame()
    );
    for row in rows {
        println!(
            "{:<12} {:indent$}{:<16} ({:>9.3}, {:>9.3})  {:>8.4} rad",
            row.actor,
            "",
            row.drawable,
            row.x,
            row.y,
            row.rotation,
            indent = row.depth * 2
        );
    }
    Ok(())
}

fn cmd_render(file: &Path, config: &MarionetteConfig, time: Option<f64>, json: bool) -> Result<()> {
    let mut picture = load_picture(file, config)?;
    if let Some(time) = time {
        picture.set_time(time)?;
    }

    let mut list = DisplayList::new();
    picture.draw(&mut list);
    tracing::debug!(commands = list.len(), "rendered display list");

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }
    for command in &list.commands {
        match command {
            DrawCommand::FillPolygon { points, color } => {
                println!("fill    {} points {color}", points.len());
            }
            DrawCommand::StrokeLine {
                from,
                to,
                width,
                color,
            } => {
                println!(
                    "stroke  ({:.3}, {:.3}) -> ({:.3}, {:.3}) width {width} {color}",
                    from.x, from.y, to.x, to.y
                );
            }
            DrawCommand::DrawImage {
                asset,
                origin,
                rotation,
                size,
            } => {
                println!(
                    "image   {asset} at ({:.3}, {:.3}) rot {rotation:.4} size {}x{}",
                    origin.x, origin.y, size.width, size.height
                );
            }
        }
    }
    Ok(())
}

fn cmd_sample(
    file: &Path,
    config: &MarionetteConfig,
    actor_name: &str,
    drawable_name: &str,
    step: Option<f64>,
) -> Result<()> {
    let picture = load_picture(file, config)?;
    let actor_id = picture
        .find_actor(actor_name)
        .with_context(|| format!("no actor named '{actor_name}'"))?;
    let actor = picture
        .actor(actor_id)
        .with_context(|| format!("no actor named '{actor_name}'"))?;
    let node = actor
        .find(drawable_name)
        .and_then(|id| actor.drawable(id))
        .with_context(|| format!("no drawable named '{drawable_name}' in '{actor_name}'"))?;

    let timeline = picture.timeline();
    let times: Vec<f64> = match step {
        Some(step) => {
            if !(step.is_finite() && step > 0.0) {
                anyhow::bail!("step must be positive, got {step}");
            }
            let samples = (timeline.duration() / step).floor() as u64;
            (0..=samples).map(|i| i as f64 * step).collect()
        }
        None => timeline.frame_times().collect(),
    };

    let channel = node.angle_channel();
    if !channel.has_keyframes() {
        println!("{drawable_name} has no keyframes; rotation stays {}", node.rotation());
        return Ok(());
    }

    for t in times {
        let marker = if channel.keyframe_at(t).is_some() { "*" } else { " " };
        println!("{t:>8.3} {marker} {:>10.5}", channel.evaluate(t));
    }
    Ok(())
}
