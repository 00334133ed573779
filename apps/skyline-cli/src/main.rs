mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use skyline_grid::validate_side_length;
use skyline_input::{Command, KeyBindings};
use skyline_kernel::{Building, City, CityGenerator, Outcome, Session};
use skyline_render::{DebugTextRenderer, RenderAdapter, RenderView, StaticBatch};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "skyline-cli", about = "Generate a procedural city and fly through it")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a city and print its height map
    Generate {
        /// Rows/columns of buildings (prompted for when omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        size: Option<i64>,
        /// RNG seed for a reproducible city
        #[arg(long)]
        seed: Option<u64>,
        /// Print the city as JSON instead of a map
        #[arg(long)]
        json: bool,
    },
    /// Fly through a generated city with keystrokes or commands read from stdin
    Explore {
        /// Rows/columns of buildings (prompted for when omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        size: Option<i64>,
        /// RNG seed for a reproducible city
        #[arg(long)]
        seed: Option<u64>,
        /// One line to apply instead of reading stdin, e.g. "pp a <up> q" or "move_forward 3"
        #[arg(long)]
        script: Option<String>,
    },
    /// Build the static render batch and print per-texture draw statistics
    Batch {
        /// Rows/columns of buildings (prompted for when omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        size: Option<i64>,
        /// RNG seed for a reproducible city
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct CityReport<'a> {
    side_length: u32,
    seed: u64,
    extent: f32,
    buildings: &'a [Building],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    match cli.command {
        Commands::Info => {
            println!("skyline-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", skyline_common::crate_info());
            println!("grid: {}", skyline_grid::crate_info());
            println!("kernel: {}", skyline_kernel::crate_info());
            println!("input: {}", skyline_input::crate_info());
            println!("render: {}", skyline_render::crate_info());
        }
        Commands::Generate { size, seed, json } => {
            if seed.is_some() {
                config.city.seed = seed;
            }
            let city = generate(&config, size, &mut input)?;
            if json {
                let buildings: Vec<Building> = city.buildings().collect();
                let report = CityReport {
                    side_length: city.grid().side_length(),
                    seed: city.seed(),
                    extent: city.grid().extent(),
                    buildings: &buildings,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut renderer = DebugTextRenderer::new();
                renderer.prepare(&city)?;
                println!(
                    "seed={} buildings={} tallest={:.2}",
                    city.seed(),
                    city.building_count(),
                    city.grid().max_height()
                );
                if let Some(frame) = renderer.frame(&RenderView::default()) {
                    print!("{frame}");
                }
            }
        }
        Commands::Explore { size, seed, script } => {
            if seed.is_some() {
                config.city.seed = seed;
            }
            let bindings = config.bindings()?;
            let city = generate(&config, size, &mut input)?;
            let mut session = Session::new(city, &config.navigation);
            match script {
                Some(script) => explore(&mut session, &bindings, std::iter::once(Ok(script)))?,
                None => {
                    println!("Type keys or a command and press enter (h for help, q to quit).");
                    explore(&mut session, &bindings, input)?
                }
            };
        }
        Commands::Batch { size, seed } => {
            if seed.is_some() {
                config.city.seed = seed;
            }
            let city = generate(&config, size, &mut input)?;
            let batch = StaticBatch::build(&city)?;
            println!(
                "vertices={} indices={} quads={} bytes={}",
                batch.vertices().len(),
                batch.indices().len(),
                batch.quad_count(),
                batch.vertex_bytes().len() + batch.index_bytes().len()
            );
            for range in batch.ranges() {
                println!(
                    "  {:<20} {:>8} quads  first_index={:<8} {}",
                    range.slot.to_string(),
                    range.quad_count(),
                    range.first_index,
                    config.textures.path(range.slot).display()
                );
            }
            let missing = config.textures.missing(std::path::Path::new("."));
            if !missing.is_empty() {
                tracing::warn!(count = missing.len(), "texture assets not found");
            }
        }
    }

    Ok(())
}

/// Generate a city, prompting for the side length when it was not given.
fn generate<I>(config: &AppConfig, size: Option<i64>, input: &mut I) -> anyhow::Result<City>
where
    I: Iterator<Item = io::Result<String>>,
{
    let side = match size {
        Some(size) => size,
        None => prompt_side_length(input)?,
    };
    let city = CityGenerator::new(config.city.clone())
        .generate(side)
        .context("generating city")?;
    tracing::info!(side, seed = city.seed(), "city ready");
    Ok(city)
}

/// Ask until a valid side length is entered. Fails on end of input.
fn prompt_side_length<I>(input: &mut I) -> anyhow::Result<i64>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        print!("Number of rows/columns of buildings: ");
        io::stdout().flush()?;
        let Some(line) = input.next() else {
            bail!("no grid size given");
        };
        let line = line?;
        match line.trim().parse::<i64>() {
            Ok(n) => match validate_side_length(n) {
                Ok(_) => return Ok(n),
                Err(e) => println!("{e}"),
            },
            Err(_) => println!("please enter a whole number"),
        }
    }
}

/// Apply input line by line, drawing once per line when the view changed.
///
/// A line whose first word names a command (`move_forward 2`, `viewpoint ...`)
/// runs that command; any other line is read as keystrokes. Returns whether
/// an exit was requested before the input ran out.
fn explore<I>(session: &mut Session, bindings: &KeyBindings, lines: I) -> anyhow::Result<bool>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut renderer = DebugTextRenderer::new();
    renderer.prepare(session.city())?;
    let mut first_location = true;

    draw(&mut renderer, session);

    for line in lines {
        let line = line.context("reading input")?;
        let commands: Vec<Command> = match Command::parse(&line) {
            Some(Ok(command)) => vec![command],
            Some(Err(e)) => {
                println!("{e}");
                Vec::new()
            }
            None => bindings.translate(&line).into_iter().map(Command::from).collect(),
        };

        let mut exit = false;
        for command in commands {
            let response = session.apply_command(command);
            match response.outcome {
                Outcome::LocationRequested => {
                    println!("{}", session.describe_location(first_location));
                    first_location = false;
                }
                Outcome::HelpRequested => print_help(bindings),
                Outcome::Moved(verdict) if verdict.is_rejection() => {
                    tracing::info!(?verdict, "move refused");
                }
                Outcome::PlacementRefused => tracing::info!("viewpoint refused"),
                Outcome::Exit => {
                    exit = true;
                    break;
                }
                _ => {}
            }
            if response.redraw_requested() {
                renderer.request_redraw();
            }
        }
        draw(&mut renderer, session);

        for entry in session.drain_journal() {
            tracing::trace!(command = ?entry.command, outcome = ?entry.outcome, "handled");
        }
        if exit {
            return Ok(true);
        }
    }
    Ok(false)
}

fn print_help(bindings: &KeyBindings) {
    print!("{}", bindings.help());
    let names: Vec<&str> = Command::names().collect();
    println!("  commands: {}", names.join(" "));
}

fn draw(renderer: &mut DebugTextRenderer, session: &Session) {
    if let Some(frame) = renderer.frame(&RenderView::from_viewpoint(&session.viewpoint())) {
        print!("{frame}");
    }
}
