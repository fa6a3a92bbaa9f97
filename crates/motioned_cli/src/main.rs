use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "motioned")]
#[command(author, version, about = "Inspect spring curves and motion plans")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a spring and print its easing curve
    Spring {
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        from: f64,
        #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
        to: f64,
        #[arg(long, default_value_t = 100.0)]
        stiffness: f64,
        #[arg(long, default_value_t = 10.0)]
        friction: f64,
        #[arg(long, default_value_t = 1.0)]
        mass: f64,
        /// Initial velocity in units per millisecond
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        velocity: f64,
        /// Samples per second
        #[arg(short, long, default_value_t = motioned_animation::DEFAULT_RESOLUTION)]
        resolution: u32,
        /// Print every sample instead of the CSS easing
        #[arg(long)]
        table: bool,
    },
    /// Animate a configured element to a variant and print what would play
    Plan {
        /// Config file, or a directory containing motioned.toml
        #[arg(default_value = ".")]
        config: PathBuf,
        /// Variant to animate to
        target: String,
        /// Retarget to this variant part-way through
        #[arg(long)]
        then: Option<String>,
        /// Milliseconds to wait before retargeting
        #[arg(long, default_value_t = 100.0)]
        after: f64,
        /// Print plans as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the @property rules for the transform custom properties
    Properties,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Spring {
            from,
            to,
            stiffness,
            friction,
            mass,
            velocity,
            resolution,
            table,
        } => commands::spring::run(
            commands::spring::SpringArgs {
                from,
                to,
                stiffness,
                friction,
                mass,
                velocity,
                resolution,
            },
            table,
        ),
        Commands::Plan {
            config,
            target,
            then,
            after,
            json,
        } => commands::plan::run(&config, &target, then.as_deref(), after, json),
        Commands::Properties => commands::properties::run(),
    }
}
