use std::path::PathBuf;

use clap::{Parser, Subcommand};
use globe::Mode;
use tools::{RenderOptions, country_rows, load_config, load_session, render_frames, write_frames};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "globe", about = "Inspect world data and render rotating-globe frames")]
struct Cli {
    /// JSON globe config; defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List countries in selection order.
    Countries {
        world: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Render SVG frames of a transition.
    Render {
        world: PathBuf,
        #[arg(long)]
        country: Option<usize>,
        #[arg(long, default_value_t = 30)]
        frames: usize,
        #[arg(long, default_value = "frames")]
        out: PathBuf,
        #[arg(long, default_value = "manual")]
        mode: Mode,
        #[arg(long, default_value_t = 50.0)]
        step_ms: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Countries { world, json } => {
            let session = load_session(&world, config)?;
            let rows = country_rows(&session);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{}\t{}\t{:.3},{:.3}",
                        row.index, row.name, row.centroid[0], row.centroid[1]
                    );
                }
            }
        }
        Command::Render {
            world,
            country,
            frames,
            out,
            mode,
            step_ms,
        } => {
            let mut session = load_session(&world, config)?;
            let options = RenderOptions {
                mode,
                country,
                frames,
                step_ms,
            };
            let rendered = render_frames(&mut session, &options)?;
            let written = write_frames(&rendered, &out, session.config())?;
            tracing::info!(frames = written.len(), out = %out.display(), "frames written");
        }
    }
    Ok(())
}
