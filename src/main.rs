use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use density_fanout::{convert_batch, ConverterConfig, DensityCatalog, JobStatus, LogObserver};

/// Fan source drawables out to every screen density.
#[derive(Parser, Debug)]
#[command(name = "densify")]
#[command(about = "Rescale images into drawable-<density> folders")]
#[command(long_about = "Rescale source images authored at one density into sibling drawable-<density> folders.
Files named *.9.png are scaled as 9-patch images, keeping their stretch markers intact.")]
struct Args {
    /// Source images
    #[arg(required = true, help = "Images to convert; outputs land next to each file")]
    sources: Vec<PathBuf>,

    /// Density the sources were drawn at
    #[arg(short, long, default_value = "mdpi", help = "Catalog density the sources were authored at")]
    input_density: String,

    /// Custom density catalog
    #[arg(short, long, help = "JSON file with [{\"name\": .., \"scale\": ..}] entries (default: Android set)")]
    catalog: Option<PathBuf>,

    /// Worker count
    #[arg(short, long, help = "Concurrent jobs (default: available CPUs)")]
    workers: Option<usize>,

    /// Debug logging
    #[arg(short, long, help = "Log per-stage timings")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = ConverterConfig::default();
    config.input_density = args.input_density;
    if let Some(path) = &args.catalog {
        config.catalog = DensityCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let report = convert_batch(&config, args.sources, Arc::new(LogObserver)).await?;

    for job in &report.jobs {
        match job.status() {
            JobStatus::Error(reason) => eprintln!("{} {}: {}", job.id, job.source.display(), reason),
            status => println!("{} {}: {}", job.id, job.source.display(), status),
        }
    }
    println!(
        "{} finished, {} failed",
        report.finished().count(),
        report.failed().count()
    );

    if !report.is_success() {
        bail!("{} of {} jobs failed", report.failed().count(), report.jobs.len());
    }
    Ok(())
}
