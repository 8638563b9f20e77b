//! An application for checking the registration of a NIfTI volume, either
//! to the standard template or to another volume of the same subject.

use anyhow::Context;
use clap::Parser;
use regcost::check::{parse_metric, DEFAULT_VOI_SIZE};
use regcost::progress::BarProgress;
use regcost::{check_against_reference, check_against_template, CheckOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "regcheck", about = "Measure registration quality through image similarity")]
struct Cli {
    /// The moving (registered) volume
    moving: PathBuf,

    /// Directory holding MNI152_T1_1mm.nii.gz and its brain mask
    #[arg(long, conflicts_with = "reference", required_unless_present = "reference")]
    template_dir: Option<PathBuf>,

    /// Reference volume, for co-registration checks
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Cost function: ssd, cc, ncc, mi or nmi
    #[arg(long, default_value = "nmi")]
    metric: String,

    /// Edge length of the local measurement windows
    #[arg(long, default_value_t = DEFAULT_VOI_SIZE)]
    voi_size: usize,

    /// Restrict the template check to the brain mask
    #[arg(long)]
    mask: bool,

    /// Skip the global similarity
    #[arg(long)]
    no_global: bool,

    /// Skip the local similarity
    #[arg(long)]
    no_local: bool,

    /// Histogram bins of the information-based metrics
    #[arg(long, default_value_t = regcost::metric::DEFAULT_BINS)]
    bins: usize,

    /// Scan on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let metric = parse_metric(&cli.metric)?;
    let progress = BarProgress::new();
    let options = CheckOptions::new(metric)
        .with_voi_size(cli.voi_size)
        .with_masking(cli.mask)
        .with_global(!cli.no_global)
        .with_local(!cli.no_local)
        .with_bins(cli.bins)
        .with_parallel(!cli.sequential)
        .with_progress(&progress);

    let comparison = match (&cli.template_dir, &cli.reference) {
        (Some(dir), _) => check_against_template(dir, &cli.moving, &options)
            .with_context(|| format!("checking {} against the template", cli.moving.display()))?,
        (None, Some(reference)) => check_against_reference(reference, &cli.moving, &options)
            .with_context(|| {
                format!(
                    "checking {} against {}",
                    cli.moving.display(),
                    reference.display()
                )
            })?,
        (None, None) => anyhow::bail!("either --template-dir or --reference is required"),
    };

    if comparison.shape_mismatch {
        println!("image shape mismatch!");
    }
    let (global, local) = comparison.into_pair();
    println!("global {}: {:?}", metric, global);
    println!("local {}: {:?}", metric, local);
    Ok(())
}
