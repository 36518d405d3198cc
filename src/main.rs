//! Patch rerank entrypoint.

use std::path::PathBuf;

use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use rerank::{Preset, RerankConfig, TierSpec};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Select one patch per instance by tiered test outcomes and majority vote.
///
/// Flags override the matching `RERANK_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = "patch-rerank", version)]
struct Cli {
    /// Folder with `output_{i}_*.jsonl` feeds. Repeat or comma-separate for several.
    #[arg(long = "patch-folder", value_delimiter = ',')]
    patch_folders: Vec<PathBuf>,

    /// Samples expected per instance across all folders.
    #[arg(long)]
    num_samples: Option<usize>,

    /// Vote on raw patch text instead of normalized patches.
    #[arg(long)]
    no_deduplicate: bool,

    /// Output JSON-lines file.
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Outcome vocabulary and default tiers: plain, regression, reproduction,
    /// ground-truth-overall, ground-truth-f2p, ground-truth-p2p.
    #[arg(long)]
    preset: Option<Preset>,

    /// Priority tier as a `+`-joined conjunction of outcome names. Repeat in
    /// priority order; replaces the preset's tiers.
    #[arg(long = "tier")]
    tiers: Vec<TierSpec>,

    /// Log every vote group for this instance.
    #[arg(long)]
    target: Option<String>,

    /// Value written to `model_name_or_path`.
    #[arg(long)]
    model_name: Option<String>,
}

impl Cli {
    fn apply(self, mut config: RerankConfig) -> RerankConfig {
        if !self.patch_folders.is_empty() {
            config.patch_folders = self.patch_folders;
        }
        if let Some(num_samples) = self.num_samples {
            config.num_samples = num_samples;
        }
        if self.no_deduplicate {
            config.deduplicate = false;
        }
        if let Some(output_file) = self.output_file {
            config.output_file = output_file;
        }
        if let Some(preset) = self.preset {
            config = config.with_preset(preset);
        }
        if !self.tiers.is_empty() {
            config = config.with_tiers(self.tiers);
        }
        if self.target.is_some() {
            config.target = self.target;
        }
        if let Some(model_name) = self.model_name {
            config.model_name = model_name;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(RerankConfig::from_env()?);

    let tiers: Vec<String> = config.tiers.iter().map(ToString::to_string).collect();
    tracing::info!(
        folders = config.patch_folders.len(),
        num_samples = config.num_samples,
        deduplicate = config.deduplicate,
        tiers = %tiers.join(", "),
        "Patch rerank starting"
    );

    let summary = rerank::run(&config)?;

    tracing::info!(
        instances = summary.instances,
        all_valid = summary.all_valid,
        empty = summary.empty,
        "Patch rerank complete"
    );
    Ok(())
}
