use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wavyte-snapshots", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that every reference image and override points at an existing sample.
    Validate(ValidateArgs),
    /// Print the checkpoints and output sizes each sample would be rendered at.
    Plan(PlanArgs),
    /// Compare two PNG files the way a snapshot run would.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Directory holding sample composition JSON files.
    #[arg(long)]
    samples: PathBuf,

    /// Directory holding reference PNGs.
    #[arg(long)]
    references: PathBuf,

    /// Harness configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Directory holding sample composition JSON files.
    #[arg(long)]
    samples: PathBuf,

    /// Harness configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Variant to plan for.
    #[arg(long, value_enum, default_value_t = VariantChoice::Default)]
    variant: VariantChoice,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Rendered PNG.
    #[arg(long)]
    actual: PathBuf,

    /// Reference PNG.
    #[arg(long)]
    expected: PathBuf,

    /// Minimum similarity in (0, 1] required to match.
    #[arg(long, default_value_t = 1.0)]
    precision: f64,

    /// Maximum allowed difference per color channel.
    #[arg(long, default_value_t = 0)]
    tolerance: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Default,
    Alternate,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Compare(args) => cmd_compare(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<wavyte_snapshots::HarnessConfig> {
    match path {
        Some(p) => Ok(wavyte_snapshots::HarnessConfig::from_path(p)?),
        None => Ok(wavyte_snapshots::HarnessConfig::default()),
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let corpus = wavyte_snapshots::FsCorpus::new(&args.samples, &args.references);
    let index = wavyte_snapshots::CorpusIndex::load(&corpus, &corpus)?;

    let report = wavyte_snapshots::CorpusValidator::new(&index, &cfg.overrides)
        .validate(cfg.min_samples, cfg.min_reference_images);

    if args.json {
        let s = serde_json::to_string_pretty(&report).context("serialize integrity report")?;
        println!("{s}");
    } else {
        print!("{report}");
    }

    if !report.is_clean() {
        anyhow::bail!(
            "corpus has {} integrity violation(s)",
            report.violations.len()
        );
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let corpus = wavyte_snapshots::FsCorpus::samples_only(&args.samples);
    let index = wavyte_snapshots::CorpusIndex::load(&corpus, &corpus)?;

    let variant = match args.variant {
        VariantChoice::Default => wavyte_snapshots::RenderVariant::Default,
        VariantChoice::Alternate => wavyte_snapshots::RenderVariant::Alternate,
    };

    let resolver = wavyte_snapshots::ConfigResolver::new(cfg.overrides.clone());
    let sampler = wavyte_snapshots::CheckpointSampler::with_max_dimension(
        &resolver,
        cfg.max_output_dimension,
    )?;

    for id in index.sample_ids() {
        let checkpoints = sampler.checkpoints_for(id.as_str(), variant);
        if checkpoints.is_empty() {
            continue;
        }
        let labels: Vec<&str> = checkpoints.iter().map(|c| c.label()).collect();
        let precision = resolver.resolve(id.as_str()).precision;
        match index.sample(id.as_str()) {
            Some(sample) => {
                let (w, h) = sampler.output_size_for(sample.size).pixel_dims();
                println!(
                    "{id}\t{w}x{h}\tprecision={precision}\t{}",
                    labels.join(",")
                );
            }
            None => println!("{id}\tunparsable\tprecision={precision}\t{}", labels.join(",")),
        }
    }
    Ok(())
}

fn load_png(path: &Path) -> anyhow::Result<wavyte_snapshots::FrameRGBA> {
    let img = image::open(path).with_context(|| format!("open png '{}'", path.display()))?;
    Ok(wavyte_snapshots::FrameRGBA::from_rgba_image(img.to_rgba8()))
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    wavyte_snapshots::SnapshotConfiguration::new(args.precision)?;
    let actual = load_png(&args.actual)?;
    let expected = load_png(&args.expected)?;

    let cmp = wavyte_snapshots::PixelComparator::strict().with_channel_tolerance(args.tolerance);
    let m = wavyte_snapshots::ImageComparator::compare(&cmp, &actual, &expected, args.precision);
    let similarity = m.similarity.unwrap_or(0.0);
    println!("similarity={similarity:.6} precision={}", args.precision);

    if !m.matched {
        anyhow::bail!(
            "'{}' does not match '{}'",
            args.actual.display(),
            args.expected.display()
        );
    }
    Ok(())
}
