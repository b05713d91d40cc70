use std::path::PathBuf;

use anyhow::Context as _;
use badgeforge::{
    Anchor, AnchoredLayout, BadgeConfig, BadgeGenerator, FsSourceFetcher, ImageSize, LayoutPolicy,
    SourceFetcher, fit_text, read_dimensions,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "badgeforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Badge an image once per label and print the batch outcome as JSON.
    Generate(GenerateArgs),
    /// Print the planned badge geometry (and fitted label) for an image or an image size.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Source image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Badge label; repeat for a batch.
    #[arg(long = "label", required = true)]
    labels: Vec<String>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Badge anchor (overrides the config).
    #[arg(long)]
    anchor: Option<Anchor>,

    /// Process labels in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Deadline for the whole batch, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Read the size from this image's header instead of `--width`/`--height`.
    #[arg(long = "in", conflicts_with_all = ["width", "height"])]
    in_path: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long, required_unless_present = "in_path", requires = "height")]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long, required_unless_present = "in_path", requires = "width")]
    height: Option<u32>,

    /// Label to fit into the planned box.
    #[arg(long)]
    label: Option<String>,

    /// Badge anchor.
    #[arg(long, default_value_t = Anchor::BottomCenter)]
    anchor: Anchor,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => BadgeConfig::from_path(path)?,
        None => BadgeConfig::default(),
    };
    if let Some(dir) = args.out_dir {
        cfg.output_dir = dir;
    }
    if let Some(anchor) = args.anchor {
        cfg.anchor = anchor;
    }
    if args.parallel {
        cfg.batch.parallel = true;
    }
    if args.threads.is_some() {
        cfg.batch.threads = args.threads;
    }
    if args.timeout_ms.is_some() {
        cfg.batch.timeout_ms = args.timeout_ms;
    }

    let generator = BadgeGenerator::from_config(&cfg).context("initialize badge generator")?;

    let fetcher = FsSourceFetcher::new(".");
    let locator = args.in_path.to_string_lossy();
    let bytes = fetcher.fetch(&locator)?;

    let outcome = generator.generate_badge_batch(&bytes, &args.labels, None);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let failed = outcome.failure_count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} labels failed", outcome.len());
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let size = match (&args.in_path, args.width, args.height) {
        (Some(path), _, _) => {
            let bytes = FsSourceFetcher::new(".").fetch(&path.to_string_lossy())?;
            read_dimensions(&bytes).with_context(|| format!("read size of '{}'", path.display()))?
        }
        (None, Some(width), Some(height)) => ImageSize::new(width, height),
        _ => anyhow::bail!("either --in or both --width and --height are required"),
    };
    let geometry = AnchoredLayout::new(args.anchor).plan(size);
    let fitted = args
        .label
        .as_deref()
        .map(|l| fit_text(l, geometry.width, geometry.font_size));

    let out = serde_json::json!({
        "anchor": args.anchor,
        "image": size,
        "geometry": geometry,
        "fitted_label": fitted,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
