use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pfpgen", version, about = "Composite every combination of layered PFP assets")]
struct Cli {
    /// Directory holding one sub-directory of layers per category.
    #[arg(long, global = true, default_value = pfpgen::DEFAULT_BASE)]
    base: PathBuf,

    /// Directory the combinations are written to.
    #[arg(long, global = true, default_value = pfpgen::DEFAULT_OUT)]
    out: PathBuf,

    /// Enable debug logging (one line per written file).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored log output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the main bird, then write every combination (default).
    Generate(GenerateArgs),
    /// Only compose the main bird layers.
    MainBird,
    /// Print every combination as JSON without writing images.
    Plan,
}

#[derive(Parser, Debug, Default)]
struct GenerateArgs {
    /// Reuse the existing composed main bird instead of rebuilding it.
    #[arg(long)]
    skip_main_bird: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")?;

    let layout = pfpgen::Layout::new(cli.base, cli.out);
    match cli.cmd.unwrap_or(Command::Generate(GenerateArgs::default())) {
        Command::Generate(args) => cmd_generate(&layout, args),
        Command::MainBird => cmd_main_bird(&layout),
        Command::Plan => cmd_plan(&layout),
    }
}

fn cmd_generate(layout: &pfpgen::Layout, args: GenerateArgs) -> anyhow::Result<()> {
    if !args.skip_main_bird {
        cmd_main_bird(layout)?;
    }

    let expected = pfpgen::count_combinations(layout).context("count combinations")?;
    tracing::info!(expected, "generating combinations");

    let mut sink = pfpgen::PngDirSink::new(&layout.out);
    let report = pfpgen::generate(layout, &mut sink)
        .with_context(|| format!("generate combinations into '{}'", layout.out.display()))?;

    eprintln!("wrote {} images to {}", report.written, sink.dir().display());
    Ok(())
}

fn cmd_main_bird(layout: &pfpgen::Layout) -> anyhow::Result<()> {
    let path = pfpgen::make_main_bird(layout).with_context(|| {
        format!(
            "compose main bird from '{}'",
            layout.main_bird_dir().display()
        )
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_plan(layout: &pfpgen::Layout) -> anyhow::Result<()> {
    let combos = pfpgen::plan(layout).context("plan combinations")?;
    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &combos).context("write plan JSON")?;
    println!();
    Ok(())
}
