use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "framebake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake a JSON scene into per-frame draw records.
    Bake(BakeArgs),
}

#[derive(Parser, Debug)]
struct BakeArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Bake frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames handed to the worker pool at a time.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Fail frames that end with unmatched save() calls.
    #[arg(long)]
    strict: bool,

    /// Write the baked animation as JSON to stdout.
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Bake(args) => cmd_bake(args),
    }
}

fn cmd_bake(args: BakeArgs) -> anyhow::Result<()> {
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = args
        .in_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("scene path '{}' has no file name", args.in_path.display()))?;

    let storage = framebake::DirStorage::new(root);
    let prepared = framebake::load_prepared_scene(&storage, file_name)
        .with_context(|| format!("load scene '{}'", args.in_path.display()))?;

    let opts = framebake::BakeOptions {
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
        unbalanced_save: if args.strict {
            framebake::UnbalancedSavePolicy::Reject
        } else {
            framebake::UnbalancedSavePolicy::Discard
        },
    };

    let data = framebake::bake(prepared.scene().header(), &prepared, &opts)?;

    eprintln!(
        "baked {} frame(s) at {}x{} @ {} fps, {} bitmap(s)",
        data.frame_count(),
        data.width(),
        data.height(),
        data.frame_rate(),
        data.bitmaps().len()
    );
    for (i, frame) in data.frames().iter().enumerate() {
        let c = frame.op_counts();
        eprintln!(
            "  frame {i}: {} placement(s), {} fill(s), {} stroke(s)",
            c.placements, c.fills, c.strokes
        );
    }

    if args.dump {
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &data).context("write baked JSON")?;
        println!();
    }
    Ok(())
}
