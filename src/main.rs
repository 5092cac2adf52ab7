use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

use scene2fabric::host::FileHost;
use scene2fabric::messaging::{self, ExportFormat, MessageSink, Request, Response};

#[derive(Parser)]
#[command(name = "scene2fabric")]
#[command(version, about = "Export a scene snapshot selection to JSON")]
#[command(long_about = "Export a scene snapshot selection to JSON\n\n\
    JSON output is pretty-printed by default with indentation.\n\n\
    The snapshot is a JSON file of the form {\"selection\": [node, ...]}.\n\
    Rasterizations (for --format canvas or --export-images) are served from\n\
    a directory of pre-rendered <node id>.png files passed via --images;\n\
    nodes without a file there fall back to non-image encodings.\n\n\
    Examples:\n  \
    scene2fabric selection.json --format canvas --images renders/ -o out.json\n  \
    scene2fabric selection.json --include-hidden")]
struct Cli {
    /// Scene snapshot JSON file ({"selection": [node, ...]})
    scene: PathBuf,

    /// Output format: neutral node trees or a fabric.js canvas document
    #[arg(long, value_enum, default_value = "raw")]
    format: FormatArg,

    /// Directory holding pre-rendered rasterizations as <node id>.png
    #[arg(long)]
    images: Option<PathBuf>,

    /// Output JSON file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compact JSON output (default is pretty-printed with indentation)
    #[arg(long)]
    compact: bool,

    /// Embed whole-node rasterizations for frames, components and instances
    #[arg(long)]
    export_images: bool,

    /// Scale for whole-node rasterizations
    #[arg(long, default_value_t = 1.0)]
    image_scale: f64,

    /// Keep children flagged invisible instead of pruning them
    #[arg(long)]
    include_hidden: bool,

    /// Verbose output (per-root progress on stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Raw,
    Canvas,
}

/// Routes pipeline messages to the terminal: progress to stderr, the final
/// payload (or error) kept for main to act on
struct CliSink {
    verbose: bool,
    error: Option<String>,
    result: Option<(ExportFormat, serde_json::Value)>,
}

impl MessageSink for CliSink {
    fn send(&mut self, message: Response) {
        match message {
            Response::Progress {
                current,
                total,
                node_name,
            } => {
                if self.verbose {
                    eprintln!("[{current}/{total}] {node_name}");
                }
            }
            Response::Error { message } => self.error = Some(message),
            Response::Result { format, data } => self.result = Some((format, data)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if cli.verbose {
        eprintln!("Reading scene snapshot: {}", cli.scene.display());
    }

    let host = FileHost::load(&cli.scene, cli.images.clone())
        .with_context(|| format!("Failed to load scene snapshot: {}", cli.scene.display()))?;

    let request = match cli.format {
        FormatArg::Raw => Request::ExportRaw {
            export_images: Some(cli.export_images),
            image_scale: Some(cli.image_scale),
            include_hidden: Some(cli.include_hidden),
        },
        FormatArg::Canvas => Request::ExportCanvas {
            export_images: None,
            image_scale: Some(cli.image_scale),
            include_hidden: Some(cli.include_hidden),
        },
    };

    let mut sink = CliSink {
        verbose: cli.verbose,
        error: None,
        result: None,
    };
    messaging::handle_request(&host, request, &mut sink)
        .await
        .context("Export failed")?;

    if let Some(message) = sink.error {
        bail!(message);
    }
    let Some((_, data)) = sink.result else {
        bail!("Export produced no result");
    };

    // Format output (pretty by default, compact if flag is set)
    let output = if cli.compact {
        serde_json::to_string(&data)?
    } else {
        serde_json::to_string_pretty(&data)?
    };

    match cli.output.as_ref() {
        Some(path) => {
            if cli.verbose {
                eprintln!("Writing output to: {}", path.display());
            }
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            if cli.verbose {
                eprintln!("Done!");
            }
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
