//! CLI binary for pdf2img-client.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConvertOptions` and writes the rendered image.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf2img_client::{ConvertOptions, Pdf2ImgClient, PdfSource, DEFAULT_BASE_URL};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  Check that the service is up:
    pdf2img health

  Render the first page as WebP (service defaults):
    pdf2img convert document.pdf -o page-1.webp

  Render page 3 as a small JPEG:
    pdf2img convert document.pdf -o thumb.jpg --format jpeg --page 3 \
      --density 72 --width 300 --height 300

  Read the PDF from stdin, write the image to stdout:
    cat document.pdf | pdf2img convert - > page.webp

ENVIRONMENT:
  PDF2IMG_BASE_URL   Service root (default: http://localhost:3000)
  RUST_LOG           Overrides -v / -q log filtering
"#;

/// Render PDF pages to images with a pdf2img service.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Render PDF pages to images with a pdf2img service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Service base URL.
    #[arg(long, global = true, env = "PDF2IMG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Whole-request timeout in seconds.
    #[arg(long, global = true, env = "PDF2IMG_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2IMG_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one page of a PDF to an image.
    Convert(ConvertArgs),
    /// Probe the service health endpoint. Exits non-zero when it is down.
    Health,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Local PDF path, or `-` to read from stdin.
    input: String,

    /// Write the image to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output image format.
    #[arg(long, default_value = "webp")]
    format: String,

    /// Page to render (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Rendering density in DPI.
    #[arg(long, default_value_t = 300)]
    density: u32,

    /// Maximum height in pixels.
    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// Maximum width in pixels.
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Background colour.
    #[arg(long, default_value = "white")]
    background: String,

    /// Encoder quality (0–100).
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,
}

impl From<&ConvertArgs> for ConvertOptions {
    fn from(a: &ConvertArgs) -> Self {
        ConvertOptions {
            format: a.format.clone(),
            page: a.page,
            density: a.density,
            height: a.height,
            width: a.width,
            background: a.background.clone(),
            quality: a.quality,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let client = Pdf2ImgClient::builder(&cli.base_url)
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Failed to create pdf2img client")?;

    match cli.command {
        Command::Health => {
            let up = client.check_service_health().await;
            if !cli.quiet {
                println!("{}: {}", client.base_url(), if up { "up" } else { "down" });
            }
            Ok(if up { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Convert(args) => {
            let options = ConvertOptions::from(&args);
            let source = if args.input == "-" {
                PdfSource::reader(tokio::io::stdin())
            } else {
                PdfSource::path(&args.input)
            };

            let image = client
                .convert(source, &options)
                .await
                .with_context(|| format!("Failed to convert '{}'", args.input))?;

            match args.output {
                Some(ref path) => {
                    let n = image
                        .save_to_file(path)
                        .await
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    if !cli.quiet {
                        eprintln!("Wrote {} bytes to {}", n, path.display());
                    }
                }
                None => {
                    let bytes = image.into_bytes().await.context("Failed to download image")?;
                    let mut stdout = tokio::io::stdout();
                    tokio::io::AsyncWriteExt::write_all(&mut stdout, &bytes)
                        .await
                        .context("Failed to write image to stdout")?;
                    tokio::io::AsyncWriteExt::flush(&mut stdout).await?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
