mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use paper_split::{
    ImageDimensions, JpegFileCodec, MemoryCodec, PageSize, SplitOptions, SplitSession,
    load_image, plan_segments, split_image, split_image_concurrent,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pfsplit", about = "Split long images into pages", version)]
struct Cli {
    /// More log output (repeat for debug/trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an image into page segments
    Split {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the JPEG segments
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// PDF file with one page per segment
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Split positions in image pixels (disables auto split)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        at: Vec<f32>,

        /// Target page size
        #[arg(long, value_enum)]
        page: Option<PageArg>,

        /// Custom page width in mm (with --page custom)
        #[arg(long)]
        page_width_mm: Option<f32>,

        /// Custom page height in mm (with --page custom)
        #[arg(long)]
        page_height_mm: Option<f32>,

        /// Do not generate splits from the page size
        #[arg(long)]
        no_auto: bool,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Crops allowed to run at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Margin around each PDF page image in mm
        #[arg(long, default_value = "0.0")]
        margin_mm: f32,

        /// JSON options file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the split plan without writing anything
    Plan {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Target page size
        #[arg(long, default_value = "a4", value_enum)]
        page: PageArg,

        /// Custom page width in mm (with --page custom)
        #[arg(long)]
        page_width_mm: Option<f32>,

        /// Custom page height in mm (with --page custom)
        #[arg(long)]
        page_height_mm: Option<f32>,

        /// Split positions in image pixels (disables auto split)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        at: Vec<f32>,

        /// Do not generate splits from the page size
        #[arg(long)]
        no_auto: bool,

        /// Container size as WIDTHxHEIGHT, to show display metrics
        #[arg(long, value_parser = parse_container)]
        container: Option<ImageDimensions>,

        /// Compute display metrics for the zoomed out state
        #[arg(long)]
        zoomed_out: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PageArg {
    A4,
    A5,
    Letter,
    Legal,
    Custom,
    Manual,
}

impl PageArg {
    fn to_page_size(self, width_mm: Option<f32>, height_mm: Option<f32>) -> Result<PageSize> {
        Ok(match self {
            PageArg::A4 => PageSize::A4,
            PageArg::A5 => PageSize::A5,
            PageArg::Letter => PageSize::Letter,
            PageArg::Legal => PageSize::Legal,
            PageArg::Manual => PageSize::Manual,
            PageArg::Custom => match (width_mm, height_mm) {
                (Some(width_mm), Some(height_mm)) => PageSize::Custom {
                    width_mm,
                    height_mm,
                },
                _ => bail!("--page custom needs --page-width-mm and --page-height-mm"),
            },
        })
    }
}

fn parse_container(value: &str) -> std::result::Result<ImageDimensions, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let width: f32 = width.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: f32 = height.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(ImageDimensions::new(width, height))
}

/// Explicit positions win, otherwise auto split when enabled
fn resolve_positions(session: &mut SplitSession, at: Vec<f32>, auto_split: bool) -> Vec<f32> {
    if !at.is_empty() {
        return at;
    }
    if auto_split {
        session.auto_split();
    }
    session.snapshot()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(logger::level_from_flags(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Split {
            input,
            output_dir,
            pdf,
            at,
            page,
            page_width_mm,
            page_height_mm,
            no_auto,
            quality,
            jobs,
            margin_mm,
            config,
        } => {
            if output_dir.is_none() && pdf.is_none() {
                bail!("Nothing to write, pass --output-dir and/or --pdf");
            }

            let mut options = match &config {
                Some(path) => SplitOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => SplitOptions::default(),
            };
            if let Some(page) = page {
                options.page_size = page.to_page_size(page_width_mm, page_height_mm)?;
            }
            if no_auto {
                options.auto_split = false;
            }
            if let Some(quality) = quality {
                options.jpeg_quality = quality;
            }
            if let Some(jobs) = jobs {
                options.max_in_flight_crops = jobs;
            }
            options.validate()?;

            let (image, actual) = load_image(&input).await?;
            let mut session = SplitSession::from_options(actual, &options);
            let positions = resolve_positions(&mut session, at, options.auto_split);
            let jobs = options.max_in_flight_crops;

            if let Some(dir) = output_dir {
                tokio::fs::create_dir_all(&dir).await?;
                let codec = JpegFileCodec::new(&dir).with_quality(options.jpeg_quality);
                let paths = if jobs > 1 {
                    split_image_concurrent(&codec, &image, actual, &positions, jobs).await?
                } else {
                    split_image(&codec, &image, actual, &positions).await?
                };
                println!("Wrote {} segments → {}", paths.len(), dir.display());
            }

            if let Some(pdf) = pdf {
                let segments = if jobs > 1 {
                    split_image_concurrent(&MemoryCodec, &image, actual, &positions, jobs).await?
                } else {
                    split_image(&MemoryCodec, &image, actual, &positions).await?
                };
                let export = paper_export::ExportOptions {
                    margin_mm,
                    ..paper_export::ExportOptions::with_page_size(options.page_size)
                };
                let pages = segments.len();
                paper_export::generate_pdf(segments, &export, &pdf).await?;
                println!("Generated {} pages → {}", pages, pdf.display());
            }
        }

        Commands::Plan {
            input,
            page,
            page_width_mm,
            page_height_mm,
            at,
            no_auto,
            container,
            zoomed_out,
        } => {
            let page_size = page.to_page_size(page_width_mm, page_height_mm)?;
            let (_, actual) = load_image(&input).await?;
            let mut session = SplitSession::new(actual, page_size);
            let positions = resolve_positions(&mut session, at, !no_auto);

            println!("Image: {}x{} px", actual.width, actual.height);
            println!("Page: {}", page_size.name());

            if let Some(container) = container {
                session.handle_layout(container.width, container.height);
                if zoomed_out {
                    session.set_zoom(false);
                }
                let metrics = session.metrics();
                println!("Display:");
                println!(
                    "  Size: {:.1}x{:.1}",
                    metrics.display.width, metrics.display.height
                );
                println!("  Scale factor: {:.4}", metrics.scale_factor);
                println!(
                    "  Split line: width {:.1}, left {:.1}",
                    metrics.split_line.width, metrics.split_line.left
                );
            }

            let segments = plan_segments(actual, &positions);
            println!("Segments: {}", segments.len());
            for (index, segment) in segments.iter().enumerate() {
                println!(
                    "  {:>3}: y {}..{} ({}x{})",
                    index + 1,
                    segment.origin_y,
                    segment.end_y(),
                    segment.width,
                    segment.height
                );
            }
        }
    }

    Ok(())
}
