mod logger;

use anyhow::{Context, Result};
use card_merge::{GridOptions, MergeOptions, MergeReport, MergeStatistics};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::CliLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cardm", about = "Merge CSV records into printable card sheets", version)]
struct Cli {
    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stack one card per row on fixed-size pages
    Grid {
        /// Input CSV file (first row names the fields)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        grid: GridArgs,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Tile a designed card across the repeater area of a layout
    Layout {
        /// Layout JSON saved by the card editor
        #[arg(short, long)]
        layout: PathBuf,

        /// Input CSV file (first row names the fields)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Background image stamped under every page
        #[arg(long)]
        background: Option<PathBuf>,

        /// Seconds to wait for each remote image
        #[arg(long, default_value_t = card_merge::images::DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout: u64,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Write the effective grid options to a JSON file
    SaveConfig {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        grid: GridArgs,
    },
}

/// Grid settings; each flag overrides the config file
#[derive(Args)]
struct GridArgs {
    /// Grid options JSON to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Cards per page (defaults to the paper size table)
    #[arg(long)]
    items_per_page: Option<usize>,

    /// Page margin in mm
    #[arg(long)]
    margin: Option<f32>,

    /// Field used as the card title
    #[arg(long)]
    title_field: Option<String>,

    /// Field holding an image path or URL
    #[arg(long)]
    image_field: Option<String>,

    /// Background image stamped under every page
    #[arg(long)]
    background: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A5,
    A6,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for card_merge::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::A6 => Self::A6,
        }
    }
}

impl From<OrientationArg> for card_merge::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl GridArgs {
    async fn into_options(self) -> Result<GridOptions> {
        let mut options = match &self.config {
            Some(path) => GridOptions::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => GridOptions::default(),
        };

        if let Some(paper) = self.paper {
            options.page.size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.page.orientation = orientation.into();
        }
        if let Some(margin) = self.margin {
            options.page.margin_mm = margin;
        }
        if self.items_per_page.is_some() {
            options.items_per_page = self.items_per_page;
        }
        if self.title_field.is_some() {
            options.title_field = self.title_field;
        }
        if self.image_field.is_some() {
            options.image_field = self.image_field;
        }
        if self.background.is_some() {
            options.merge.background = self.background;
        }
        Ok(options)
    }
}

/// Relative image paths in the data resolve next to the CSV file
fn data_dir(input: &Path) -> Option<PathBuf> {
    input
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn print_statistics(stats: &MergeStatistics) {
    println!("Merge Statistics:");
    println!("  Records: {}", stats.records);
    println!("  Cards per page: {}", stats.items_per_page);
    println!("  Pages: {}", stats.pages);
    println!("  Blank slots on last page: {}", stats.blank_slots);
}

fn print_report(report: &MergeReport, output: &Path) {
    println!(
        "Merged {} cards on {} pages → {}",
        report.cards,
        report.pages,
        output.display()
    );
    if report.images_skipped > 0 {
        println!("  Images skipped: {}", report.images_skipped);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::from_verbosity(cli.verbose).init()?;

    match cli.command {
        Commands::Grid {
            input,
            output,
            grid,
            stats_only,
        } => {
            let mut options = grid.into_options().await?;
            if options.merge.base_dir.is_none() {
                options.merge.base_dir = data_dir(&input);
            }

            let records = card_merge::load_records(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;

            let stats = card_merge::grid_statistics(records.len(), &options)?;
            print_statistics(&stats);
            if stats_only {
                return Ok(());
            }

            let report = card_merge::merge_grid(&records, &options, &output).await?;
            print_report(&report, &output);
        }

        Commands::Layout {
            layout,
            input,
            output,
            background,
            fetch_timeout,
            stats_only,
        } => {
            let layout = card_merge::Layout::load(&layout)
                .await
                .with_context(|| format!("loading layout {}", layout.display()))?;
            let records = card_merge::load_records(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;

            let stats = card_merge::layout_statistics(records.len(), &layout)?;
            print_statistics(&stats);
            if stats_only {
                return Ok(());
            }

            let options = MergeOptions {
                background,
                fetch_timeout_secs: fetch_timeout,
                base_dir: data_dir(&input),
                ..Default::default()
            };
            let report = card_merge::merge_layout(&records, &layout, &options, &output).await?;
            print_report(&report, &output);
        }

        Commands::SaveConfig { output, grid } => {
            let options = grid.into_options().await?;
            options.validate()?;
            options.save(&output).await?;
            println!("Saved grid options → {}", output.display());
        }
    }

    Ok(())
}
