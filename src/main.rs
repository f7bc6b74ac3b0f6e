use clap::{CommandFactory, Parser, Subcommand};
use contactsheet::{config, output, sheet, thumbs};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "contactsheet")]
#[command(about = "Contact sheets and thumbnails for folders of images")]
#[command(long_about = "\
Contact sheets and thumbnails for folders of images

Images are collected from the given folders (jpg, jpeg, gif, png; files
first, then subfolders, sorted by name). Folders written by `thumbs`,
such as Trip-300x200/ or Trip-75/, are always ignored.

  sheet    Lay every image out on a grid of labelled cells, as many
           pages as needed, in a single PDF. Portrait images are turned
           sideways to fill the cell.

  thumbs   Write resized copies next to each folder:
             Trip/dawn.png → Trip-1200x800/dawn-1200x800.jpg   (-t)
                           → Trip-75/dawn-75.jpg               (-i)
           Existing outputs are kept, so re-runs only fill gaps.

Settings are read from contactsheet.toml in the working directory, or the
file given with --config. Run 'contactsheet gen-config' for a documented
template.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./contactsheet.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Without a subcommand, usage is printed.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a PDF contact sheet from image folders
    Sheet(SheetArgs),
    /// Generate thumbnails and icons next to image folders
    Thumbs(ThumbsArgs),
    /// Print a stock contactsheet.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct SheetArgs {
    /// Fill each page with the background color
    #[arg(short = 'b', long)]
    background: bool,

    /// Include images in subfolders
    #[arg(short, long)]
    recursive: bool,

    /// Output file (default: sheet.output from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't open the finished sheet in the default viewer
    #[arg(long)]
    no_open: bool,

    /// Also write every placement as JSON to this file
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Folders to collect images from, in order
    folders: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct ThumbsArgs {
    /// Process subfolders too
    #[arg(short, long)]
    recursive: bool,

    /// Generate square icons
    #[arg(short, long)]
    icons: bool,

    /// Generate thumbnails
    #[arg(short, long)]
    thumbnails: bool,

    /// Folders to process
    folders: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Sheet(args) => {
            if args.folders.is_empty() {
                print_subcommand_help("sheet")?;
                return Ok(());
            }
            let mut config = load_config(cli.config.as_deref())?;
            if args.background {
                config.sheet.background = true;
            }
            let output_path = args
                .output
                .unwrap_or_else(|| PathBuf::from(&config.sheet.output));

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_sheet_event(&event);
                }
            });
            let result = sheet::make_contact_sheet(&args.folders, &config, args.recursive, Some(tx));
            printer.join().ok();
            let (mut doc, report) = result?;

            sheet::save_document(&mut doc, &output_path)?;
            if let Some(layout_path) = &args.layout {
                sheet::write_layout_report(&report, layout_path)?;
            }
            output::print_sheet_summary(&report, &output_path);

            if !args.no_open {
                if let Err(e) = opener::open(&output_path) {
                    eprintln!("Could not open {}: {}", output_path.display(), e);
                }
            }
        }
        Command::Thumbs(args) => {
            if args.folders.is_empty() || !(args.icons || args.thumbnails) {
                print_subcommand_help("thumbs")?;
                return Ok(());
            }
            let config = load_config(cli.config.as_deref())?;
            init_thread_pool(&config.processing);
            let options = thumbs::ThumbOptions {
                recursive: args.recursive,
                icons: args.icons,
                thumbnails: args.thumbnails,
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_thumb_event(&event);
                }
            });
            let report = thumbs::generate(&args.folders, &config, &options, Some(tx));
            printer.join().ok();
            output::print_thumb_summary(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--config` must exist; otherwise fall back to the working directory.
fn load_config(explicit: Option<&Path>) -> Result<config::Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn print_subcommand_help(name: &str) -> std::io::Result<()> {
    let mut command = Cli::command();
    match command.find_subcommand_mut(name) {
        Some(sub) => sub.print_help(),
        None => command.print_help(),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores; config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
