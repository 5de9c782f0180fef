use clap::{Parser, Subcommand};
use collection_viewer::config;
use collection_viewer::controller::{Action, Controller, ControllerError};
use collection_viewer::descriptor;
use collection_viewer::library::LibraryIndex;
use collection_viewer::opener;
use collection_viewer::output;
use collection_viewer::query::Query;
use collection_viewer::types::Facet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Page selection shared by the grid commands.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Grid page to show, starting at 1
    #[arg(long, default_value = "1", value_parser = parse_position)]
    page: usize,
}

/// Composite search form.
#[derive(clap::Args, Clone)]
struct SearchArgs {
    /// Require this artist (repeatable; any of them matches)
    #[arg(long = "artist", value_name = "NAME")]
    artists: Vec<String>,
    /// Reject collections with this artist (repeatable)
    #[arg(long = "not-artist", value_name = "NAME")]
    not_artists: Vec<String>,
    /// Require this character (repeatable; any of them matches)
    #[arg(long = "character", value_name = "NAME")]
    characters: Vec<String>,
    /// Reject collections with this character (repeatable)
    #[arg(long = "not-character", value_name = "NAME")]
    not_characters: Vec<String>,
    /// Require this genre (repeatable; any of them matches)
    #[arg(long = "genre", value_name = "NAME")]
    genres: Vec<String>,
    /// Reject collections with this genre (repeatable)
    #[arg(long = "not-genre", value_name = "NAME")]
    not_genres: Vec<String>,
    /// Require this group (repeatable; any of them matches)
    #[arg(long = "group", value_name = "NAME")]
    groups: Vec<String>,
    /// Reject collections with this group (repeatable)
    #[arg(long = "not-group", value_name = "NAME")]
    not_groups: Vec<String>,
    /// Free-text term, matched per the `[search] text_match` setting
    #[arg(long)]
    text: Option<String>,
    #[command(flatten)]
    page: PageArgs,
}

impl SearchArgs {
    fn query(&self) -> Query {
        let mut query = Query::new();
        let rows = [
            (Facet::Artists, &self.artists, &self.not_artists),
            (Facet::Characters, &self.characters, &self.not_characters),
            (Facet::Genre, &self.genres, &self.not_genres),
            (Facet::Group, &self.groups, &self.not_groups),
        ];
        for (facet, include, exclude) in rows {
            for value in include {
                query = query.include(facet, value.as_str());
            }
            for value in exclude {
                query = query.exclude(facet, value.as_str());
            }
        }
        if let Some(text) = &self.text {
            query = query.text(text.as_str());
        }
        query
    }
}

#[derive(Parser)]
#[command(name = "collection-viewer")]
#[command(about = "Browse a library of image collections by facet")]
#[command(long_about = "\
Browse a library of image collections by facet

Every directory holding a JSON descriptor is a collection; the image files
next to it are its pages. Descriptors may sit at any depth below the root.

Library structure:

  library/
  ├── config.toml                  # Viewer config (optional)
  ├── 2024/
  │   └── harbour/
  │       ├── info.json            # Descriptor (any *.json name)
  │       ├── 001.jpg              # Images: jpg jpeg png gif bmp tiff webp
  │       └── 002.jpg
  └── sketches/
      ├── info.json
      └── cover.png

Descriptor fields:
  title       Shown on cards and in the detail view (defaults to the folder name)
  date        DD.MM.YYYY, required; the listing is newest first
  artists, characters, genre, group, series, type
              Lists of strings; missing or empty becomes \"No Artists\" etc.

Run 'collection-viewer gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Library root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log descriptor reads and scan progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Library(LibraryCommand),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Commands that index the library first.
#[derive(Subcommand)]
enum LibraryCommand {
    /// Show the library statistics (default)
    Stats,
    /// List every collection, newest first
    List(PageArgs),
    /// Show all values of a facet in three columns with counts
    Browse {
        /// artists, characters, genre or group
        facet: Facet,
    },
    /// List the collections carrying one facet value
    Select {
        facet: Facet,
        value: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one collection's metadata and images
    Show {
        /// Folder as listed, absolute or relative to the root
        folder: String,
    },
    /// Show the image viewer position within a collection
    View {
        folder: String,
        /// Image to show, starting at 1
        #[arg(long, default_value = "1", value_parser = parse_position)]
        image: usize,
    },
    /// Filter by included and excluded facet values and free text
    Search(SearchArgs),
    /// Open a collection folder in the file manager
    Open { folder: String },
    /// Print a collection's normalized descriptor as JSON
    Export { folder: String },
    /// List descriptors skipped during discovery
    Issues,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command.unwrap_or(Command::Library(LibraryCommand::Stats)) {
        Command::Library(command) => run(&cli.root, command),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Index the library under `root` and answer one command.
fn run(root: &Path, command: LibraryCommand) -> Result<(), Box<dyn std::error::Error>> {
    let index = LibraryIndex::open(root)?;
    let mut controller = Controller::new(&index);

    match command {
        LibraryCommand::Stats => show(&mut controller, Action::Statistics)?,
        LibraryCommand::List(args) => show_grid(&mut controller, Action::Home, args.page)?,
        LibraryCommand::Browse { facet } => show(&mut controller, Action::Browse(facet))?,
        LibraryCommand::Select { facet, value, page } => {
            show_grid(&mut controller, Action::Select { facet, value }, page.page)?
        }
        LibraryCommand::Show { folder } => {
            show(&mut controller, Action::OpenCollection(folder))?
        }
        LibraryCommand::View { folder, image } => {
            controller.dispatch(Action::OpenCollection(folder))?;
            show(&mut controller, Action::OpenImage(image))?;
        }
        LibraryCommand::Search(args) => {
            show_grid(&mut controller, Action::Search(args.query()), args.page.page)?
        }
        LibraryCommand::Open { folder } => {
            let collection = index
                .find(&folder)
                .ok_or(ControllerError::UnknownCollection(folder))?;
            opener::open_folder(Path::new(&collection.folder))?;
            println!("Opened {}", collection.folder);
        }
        LibraryCommand::Export { folder } => {
            let collection = index
                .find(&folder)
                .ok_or(ControllerError::UnknownCollection(folder))?;
            let value = descriptor::descriptor_value(collection);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        LibraryCommand::Issues => output::print_lines(&output::format_issues(index.report())),
    }

    Ok(())
}

/// Dispatch one action and print the resulting view.
fn show(controller: &mut Controller<'_>, action: Action) -> Result<(), ControllerError> {
    let view = controller.dispatch(action)?;
    output::print_view(&view);
    Ok(())
}

/// Replace the listing, then jump to `page` of it.
fn show_grid(
    controller: &mut Controller<'_>,
    listing: Action,
    page: usize,
) -> Result<(), ControllerError> {
    controller.dispatch(listing)?;
    show(controller, Action::Page(page))
}

/// Parse a 1-based position from the command line into a 0-based index.
fn parse_position(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(e) => Err(e.to_string()),
    }
}

/// Log to stderr so view output on stdout stays clean.
///
/// `RUST_LOG` wins over `--verbose` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
