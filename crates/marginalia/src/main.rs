use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use marginalia::commands;

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(
  about = "Marginalia - Command Palette Intent Classifier\nTurn free text into library, note and quote commands"
)]
#[command(version)]
struct Cli {
  /// Raise log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

/// Where to read the book/note snapshot and parser config from
#[derive(Args)]
struct SnapshotArgs {
  /// Library snapshot file (.yaml, .yml or .json)
  #[arg(short, long)]
  library: Option<PathBuf>,
  /// Parser config file (.yaml, .yml or .json)
  #[arg(short, long)]
  config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Classify text the way the command palette would
  Classify {
    #[command(flatten)]
    snapshot: SnapshotArgs,
    /// Print the intent as JSON
    #[arg(long)]
    json: bool,
    /// Text to classify (words are joined with spaces)
    #[arg(required = true, allow_hyphen_values = true)]
    text: Vec<String>,
  },
  /// Split a quoted passage from its attribution
  Quote {
    /// Print the quote as JSON
    #[arg(long)]
    json: bool,
    /// Quoted text, e.g. '"Call me Ishmael." - Herman Melville'
    #[arg(required = true, allow_hyphen_values = true)]
    text: Vec<String>,
  },
  /// Encode or decode the delimited attribution format
  Attribution {
    #[command(subcommand)]
    action: AttributionAction,
  },
  /// Classify stdin line by line, one JSON intent per line
  Watch {
    #[command(flatten)]
    snapshot: SnapshotArgs,
  },
  /// Show the active command prefixes
  Prefixes {
    /// Parser config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the active prefixes to this file instead of printing them
    #[arg(short, long)]
    write: Option<PathBuf>,
  },
  /// List the books and notes in the snapshot
  Library {
    /// Library snapshot file (.yaml, .yml or .json)
    #[arg(short, long)]
    library: Option<PathBuf>,
  },
}

#[derive(Subcommand)]
enum AttributionAction {
  /// Pack fields into the delimited form
  Encode {
    #[arg(short, long)]
    author: Option<String>,
    #[arg(short, long)]
    book: Option<String>,
    #[arg(short, long)]
    page: Option<u32>,
  },
  /// Unpack the delimited form into fields
  Decode {
    /// Encoded attribution, e.g. 'author=Jane Doe|||page=42'
    encoded: String,
    /// Print the fields as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  herald::init_tracing(cli.verbose);

  match cli.command {
    Commands::Classify { snapshot, json, text } => {
      let parser = commands::load_parser(snapshot.config.as_deref())?;
      let library = commands::load_library(snapshot.library.as_deref())?;
      commands::classify(&parser, &library, &text.join(" "), json)?;
    }
    Commands::Quote { json, text } => {
      commands::quote(&text.join(" "), json)?;
    }
    Commands::Attribution { action } => match action {
      AttributionAction::Encode { author, book, page } => {
        commands::encode_attribution(author, book, page)?;
      }
      AttributionAction::Decode { encoded, json } => {
        commands::decode_attribution(&encoded, json)?;
      }
    },
    Commands::Watch { snapshot } => {
      let parser = commands::load_parser(snapshot.config.as_deref())?;
      let library = commands::load_library(snapshot.library.as_deref())?;
      let count = commands::watch(&parser, &library, io::stdin().lock(), io::stdout().lock())?;
      herald::info(&format!("Classified {count} lines"));
    }
    Commands::Prefixes { config, write } => {
      let parser = commands::load_parser(config.as_deref())?;
      match write {
        Some(path) => commands::write_prefixes(&parser, &path)?,
        None => commands::list_prefixes(&parser),
      }
    }
    Commands::Library { library } => {
      let library = commands::load_library(library.as_deref())?;
      commands::list_library(&library);
    }
  }

  Ok(())
}
