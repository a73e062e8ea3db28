use anyhow::{anyhow, Context, Result};
use colored::*;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::config::ParserConfig;
use crate::intent::Intent;
use crate::library::Library;
use crate::parser::CommandParser;
use crate::quote::{parse_quote, Attribution, Quote};

/// Load the snapshot from an explicit path, or from the usual locations
pub fn load_library(path: Option<&Path>) -> Result<Library> {
  let library = match path {
    Some(path) => Library::load_from_file(path),
    None => Library::load(),
  };
  library.context("Failed to load library snapshot")
}

/// Build a parser from an explicit config path, or from the usual locations
pub fn load_parser(path: Option<&Path>) -> Result<CommandParser> {
  let config = match path {
    Some(path) => ParserConfig::load_from_file(path),
    None => ParserConfig::load(),
  };
  Ok(CommandParser::with_config(config.context("Failed to load parser config")?))
}

/// Classify one piece of text and print the intent
pub fn classify(parser: &CommandParser, library: &Library, text: &str, json: bool) -> Result<()> {
  let intent = parser.parse_library(text, library);
  tracing::debug!(kind = intent.kind(), "classified input");

  if json {
    println!("{}", serde_json::to_string_pretty(&intent)?);
    return Ok(());
  }

  if intent.is_unknown() {
    println!("No recognizable command in: {}", text.trim().yellow());
    return Ok(());
  }

  println!("{} {}", "→".green(), render_intent(&intent));
  if let Intent::CreateQuote(quote) = &intent {
    print_quote_details(quote);
  }
  Ok(())
}

/// One-line colored summary of an intent
pub fn render_intent(intent: &Intent) -> String {
  format!("{} {}", format!("[{}]", intent.kind()).cyan().bold(), intent)
}

/// Extract and print a quote's passage and attribution
pub fn quote(text: &str, json: bool) -> Result<()> {
  let quote = parse_quote(text);

  if json {
    println!("{}", serde_json::to_string_pretty(&quote)?);
  } else {
    println!("{} {}", "Quote:".bold(), quote.content);
    print_quote_details(&quote);
  }
  Ok(())
}

fn print_quote_details(quote: &Quote) {
  let Some(attribution) = &quote.attribution else {
    println!("  {}", "no attribution".dimmed());
    return;
  };

  if let Some(author) = &attribution.author {
    println!("  {} {}", "author:".blue(), author);
  }
  if let Some(book) = &attribution.book {
    println!("  {} {}", "book:".blue(), book.italic());
  }
  if let Some(page) = attribution.page {
    println!("  {} {}", "page:".blue(), page);
  }
  println!("  {} {}", "encoded:".blue(), attribution.encode());
}

/// Print the delimited form of an attribution
pub fn encode_attribution(author: Option<String>, book: Option<String>, page: Option<u32>) -> Result<()> {
  let attribution = Attribution {
    author: author.filter(|a| !a.trim().is_empty()),
    book: book.filter(|b| !b.trim().is_empty()),
    page,
  };

  if attribution.is_empty() {
    return Err(anyhow!("Provide at least one of --author, --book or --page"));
  }

  println!("{}", attribution.encode());
  Ok(())
}

/// Decode a delimited attribution and print its fields
pub fn decode_attribution(encoded: &str, json: bool) -> Result<()> {
  let attribution = Attribution::decode(encoded)
    .ok_or_else(|| anyhow!("No attribution fields found in: {}", encoded))?;

  if json {
    println!("{}", serde_json::to_string_pretty(&attribution)?);
    return Ok(());
  }

  println!("{} {}", "author:".blue(), attribution.author.as_deref().unwrap_or("-"));
  println!("{} {}", "book:".blue(), attribution.book.as_deref().unwrap_or("-"));
  match attribution.page {
    Some(page) => println!("{} {}", "page:".blue(), page),
    None => println!("{} -", "page:".blue()),
  }
  Ok(())
}

/// Classify every line of `input`, writing one compact JSON intent per line.
///
/// Blank lines produce `{"kind":"unknown"}` like any other blank input.
/// Returns the number of lines classified.
pub fn watch<R: BufRead, W: Write>(
  parser: &CommandParser,
  library: &Library,
  input: R,
  mut output: W,
) -> Result<usize> {
  let mut count = 0;

  for line in input.lines() {
    let line = line.context("Failed to read input line")?;
    let intent = parser.parse_library(&line, library);
    serde_json::to_writer(&mut output, &intent)?;
    writeln!(output)?;
    output.flush()?;
    count += 1;
  }

  tracing::debug!(lines = count, "watch finished");
  Ok(count)
}

/// Print the active prefix tables
pub fn list_prefixes(parser: &CommandParser) {
  for (table, prefixes) in parser.config().tables() {
    let quoted: Vec<String> = prefixes.iter().map(|p| format!("{p:?}")).collect();
    println!("{} {}", format!("{table}:").blue().bold(), quoted.join(", "));
  }
}

/// Write the active prefix tables to a file, as a starting point for edits
pub fn write_prefixes(parser: &CommandParser, path: &Path) -> Result<()> {
  parser
    .config()
    .save_to_file(path)
    .with_context(|| format!("Failed to write config to {}", path.display()))?;

  herald::success(&format!("Wrote parser config to {}", path.display()));
  Ok(())
}

/// List the books and notes in a snapshot
pub fn list_library(library: &Library) {
  if library.is_empty() {
    println!("Library is empty");
    return;
  }

  herald::as_banner(|line| println!("{line}"), "Library snapshot", Some(40), Some('-'));
  println!("{} ({})", "Books".bold(), library.books.len());
  for book in &library.books {
    if book.author.is_empty() {
      println!("  {}", book.title.cyan());
    } else {
      println!("  {} {} {}", book.title.cyan(), "by".dimmed(), book.author);
    }
  }

  println!("{} ({})", "Notes".bold(), library.notes.len());
  for note in &library.notes {
    println!("  {}", note.content);
  }
}
