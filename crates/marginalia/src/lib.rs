//! Marginalia - Command Palette Intent Classifier
//!
//! Turns whatever the reader types into the palette into a single
//! [`Intent`]: add a book, jot a note, save a quote, search, or jump to
//! something already in the library.

pub mod commands;
pub mod config;
pub mod error;
pub mod files;
pub mod intent;
pub mod library;
pub mod parser;
pub mod quote;

pub use config::ParserConfig;
pub use error::{MarginaliaError, Result};
pub use intent::Intent;
pub use library::{Book, Library, Note};
pub use parser::{parse, CommandParser};
pub use quote::{parse_quote, Attribution, Quote};
