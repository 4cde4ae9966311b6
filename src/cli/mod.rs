//! CLI module: clap argument parsing and conversion into run requests.

pub mod clap_parser;

pub use clap_parser::{Cli, Command, FormatOpt, MatchOpt};
