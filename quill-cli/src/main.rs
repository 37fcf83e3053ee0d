//! Command-line interface for quill
//! This binary tokenizes or parses quill documents and prints the result in one of the
//! registered output formats.
//!
//! Usage:
//!   quill tokenize `<path>` [--format simple|json]           - Print the token stream
//!   quill parse `<path>` [--format treeviz|tag|json]         - Print the document tree
//!   quill --config `<file>` ...                              - Layer a TOML file over the defaults
//!
//! Diagnostics are written to stderr and never change the exit status.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use quill_config::{ConfigError, Loader, QuillConfig, TokenFormat};
use quill_parser::quill::ast::Document;
use quill_parser::quill::formats::json::tokens_to_json;
use quill_parser::quill::formats::treeviz::to_treeviz_str_with_linum;
use quill_parser::quill::formats::FormatRegistry;
use quill_parser::quill::loader::DocumentLoader;
use quill_parser::quill::token::Token;
use std::process;

fn build_cli() -> Command {
    let path_arg = || Arg::new("path").help("Path to the quill file").index(1);
    let format_arg = |help: &'static str| Arg::new("format").long("format").short('f').help(help);

    Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting quill files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Print the token stream of a document")
                .arg(path_arg())
                .arg(format_arg("Output format: simple or json (default from config)")),
        )
        .subcommand(
            Command::new("parse")
                .about("Print the parsed document tree")
                .arg(path_arg())
                .arg(format_arg("Output format: treeviz, tag or json (default from config)"))
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .help("Prefix treeviz lines with source line numbers")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    env_logger::init();

    let mut cli = build_cli();
    let matches = match cli.try_get_matches_from_mut(std::env::args_os()) {
        Ok(matches) => matches,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let config = load_config(&matches).unwrap_or_else(|err| {
        eprintln!("Configuration error: {}", err);
        process::exit(1);
    });

    let status = match matches.subcommand() {
        Some(("tokenize", sub)) => with_loader(&mut cli, "tokenize", sub, &config, |loader| {
            handle_tokenize_command(loader, sub, &config)
        }),
        Some(("parse", sub)) => with_loader(&mut cli, "parse", sub, &config, |loader| {
            handle_parse_command(loader, sub, &config)
        }),
        _ => {
            let _ = cli.print_help();
            0
        }
    };
    process::exit(status);
}

fn load_config(matches: &ArgMatches) -> Result<QuillConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.build()
}

/// Load the file named by the `path` argument and run `handler` on it.
///
/// A missing path prints the subcommand usage and succeeds; an unreadable file fails.
fn with_loader<F>(
    cli: &mut Command,
    name: &str,
    matches: &ArgMatches,
    config: &QuillConfig,
    handler: F,
) -> i32
where
    F: FnOnce(&DocumentLoader) -> i32,
{
    let Some(path) = matches.get_one::<String>("path") else {
        if let Some(sub) = cli.find_subcommand_mut(name) {
            println!("{}", sub.render_usage());
        }
        return 0;
    };
    match DocumentLoader::from_path(path) {
        Ok(loader) => handler(&loader.with_options(config.parser_options())),
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    }
}

fn handle_tokenize_command(
    loader: &DocumentLoader,
    matches: &ArgMatches,
    config: &QuillConfig,
) -> i32 {
    let format = match matches.get_one::<String>("format").map(String::as_str) {
        None => config.inspect.tokenize.format,
        Some("simple") => TokenFormat::Simple,
        Some("json") => TokenFormat::Json,
        Some(other) => {
            eprintln!("Format '{}' not supported for tokens", other);
            eprintln!("Available formats for tokens: simple, json");
            return 1;
        }
    };

    let tokens = loader.tokenize();
    match format {
        TokenFormat::Simple => {
            print!("{}", simple_tokens(&tokens));
            0
        }
        TokenFormat::Json => match tokens_to_json(&tokens) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(err) => {
                eprintln!("Error formatting tokens: {}", err);
                1
            }
        },
    }
}

/// One token per line, prefixed with its start position.
fn simple_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| format!("{}\t{}\n", token.range.start, token))
        .collect()
}

fn handle_parse_command(
    loader: &DocumentLoader,
    matches: &ArgMatches,
    config: &QuillConfig,
) -> i32 {
    let format = matches
        .get_one::<String>("format")
        .cloned()
        .unwrap_or_else(|| config.inspect.parse.format.clone());
    let show_linum = matches.get_flag("line-numbers") || config.inspect.parse.show_line_numbers;

    let doc = loader.parse();
    report_diagnostics(&doc);

    let registry = FormatRegistry::with_defaults();
    let output = if format == "treeviz" {
        Ok(to_treeviz_str_with_linum(&doc, show_linum))
    } else {
        registry.serialize(&doc, &format)
    };
    match output {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            0
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!(
                "Available formats for documents: {}",
                registry.list_formats().join(", ")
            );
            1
        }
    }
}

fn report_diagnostics(doc: &Document) {
    for diagnostic in &doc.diagnostics {
        eprintln!("{}", diagnostic);
    }
}
