//! Command-line interface for pycst.
//! This binary parses Python files and prints the result in one of several
//! inspection formats.
//!
//! Usage:
//!   pycst <path> [--language-level <level>] [--format <format>]
//!
//! Formats: treeviz (default), tokens, source, diagnostics, check

use clap::{Arg, Command};
use pycst_analysis::ResourceChecker;
use pycst_parser::py::formats::{detokenize, to_treeviz};
use pycst_parser::py::lexing;
use pycst_parser::py::parsing::{LanguageLevel, Parser};

fn main() {
    env_logger::init();

    let matches = Command::new("pycst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting Python files as lossless syntax trees")
        .arg_required_else_help(true)
        .arg(Arg::new("path").help("Path to the Python file").index(1).required(true))
        .arg(
            Arg::new("language-level")
                .long("language-level")
                .short('l')
                .help("Grammar generation to parse with (2.4, 2.5, 2.6, 2.7, 3.0, 3.1)")
                .default_value("2.7"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: treeviz, tokens, source, diagnostics, check")
                .default_value("treeviz"),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is required");
    let level_text = matches.get_one::<String>("language-level").unwrap();
    let format = matches.get_one::<String>("format").unwrap();

    let level: LanguageLevel = level_text.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    });

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(2);
    });

    let exit_code = run(&source, level, format);
    std::process::exit(exit_code);
}

fn run(source: &str, level: LanguageLevel, format: &str) -> i32 {
    match format {
        "tokens" => {
            let tokens = lexing::tokenize(source);
            match serde_json::to_string_pretty(&tokens) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing tokens: {}", e);
                    return 2;
                }
            }
            0
        }
        "treeviz" => {
            let result = Parser::new(level).parse(source);
            print!("{}", to_treeviz(&result.root, source));
            0
        }
        "source" => {
            let result = Parser::new(level).parse(source);
            print!("{}", detokenize(&result.root, source));
            0
        }
        "diagnostics" => {
            let result = Parser::new(level).parse(source);
            for diagnostic in &result.diagnostics {
                println!("{}", diagnostic);
            }
            if result.diagnostics.is_empty() {
                0
            } else {
                1
            }
        }
        "check" => {
            let result = Parser::new(level).parse(source);
            let findings = ResourceChecker::new().check(&result.root, source);
            for finding in &findings {
                println!("{}", finding);
            }
            if findings.is_empty() {
                0
            } else {
                1
            }
        }
        other => {
            eprintln!("Error: unknown format '{}'", other);
            eprintln!("Available formats: treeviz, tokens, source, diagnostics, check");
            2
        }
    }
}
