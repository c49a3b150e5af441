//! descry CLI - Command line interface for the descry compiler

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use descry_ast::{Interface, InterfaceFile};
use descry_lexer::tokenize;
use descry_parser::{compile_interface, compile_interfaces, CompiledInterface, MethodSyntaxError, SplitStrategy, TargetConfig};

#[derive(Parser)]
#[command(name = "descry")]
#[command(about = "Compiles method descriptors into typed MongoDB operation trees", long_about = None)]
struct Cli {
    /// Enable debug logging for the compiler crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a descriptor splits into words
    Tokens {
        /// Descriptor, e.g. FindByNameEqual
        descriptor: String,
    },
    /// Compile an interface file and output the operations as JSON
    Parse {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Compile interface files and report every failing method
    Check {
        /// Input files or directories (searched for *.json)
        paths: Vec<PathBuf>,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(clap::Args)]
struct TargetArgs {
    /// Target configuration (JSON); missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the query split strategy
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Legacy,
    Nested,
}

impl From<StrategyArg> for SplitStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Legacy => SplitStrategy::Legacy,
            StrategyArg::Nested => SplitStrategy::Nested,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Tokens { descriptor } => cmd_tokens(&descriptor),
        Commands::Parse { file, pretty, target } => cmd_parse(&file, pretty, &target),
        Commands::Check { paths, target } => cmd_check(&paths, &target),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output for descry
/// crates with `--verbose`
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,descry_parser=debug,descry_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn load_config(target: &TargetArgs) -> TargetConfig {
    let mut config = match &target.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| exit_with(format!("Error reading {}: {}", path.display(), e)));
            serde_json::from_str(&text)
                .unwrap_or_else(|e| exit_with(format!("Invalid config {}: {}", path.display(), e)))
        }
        None => TargetConfig::default(),
    };

    if let Some(strategy) = target.strategy {
        config = config.with_split_strategy(strategy.into());
    }
    tracing::debug!(strategy = ?config.split_strategy, "loaded target config");
    config
}

fn read_interfaces(file: &Path) -> Result<InterfaceFile, String> {
    let text = fs::read_to_string(file).map_err(|e| format!("Error reading {}: {}", file.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid interface file {}: {}", file.display(), e))
}

// === Commands ===

fn cmd_tokens(descriptor: &str) {
    for word in tokenize(descriptor) {
        println!("{:<16} {}..{}", word.text, word.span.start, word.span.end);
    }
}

fn cmd_parse(file: &Path, pretty: bool, target: &TargetArgs) {
    let config = load_config(target);
    let input = read_interfaces(file).unwrap_or_else(|e| exit_with(e));

    let compiled = compile_interfaces(&input, &config);

    let mut failed = false;
    for (interface, result) in input.interfaces.iter().zip(&compiled) {
        failed |= report_interface(interface, result);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&compiled)
    } else {
        serde_json::to_string(&compiled)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(format!("Error serializing output: {}", e)),
    }

    if failed {
        std::process::exit(1);
    }
}

fn cmd_check(paths: &[PathBuf], target: &TargetArgs) {
    let config = load_config(target);
    let mut all_ok = true;

    for file in collect_inputs(paths) {
        let input = match read_interfaces(&file) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{}", e);
                all_ok = false;
                continue;
            }
        };

        for interface in &input.interfaces {
            let compiled = compile_interface(interface, &config);
            if report_interface(interface, &compiled) {
                eprintln!(
                    "✗ {} - {}: {} of {} methods failed",
                    file.display(),
                    interface.name,
                    compiled.errors().count(),
                    compiled.results.len()
                );
                all_ok = false;
            } else {
                println!(
                    "✓ {} - {}: {} methods",
                    file.display(),
                    interface.name,
                    compiled.results.len()
                );
            }
        }
    }

    if !all_ok {
        std::process::exit(1);
    }
}

/// Files named directly, plus every `*.json` below named directories
fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        found.sort();
        files.extend(found);
    }
    files
}

// === Diagnostics ===

/// Print a report per failing method; true if any failed
fn report_interface(interface: &Interface, compiled: &CompiledInterface) -> bool {
    let mut failed = false;
    for (method, result) in interface.methods.iter().zip(&compiled.results) {
        if let Err(error) = result {
            report_method_error(&method.descriptor, error);
            failed = true;
        }
    }
    failed
}

fn report_method_error(descriptor: &str, error: &MethodSyntaxError) {
    let id = error.method.clone();
    let range: Range<usize> = error.span.map(Range::from).unwrap_or(0..descriptor.len());

    let report = Report::build(ReportKind::Error, id.clone(), range.start)
        .with_code(error.code())
        .with_message(error.to_string())
        .with_label(
            Label::new((id.clone(), range))
                .with_message(&error.message)
                .with_color(Color::Red),
        )
        .finish();

    if let Err(e) = report.eprint((id, Source::from(descriptor))) {
        eprintln!("{} ({})", error, e);
    }
}
