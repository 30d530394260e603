use clap::{Args, Parser, Subcommand};
use colored::*;
use core::error::Error;

use marklint_lib::config::{self as marklint_config, Config, ConfigError};
use marklint_lib::exit_codes::exit;
use marklint_lib::{Linter, rules};

mod file_processor;
mod formatter;

use formatter::{FileReport, OutputFormat};

#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint Markdown files and print warnings
    Check(CheckArgs),
    /// Create a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(default_value = ".marklint.toml")]
        path: String,
    },
    /// Show information about a rule or list all rules
    Rule {
        /// Rule id to show; lists every rule when omitted
        rule: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to lint (use '-' for stdin)
    #[arg(required = false)]
    paths: Vec<String>,

    /// Disable specific rules (comma-separated)
    #[arg(short, long)]
    disable: Option<String>,

    /// Enable specific rules (comma-separated)
    #[arg(short, long)]
    enable: Option<String>,

    /// Turn every rule off unless configured or enabled
    #[arg(long)]
    reset: bool,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    exclude: Option<String>,

    /// Lint files ignored by .gitignore as well
    #[arg(long)]
    no_respect_gitignore: bool,

    /// Output format: text or json
    #[arg(short, long, value_parser = ["text", "json"])]
    output: Option<String>,

    /// Only print warnings, no summary
    #[arg(short, long)]
    quiet: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(marklint_config::normalize_key)
            .collect()
    })
    .unwrap_or_default()
}

fn tool_error(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "Error".red().bold(), message);
    exit::tool_error();
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> Config {
    match Config::load(cli.config.as_deref(), cli.no_config) {
        Ok(config) => {
            if let Some(source) = &config.source {
                log::debug!("Using configuration from {}", source.display());
            }
            config
        }
        Err(e) => tool_error(e),
    }
}

fn run_check(cli: &Cli, args: &CheckArgs) {
    let mut config = load_config(cli);

    if args.reset {
        config.global.reset = true;
    }
    config.enable_rules(&split_list(args.enable.as_deref()));
    config.disable_rules(&split_list(args.disable.as_deref()));
    if let Some(exclude) = args.exclude.as_deref() {
        config.global.exclude = exclude
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }

    let linter = match Linter::from_config(&config) {
        Ok(linter) => linter,
        Err(e) => tool_error(e),
    };

    let output_format = match args.output.as_deref().or(config.global.output_format.as_deref()) {
        Some(format) => format.parse::<OutputFormat>().unwrap_or_else(|e| tool_error(e)),
        None => OutputFormat::Text,
    };

    let mut reports: Vec<FileReport> = Vec::new();
    let mut read_errors = 0;

    if args.paths.len() == 1 && args.paths[0] == "-" {
        match file_processor::lint_stdin(&linter) {
            Ok(report) => reports.push(report),
            Err(e) => tool_error(format!("Failed to read stdin: {e}")),
        }
    } else {
        let respect_gitignore = config.global.respect_gitignore && !args.no_respect_gitignore;
        let files = match file_processor::find_markdown_files(&args.paths, &config.global.exclude, respect_gitignore) {
            Ok(files) => files,
            Err(e) => tool_error(e),
        };
        if files.is_empty() {
            if !args.quiet {
                println!("No markdown files found to check.");
            }
            exit::success();
        }

        for result in file_processor::lint_files(&files, &linter) {
            match result {
                Ok(report) => reports.push(report),
                Err((path, e)) => {
                    eprintln!("{}: Failed to read {}: {}", "Error".red().bold(), path, e);
                    read_errors += 1;
                }
            }
        }
    }

    let total_warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();
    let files_with_issues = reports.iter().filter(|r| !r.warnings.is_empty()).count();

    match output_format {
        OutputFormat::Json => match formatter::format_json(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => tool_error(e),
        },
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", formatter::format_text(&report.file, &report.warnings));
            }
            if !args.quiet {
                println!(
                    "{}",
                    formatter::format_summary(total_warnings, files_with_issues, reports.len())
                );
            }
        }
    }

    if read_errors > 0 {
        exit::tool_error();
    }
    if total_warnings > 0 {
        exit::violations_found();
    }
    exit::success();
}

fn run_rule(rule: Option<&str>) {
    match rule {
        Some(id) => {
            let id = marklint_config::normalize_key(id);
            match rules::rule_by_id(&id) {
                Some(rule) => {
                    println!("{}", rule.name().bold());
                    println!("{}", rule.description());
                }
                None => tool_error(format!("Rule '{id}' not found.")),
            }
        }
        None => {
            println!("{}", "Available rules:".bold());
            for rule in rules::all_rules() {
                println!("  {} - {}", rule.name().cyan(), rule.description());
            }
        }
    }
}

fn run_init(path: &str) {
    match marklint_config::create_default_config(path) {
        Ok(()) => println!("Created default configuration file: {path}"),
        Err(ConfigError::FileExists { path }) => {
            tool_error(format!("Configuration file {path} already exists."));
        }
        Err(e) => tool_error(format!("Failed to create config file: {e}")),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::unset_override(),
    }

    let verbose = matches!(&cli.command, Commands::Check(args) if args.verbose);
    init_logging(verbose);

    match &cli.command {
        Commands::Check(args) => run_check(&cli, args),
        Commands::Init { path } => run_init(path),
        Commands::Rule { rule } => run_rule(rule.as_deref()),
    }

    Ok(())
}
