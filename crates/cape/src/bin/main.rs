//! CAPE command-line interface

use clap::{Parser, Subcommand};
use cape::cli::{assess, check, evaluate, output, questions};
use std::path::PathBuf;

/// Perioperative cardiac decision-support tool
#[derive(Parser)]
#[command(name = "cape")]
#[command(author, version, about = "Perioperative cardiac decision support", long_about = None)]
struct Cli {
    /// Verbose output (also raises the log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the questions visible under a set of answers
    Questions {
        /// Rule set file (YAML or JSON); the bundled DAPT rule set by default
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Answers file (YAML or JSON map of id to value)
        #[arg(short, long)]
        answers: Option<PathBuf>,
    },

    /// Evaluate a rule set and print the selected outcome
    Evaluate {
        /// Rule set file (YAML or JSON); the bundled DAPT rule set by default
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Answers file (YAML or JSON map of id to value)
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Individual answers (id=value)
        #[arg(short, long = "set")]
        set: Vec<String>,
    },

    /// Check rule sets for malformed or unresolvable predicates
    Check {
        /// Rule set files; the bundled DAPT rule set when none are given
        files: Vec<PathBuf>,

        /// Strict mode (warnings as errors)
        #[arg(short, long)]
        strict: bool,
    },

    /// Run every clinical calculator over a patient record
    Assess {
        /// Patient record file (YAML or JSON)
        record: PathBuf,

        /// Drug list (one name per line, first CSV column)
        #[arg(short, long)]
        drugs: Option<PathBuf>,

        /// DAPT rule set file; the bundled one by default
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// DAPT answers, evaluated when the record calls for DAPT
        #[arg(short, long)]
        answers: Option<PathBuf>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Questions { rules, answers } => {
            let config = questions::QuestionsConfig {
                rules,
                answers,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            questions::questions(config)
        }

        Commands::Evaluate { rules, answers, set } => {
            let config = evaluate::EvaluateConfig {
                rules,
                answers,
                set,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            evaluate::evaluate(config)
        }

        Commands::Check { files, strict } => {
            let config = check::CheckConfig {
                files,
                strict,
                verbose: cli.verbose,
            };
            check::check(config)
        }

        Commands::Assess {
            record,
            drugs,
            rules,
            answers,
        } => {
            let config = assess::AssessConfig {
                record,
                drugs,
                rules,
                answers,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            assess::assess(config)
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
