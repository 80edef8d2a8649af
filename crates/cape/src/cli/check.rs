//! Check command implementation

use super::output;
use anyhow::Result;
use cape_diagnostics::Severity;
use cape_rules::RuleEngine;
use colored::Colorize;
use std::path::PathBuf;

/// Configuration for check command
pub struct CheckConfig {
    pub files: Vec<PathBuf>,
    /// Warnings count as failures
    pub strict: bool,
    pub verbose: bool,
}

/// Load each rule set and report static predicate diagnostics
///
/// With no files the bundled DAPT rule set is checked.
pub fn check(config: CheckConfig) -> Result<()> {
    let targets: Vec<Option<PathBuf>> = if config.files.is_empty() {
        vec![None]
    } else {
        config.files.into_iter().map(Some).collect()
    };

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for target in &targets {
        let name = target
            .as_ref()
            .map_or_else(|| "bundled dapt".to_string(), |p| p.display().to_string());
        let engine = match target {
            Some(path) => RuleEngine::from_path(path),
            None => RuleEngine::bundled_dapt(),
        };
        let engine = match engine {
            Ok(engine) => engine,
            Err(e) => {
                println!("{} {}", "✗".red().bold(), name);
                println!("  {}", e.to_diagnostic().render_colored());
                total_errors += 1;
                continue;
            }
        };

        let diagnostics = engine.check_predicates();
        let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        let warnings = diagnostics.len() - errors;
        total_errors += errors;
        total_warnings += warnings;

        if diagnostics.is_empty() {
            println!("{} {}", "✓".green().bold(), name);
        } else {
            let mark = if errors > 0 { "✗".red().bold() } else { "⚠".yellow().bold() };
            println!("{mark} {name}");
            for diagnostic in &diagnostics {
                println!("  {}", diagnostic.render_colored());
            }
        }
        if config.verbose {
            println!(
                "  {} questions, {} output rules",
                engine.questions().len(),
                engine.outputs().len()
            );
        }
    }

    println!();
    if total_errors == 0 && total_warnings == 0 {
        println!("{}", output::format_success(&format!("{} rule set(s) checked", targets.len())));
        return Ok(());
    }
    println!("Found {total_errors} error(s) and {total_warnings} warning(s)");

    if total_errors > 0 || (config.strict && total_warnings > 0) {
        anyhow::bail!("rule set check failed");
    }
    Ok(())
}
