//! Convert command - turn manifests into a Helm values file
//!
//! The report goes to stdout, or to stderr on a dry run so that stdout
//! carries nothing but the rendered values.

use console::{Term, style};
use pico_convert::{
    ConversionResult, ConversionWarning, ConvertOptions, ManifestPaths, WarningCategory,
    WarningSeverity, convert_with_options,
};
use std::io::{self, Write};
use std::path::Path;

use crate::error::CliError;

pub fn run(
    paths: &ManifestPaths,
    output: &Path,
    dry_run: bool,
    verbose: bool,
) -> Result<(), CliError> {
    let term = if dry_run {
        Term::stderr()
    } else {
        Term::stdout()
    };

    tracing::debug!(?paths, output = %output.display(), dry_run, "starting conversion");
    print_header(&term, paths, output, dry_run)?;

    let options = ConvertOptions {
        output: output.to_path_buf(),
        dry_run,
    };
    let result = convert_with_options(paths, options)?;

    print_manifests(&term, &result, verbose)?;
    print_warnings(&term, &result, verbose)?;

    if dry_run {
        let mut stdout = io::stdout().lock();
        stdout.write_all(result.rendered.as_bytes())?;
        stdout.flush()?;
    }

    print_summary(&term, &result)?;

    Ok(())
}

fn print_header(
    term: &Term,
    paths: &ManifestPaths,
    output: &Path,
    dry_run: bool,
) -> io::Result<()> {
    term.write_line("")?;
    term.write_line(&format!(
        "  {} {} {}",
        style("pico").bold().cyan(),
        style("─").dim(),
        style("Kubernetes → Helm values").dim()
    ))?;
    term.write_line("")?;

    for (kind, path) in paths.iter() {
        term.write_line(&format!(
            "  {} {}",
            style(format!("{:<11}", format!("{}:", kind))).dim(),
            style(path.display()).cyan()
        ))?;
    }

    let target = if dry_run {
        style("stdout (dry run)".to_string()).yellow()
    } else {
        style(output.display().to_string()).green()
    };
    term.write_line(&format!("  {} {}", style(format!("{:<11}", "target:")).dim(), target))?;
    term.write_line("")
}

fn print_manifests(term: &Term, result: &ConversionResult, verbose: bool) -> io::Result<()> {
    term.write_line(&format!("  {}", style("Applied Manifests").bold()))?;
    term.write_line(&format!("  {}", style("─────────────────").dim()))?;

    for (kind, path) in &result.manifests {
        let fields: Vec<_> = result
            .applied
            .iter()
            .filter(|field| field.kind == *kind)
            .collect();

        term.write_line(&format!(
            "  {} {} {}",
            style("✓").green().bold(),
            path.display(),
            style(format!(
                "({} field{})",
                fields.len(),
                if fields.len() == 1 { "" } else { "s" }
            ))
            .dim()
        ))?;

        if verbose {
            for field in fields {
                term.write_line(&format!(
                    "      {} {} {}",
                    style(&field.source).dim(),
                    style("→").green(),
                    field.target
                ))?;
            }
        }
    }

    term.write_line("")
}

fn print_warnings(term: &Term, result: &ConversionResult, verbose: bool) -> io::Result<()> {
    if result.warnings.is_empty() {
        return Ok(());
    }

    let significant: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| verbose || w.severity != WarningSeverity::Info)
        .collect();

    if significant.is_empty() {
        term.write_line(&format!(
            "  {} {} {} {}",
            style("ℹ").cyan(),
            result.warnings.len(),
            style("notes").dim(),
            style("(use --verbose to see details)").dim()
        ))?;
        return term.write_line("");
    }

    term.write_line(&format!("  {}", style("Conversion Notes").bold()))?;
    term.write_line(&format!("  {}", style("────────────────").dim()))?;
    term.write_line("")?;

    let sections = [
        (WarningCategory::Document, "Documents", "─ check the input files"),
        (WarningCategory::SkippedEntry, "Skipped", "─ entries left out of the values"),
        (WarningCategory::Limitation, "Not converted", "─ copy by hand if needed"),
    ];

    for (category, title, hint) in sections {
        let warnings: Vec<_> = significant
            .iter()
            .filter(|w| w.category == category)
            .collect();
        if warnings.is_empty() {
            continue;
        }

        term.write_line(&format!(
            "  {} {}",
            style(title).yellow().bold(),
            style(hint).dim()
        ))?;
        for warning in warnings {
            print_warning(term, warning)?;
        }
        term.write_line("")?;
    }

    Ok(())
}

fn print_warning(term: &Term, warning: &ConversionWarning) -> io::Result<()> {
    let icon = match warning.severity {
        WarningSeverity::Info => style(warning.severity.icon()).cyan(),
        WarningSeverity::Warning => style(warning.severity.icon()).yellow(),
    };

    let location = match &warning.field {
        Some(field) => format!("{} ({})", warning.file.display(), field),
        None => warning.file.display().to_string(),
    };

    term.write_line(&format!(
        "    {} {} {}",
        icon,
        style(&warning.kind).bold(),
        style(format!("in {}", location)).dim()
    ))?;
    term.write_line(&format!("      {}", style(&warning.message).dim()))
}

fn print_summary(term: &Term, result: &ConversionResult) -> io::Result<()> {
    let applied = result.applied.len();
    let warning_count = result
        .warnings
        .iter()
        .filter(|w| w.severity == WarningSeverity::Warning)
        .count();

    term.write_line(&format!("  {}", style("Summary").bold()))?;
    term.write_line(&format!("  {}", style("───────").dim()))?;
    term.write_line(&format!(
        "  {} field{} taken from {} manifest{}",
        style(format!("{:>3}", applied)).green().bold(),
        if applied == 1 { "" } else { "s" },
        result.manifests.len(),
        if result.manifests.len() == 1 { "" } else { "s" }
    ))?;

    if warning_count > 0 {
        term.write_line(&format!(
            "  {} warning{} {}",
            style(format!("{:>3}", warning_count)).yellow().bold(),
            if warning_count == 1 { "" } else { "s" },
            style("(review recommended)").dim()
        ))?;
    }

    term.write_line("")?;

    match &result.written {
        Some(path) => term.write_line(&format!(
            "  {} {} {}",
            style("✓").green().bold(),
            style(path.display()).green(),
            style("generated successfully").dim()
        ))?,
        None => term.write_line(&format!(
            "  {} {}",
            style("ℹ").cyan(),
            style("Dry run mode - no files were written").dim()
        ))?,
    }

    term.write_line("")
}
