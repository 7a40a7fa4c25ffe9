//! Report formatting and printing utilities.
//!
//! Kept apart from the engine so lexis can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    BulkSummary, CommandResult, CommandSummary, GenerateSummary, HardcodedSummary, InitSummary,
    MatchSummary, ParitySummary,
};
use crate::analysis::{ApplyScope, VcsStatus};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{ContentDiff, ManagementResult};
use crate::rules::{DefectGroups, FixSummary};
use crate::utils::display_path;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of keys to display per defect kind without `-v`.
const MAX_KEYS_DISPLAY: usize = 10;

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Manage(summary) => print_management(summary, verbose, writer),
        CommandSummary::Generate(summary) => print_generate(summary, verbose, writer),
        CommandSummary::Parity(summary) => print_parity(summary, writer),
        CommandSummary::Match(summary) => print_match(summary, verbose, writer),
        CommandSummary::Hardcoded(summary) => print_hardcoded(summary, writer),
        CommandSummary::Bulk(summary) => print_bulk(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

/// Pad `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

fn print_management<W: Write>(result: &ManagementResult, verbose: bool, writer: &mut W) {
    let _ = writeln!(writer, "{}", result);
    print_fixed(&result.fixed, writer);
    print_defects(&result.defects, verbose, writer);
    print_summary(result, writer);
}

fn print_fixed<W: Write>(fixed: &FixSummary, writer: &mut W) {
    if fixed.total() == 0 {
        return;
    }
    let _ = writeln!(
        writer,
        "\n{} {} (unicode: {}, newline: {}, whitespace: {})",
        "Fixed".green().bold(),
        plural(fixed.total(), "value", "values"),
        fixed.unicode,
        fixed.newline,
        fixed.whitespace
    );
}

fn print_defects<W: Write>(defects: &DefectGroups, verbose: bool, writer: &mut W) {
    for (kind, entries) in defects.iter() {
        if entries.is_empty() {
            continue;
        }
        let label = if kind.is_advisory() {
            "warning".bold().yellow()
        } else {
            "error".bold().red()
        };
        let _ = writeln!(
            writer,
            "\n{}: {} ({}) {}",
            label,
            kind.description(),
            plural(entries.len(), "key", "keys"),
            format!("[{}]", kind).dimmed()
        );

        let shown = if verbose {
            entries.len()
        } else {
            entries.len().min(MAX_KEYS_DISPLAY)
        };
        let keys: Vec<String> = entries[..shown].iter().map(|d| d.key.to_string()).collect();
        let width = keys.iter().map(|k| k.width()).max().unwrap_or(0);
        for (key, defect) in keys.iter().zip(&entries[..shown]) {
            let line = format!("  {}  {}", pad(key, width), defect.locales.join(", ").cyan());
            let _ = writeln!(writer, "{}", line.trim_end());
        }
        if shown < entries.len() {
            let _ = writeln!(
                writer,
                "  ... and {} more (use {} to show all)",
                entries.len() - shown,
                "-v".cyan()
            );
        }
    }
}

fn print_summary<W: Write>(result: &ManagementResult, writer: &mut W) {
    let (errors, warnings) = result
        .defects
        .iter()
        .fold((0, 0), |(errors, warnings), (kind, entries)| {
            if kind.is_advisory() {
                (errors, warnings + entries.len())
            } else {
                (errors + entries.len(), warnings)
            }
        });

    if errors + warnings > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} ({}, {})",
            FAILURE_MARK.red(),
            plural(errors + warnings, "defect", "defects"),
            plural(errors, "error", "errors").red(),
            plural(warnings, "warning", "warnings").yellow()
        );
    } else if result.success {
        let _ = writeln!(
            writer,
            "\n{} {}",
            SUCCESS_MARK.green(),
            format!("{} strings checked - no defects found", result.total_strings).green()
        );
    }
}

fn print_generate<W: Write>(summary: &GenerateSummary, verbose: bool, writer: &mut W) {
    let _ = writeln!(writer, "{}", summary.result);
    if summary.result.success {
        print_changes(&summary.changes, verbose, writer);
    }
}

fn print_changes<W: Write>(changes: &ContentDiff, verbose: bool, writer: &mut W) {
    if changes.is_empty() {
        let _ = writeln!(writer, "\n{} {}", SUCCESS_MARK.green(), "Base content unchanged".green());
        return;
    }
    let _ = writeln!(
        writer,
        "\n{} {} added, {} removed, {} changed",
        "Base content changed:".yellow().bold(),
        changes.added.len(),
        changes.removed.len(),
        changes.changed.len()
    );
    if verbose {
        for key in &changes.added {
            let _ = writeln!(writer, "  {} {}", "+".green(), key);
        }
        for key in &changes.removed {
            let _ = writeln!(writer, "  {} {}", "-".red(), key);
        }
        for key in &changes.changed {
            let _ = writeln!(writer, "  {} {}", "~".yellow(), key);
        }
    }
}

fn print_parity<W: Write>(summary: &ParitySummary, writer: &mut W) {
    let report = &summary.report;
    let _ = writeln!(
        writer,
        "Project: {}\nDefault locale: {} ({})",
        summary.project_dir.display(),
        report.default_locale,
        plural(report.default_files.len(), "file", "files")
    );

    for (locale, parity) in &report.locales {
        if parity.is_clean() {
            let _ = writeln!(writer, "  {} {}", SUCCESS_MARK.green(), locale);
            continue;
        }
        let _ = writeln!(
            writer,
            "  {} {}: {} missing, {} extra",
            FAILURE_MARK.red(),
            locale,
            parity.missing.len(),
            parity.extra.len()
        );
        for path in &parity.missing {
            let _ = writeln!(writer, "      {} {}", "missing".red(), path.display());
        }
        for path in &parity.extra {
            let _ = writeln!(writer, "      {} {}", "extra".yellow(), path.display());
        }
    }

    if report.is_clean() {
        let _ = writeln!(
            writer,
            "\n{} {}",
            SUCCESS_MARK.green(),
            "All locales match the default locale's files".green()
        );
    } else {
        let _ = writeln!(
            writer,
            "\n{} {} missing, {} extra",
            FAILURE_MARK.red(),
            plural(report.missing_count(), "file", "files"),
            report.extra_count()
        );
    }
}

fn print_hardcoded<W: Write>(summary: &HardcodedSummary, writer: &mut W) {
    let _ = writeln!(writer, "Project: {}", summary.project_dir.display());

    let mut files = 0;
    let mut current: Option<&str> = None;
    for found in &summary.strings {
        if current != Some(found.file.as_str()) {
            let _ = writeln!(writer, "  {}", found.file.as_str().bold());
            current = Some(found.file.as_str());
            files += 1;
        }
        let _ = writeln!(writer, "    {}: \"{}\"", found.line, found.text);
    }

    if summary.strings.is_empty() {
        let _ = writeln!(
            writer,
            "\n{} {}",
            SUCCESS_MARK.green(),
            "No hardcoded strings found".green()
        );
    } else {
        let _ = writeln!(
            writer,
            "\n{} {} in {}",
            FAILURE_MARK.red(),
            plural(summary.strings.len(), "hardcoded string", "hardcoded strings"),
            plural(files, "file", "files")
        );
    }
}

fn print_match<W: Write>(summary: &MatchSummary, verbose: bool, writer: &mut W) {
    let _ = writeln!(writer, "Recipient: {}", summary.recipient.display());

    let base = summary.recipient.parent().unwrap_or(summary.recipient.as_path());
    for skipped in &summary.skipped {
        let _ = writeln!(
            writer,
            "{}: skipped {}: {}",
            "warning".bold().yellow(),
            display_path(&skipped.source_project, base),
            skipped.skipped_reason.as_deref().unwrap_or("unknown reason")
        );
    }

    for analysis in &summary.analyses {
        let _ = writeln!(
            writer,
            "\n{} {:.0}% ({} filled, {} fillable of {} slots in {})",
            display_path(&analysis.source_project, base).bold(),
            analysis.match_rate() * 100.0,
            analysis.filled_slots,
            analysis.fillable_slots,
            analysis.total_slots,
            plural(analysis.total_keys, "key", "keys")
        );
        let listed: Vec<_> = match summary.scope {
            ApplyScope::MissingOnly => analysis.missing_matches().collect(),
            ApplyScope::All => analysis.matches.iter().collect(),
        };
        let shown = if verbose {
            listed.len()
        } else {
            listed.len().min(MAX_KEYS_DISPLAY)
        };
        for m in &listed[..shown] {
            let _ = writeln!(writer, "  {} = {:?}", m, m.value);
        }
        if shown < listed.len() {
            let _ = writeln!(
                writer,
                "  ... and {} more (use {} to show all)",
                listed.len() - shown,
                "-v".cyan()
            );
        }
    }

    let outcome = &summary.outcome;
    let total = outcome.total();
    let per_locale = outcome
        .per_locale
        .iter()
        .map(|(locale, count)| format!("{} {}", locale, count))
        .collect::<Vec<_>>()
        .join(", ");
    if total == 0 {
        let _ = writeln!(writer, "\nNo translations to apply.");
    } else if outcome.dry_run {
        let _ = writeln!(
            writer,
            "\n{} {} ({}).",
            "Would apply".yellow().bold(),
            plural(total, "translation", "translations"),
            per_locale
        );
        let _ = writeln!(writer, "Run with {} to write them.", "--apply".cyan());
    } else {
        let _ = writeln!(
            writer,
            "\n{} {} ({}).",
            "Applied".green().bold(),
            plural(total, "translation", "translations"),
            per_locale
        );
        if let Some(write) = &outcome.write {
            for failure in &write.failed_locales {
                let _ = writeln!(
                    writer,
                    "{}: failed to write {}: {}",
                    "error".bold().red(),
                    failure.locale,
                    failure.reason
                );
            }
            if let Some(error) = &write.error_message {
                let _ = writeln!(writer, "{}: {}", "error".bold().red(), error);
            }
        }
    }
}

fn print_bulk<W: Write>(summary: &BulkSummary, writer: &mut W) {
    const HEADERS: [&str; 6] = ["PROJECT", "TYPE", "VCS", "STRINGS", "MISSING", "CHANGES"];

    let rows: Vec<[String; 6]> = summary
        .projects
        .iter()
        .map(|project| {
            if project.is_failed() {
                return [
                    project.name.clone(),
                    project.project_type.to_string(),
                    project.vcs.to_string(),
                    "-".to_string(),
                    "failed".to_string(),
                    "-".to_string(),
                ];
            }
            let missing = if project.has_missing() {
                let locales = project.locales_with_missing().join(",");
                format!("{} ({})", project.missing_total(), locales)
            } else {
                "0".to_string()
            };
            let changes = if project.base_changed {
                format!("{}", project.changes.total())
            } else {
                "-".to_string()
            };
            [
                project.name.clone(),
                project.project_type.to_string(),
                project.vcs.to_string(),
                project.total_strings.to_string(),
                missing,
                changes,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let header = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(writer, "{}", header.trim_end().bold());

    for (row, project) in rows.iter().zip(&summary.projects) {
        let cells: Vec<String> = row.iter().zip(widths).map(|(c, w)| pad(c, w)).collect();
        let line = cells.join("  ");
        let line = line.trim_end();
        let _ = match (&project.error, &project.vcs) {
            (Some(_), _) => writeln!(writer, "{}", line.red()),
            (None, VcsStatus::Modified) => writeln!(writer, "{}", line.yellow()),
            _ if project.has_missing() => writeln!(writer, "{}", line.yellow()),
            _ => writeln!(writer, "{}", line),
        };
    }

    for project in &summary.projects {
        if let Some(error) = &project.error {
            let _ = writeln!(writer, "{}: {}: {}", "error".bold().red(), project.name, error);
        }
        if let VcsStatus::Error(message) = &project.vcs {
            let _ = writeln!(
                writer,
                "{}: {}: git status failed: {}",
                "warning".bold().yellow(),
                project.name,
                message
            );
        }
    }

    let with_missing = summary.projects.iter().filter(|p| p.has_missing()).count();
    let failed = summary.projects.iter().filter(|p| p.is_failed()).count();
    if failed > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} of {} could not be analyzed",
            FAILURE_MARK.red(),
            failed,
            plural(summary.projects.len(), "project", "projects")
        );
    }
    if with_missing == 0 && failed == 0 {
        let _ = writeln!(
            writer,
            "\n{} {}",
            SUCCESS_MARK.green(),
            format!(
                "{} fully translated",
                plural(summary.projects.len(), "project", "projects")
            )
            .green()
        );
    } else if with_missing > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} of {} missing translations",
            FAILURE_MARK.red(),
            with_missing,
            plural(summary.projects.len(), "project", "projects")
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{}: {} already exists",
            "error".bold().red(),
            CONFIG_FILE_NAME
        );
    }
}
