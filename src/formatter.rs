//! Rendering of lint results for the terminal

use colored::*;
use marklint_lib::rule::LintWarning;
use serde::Serialize;

/// Warnings of one linted file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub warnings: Vec<LintWarning>,
}

/// Output formats accepted by `--output` and `output-format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s} (expected text or json)")),
        }
    }
}

/// `path:line:column: [rule] message`, one line per warning
pub fn format_text(path: &str, warnings: &[LintWarning]) -> String {
    let mut output = String::new();
    for warning in warnings {
        let rule = match warning.rule_name.as_deref() {
            Some(rule) if warning.fatal => format!("[{rule}]").red().bold().to_string(),
            Some(rule) => format!("[{rule}]").yellow().to_string(),
            None => "[marker]".red().bold().to_string(),
        };
        output.push_str(&format!(
            "{}:{}:{}: {} {}\n",
            path.blue().underline(),
            warning.line.to_string().cyan(),
            warning.column.to_string().cyan(),
            rule,
            warning.message
        ));
    }
    output
}

/// All reports as a pretty-printed JSON array
pub fn format_json(reports: &[FileReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}

/// Closing line of a text run
pub fn format_summary(total_warnings: usize, files_with_issues: usize, files_checked: usize) -> String {
    let file_word = |n: usize| if n == 1 { "file" } else { "files" };
    if total_warnings == 0 {
        format!(
            "{} No issues found in {} {}",
            "Success:".green().bold(),
            files_checked,
            file_word(files_checked)
        )
    } else {
        format!(
            "\n{} Found {} {} in {} {} ({} {} checked)",
            "Issues:".yellow().bold(),
            total_warnings,
            if total_warnings == 1 { "issue" } else { "issues" },
            files_with_issues,
            file_word(files_with_issues),
            files_checked,
            file_word(files_checked)
        )
    }
}
