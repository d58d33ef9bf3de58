use colored::Colorize;

use plugin_registry_core::{RegistryConfig, RunReport, RunStatus};

/// Console lines for a finished run, in print order
pub fn render(report: &RunReport, config: &RegistryConfig) -> Vec<String> {
    let mut lines = Vec::new();

    if let RunStatus::EmptyRegistry { written } = &report.status {
        lines.push(format!("No plugins found in {}/", config.plugins_dir));
        if let Some(path) = written {
            lines.push(format!("{} {}", "Wrote empty".green(), path.display()));
        }
        return lines;
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(_) => lines.push(format!("{} {}", "✓".green(), outcome.name)),
            Err(e) => lines.push(format!("{} {}: {}", "✗".red(), outcome.name, e.message)),
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Valid: {}, Invalid: {}",
        report.summary.valid, report.summary.invalid
    ));
    lines.push(String::new());

    match &report.status {
        RunStatus::ValidationFailed => lines.push(
            "Validation failed. Fix errors before merging."
                .red()
                .bold()
                .to_string(),
        ),
        RunStatus::Checked => lines.push(
            "Validation passed (--check mode, index not written)"
                .green()
                .to_string(),
        ),
        RunStatus::Written { path } => {
            lines.push(format!("{} {}", "Wrote".green(), path.display()))
        }
        RunStatus::EmptyRegistry { .. } => {}
    }

    lines
}

pub fn print(report: &RunReport, config: &RegistryConfig) {
    for line in render(report, config) {
        println!("{}", line);
    }
}
