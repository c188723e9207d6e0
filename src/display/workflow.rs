//! Account and workflow display formatting

use crate::models::{AccountSummary, Workflows};

pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(7).max(7);
    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>9}\n",
        "Account",
        "Workflows",
        name_width = name_width,
    ));
    output.push_str(&format!("{:-<name_width$}  {:->9}\n", "", "", name_width = name_width));
    for summary in summaries {
        output.push_str(&format!(
            "{:<name_width$}  {:>9}\n",
            summary.name,
            summary.workflow_count,
            name_width = name_width,
        ));
    }
    output
}

pub fn format_workflow_list(account: &str, workflows: &Workflows) -> String {
    if workflows.is_empty() {
        return format!("No workflows for {}.", account);
    }
    let mut output = format!("Workflows of {}:\n", account);
    for (name, services) in workflows {
        output.push_str(&format!("  {} ({} services)\n", name, services.len()));
    }
    output
}

pub fn format_workflow(account: &str, workflow: &str, services: &[String]) -> String {
    let mut output = format!("{} / {}\n", account, workflow);
    for (i, service) in services.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", i + 1, service));
    }
    output
}
