use colored::*;
use frogbot_task_core::{ResolvedEnvironment, TaskInputs, TaskSummary};

/// Print a finished run.
pub fn print_summary(summary: &TaskSummary) {
    println!();
    println!(
        " {}",
        format!(
            "frogbot-task v{} — {} completed",
            env!("CARGO_PKG_VERSION"),
            summary.action
        )
        .bold()
    );
    println!(" {} OS family: {}", "|-".dimmed(), summary.os_family.to_string().cyan());
    println!(
        " {} Exported: {}",
        "|-".dimmed(),
        summary.exported_keys.join(", ")
    );
    println!(
        " {} Duration: {:.1}s",
        "|-".dimmed(),
        summary.duration_secs()
    );
    println!();
}

/// Print the commands a dry run would have executed.
pub fn print_dry_run(commands: &[String], summary: &TaskSummary) {
    println!();
    println!(" {}", "Dry run — nothing was executed".bold().underline());
    for (i, command) in commands.iter().enumerate() {
        println!(" {} {}", format!("{}.", i + 1).dimmed(), command.yellow());
    }
    println!();
    println!(
        " {} {} variables would be exported for a {} node",
        "|-".dimmed(),
        summary.exported_keys.len(),
        summary.os_family.to_string().cyan()
    );
    println!();
}

/// Print the resolved environment with secrets masked.
pub fn print_environment(env: &ResolvedEnvironment) {
    println!();
    println!(" {}", "Frogbot Environment".bold().underline());
    let width = env
        .redacted()
        .iter()
        .map(|entry| entry.key.len())
        .max()
        .unwrap_or(0);
    for entry in env.redacted() {
        let value = if entry.value.is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            entry.value.clone()
        };
        let key = format!("{:width$}", entry.key, width = width);
        println!(" {} {} = {}", "|-".dimmed(), key.cyan(), value);
    }
    println!();
}

/// Print validated task inputs.
pub fn print_inputs(inputs: &TaskInputs) {
    println!();
    println!(" {} Task inputs are valid", "OK".green().bold());
    let rows = [
        ("repository", &inputs.repository),
        ("accessToken", &inputs.access_token_integration),
        ("gitToken", &inputs.git_token_integration),
        ("provider", &inputs.git_provider),
        ("endPoint", &inputs.git_api_endpoint),
        ("botAction", &inputs.bot_action),
        ("platformURL", &inputs.platform_url),
        ("version", &inputs.bot_version),
        ("pullRequestID", &inputs.pull_request_id),
    ];
    for (name, value) in rows {
        let shown = if value.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            value.to_string()
        };
        println!(" {} {:<14} {}", "|-".dimmed(), name, shown);
    }
    println!();
}

/// Print a failure with its cause chain.
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
}
