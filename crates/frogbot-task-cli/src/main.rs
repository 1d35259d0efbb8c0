mod display;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use frogbot_task_core::environment::build_environment;
use frogbot_task_core::inputs::read_inputs;
use frogbot_task_core::{
    execute_task, load_config, DryRunHost, HostConfig, ProcessHost, TaskError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "frogbot-task",
    version,
    about = "Frogbot task for JFrog Pipelines",
    long_about = "Reads the task inputs, prepares the environment Frogbot expects, downloads Frogbot for this node and runs it.\n\nInputs come from --input flags, the config file, or INPUT_<NAME> environment variables."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with inputs, variables and integrations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Task input override, e.g. --input botAction=scan-pull-request
    #[arg(short, long = "input", value_name = "KEY=VALUE", global = true)]
    inputs: Vec<String>,

    /// Pipeline variable override, e.g. --variable EXECUTION_PATH=/tmp/frogbot
    #[arg(long = "variable", value_name = "KEY=VALUE", global = true)]
    variables: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the environment, download Frogbot and run the requested action
    Run {
        /// Print the commands instead of executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the environment Frogbot would run with (secrets masked)
    Env {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Read and validate the task inputs
    Validate,

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = dispatch(cli).await {
        display::print_error(&error);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "frogbot_task=debug,frogbot_task_core=debug,info"
    } else {
        "frogbot_task=info,frogbot_task_core=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "frogbot-task", &mut std::io::stdout());
        return Ok(());
    }

    let config = build_config(cli.config.as_ref(), &cli.inputs, &cli.variables)?;
    let host = ProcessHost::new(config);

    match cli.command {
        Commands::Run { dry_run: true } => cmd_dry_run(host).await,
        Commands::Run { dry_run: false } => cmd_run(host).await,
        Commands::Env { format } => cmd_env(&host, &format),
        Commands::Validate => cmd_validate(&host),
        Commands::Completions { .. } => Ok(()),
    }
}

fn build_config(
    path: Option<&PathBuf>,
    inputs: &[String],
    variables: &[String],
) -> Result<HostConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    for pair in inputs {
        config.set_input(pair).context("Invalid --input")?;
    }
    for pair in variables {
        config.set_variable(pair).context("Invalid --variable")?;
    }
    tracing::debug!(
        config = ?path,
        inputs = config.inputs.len(),
        variables = config.variables.len(),
        "host configuration ready"
    );
    Ok(config)
}

async fn cmd_run(host: ProcessHost) -> Result<()> {
    let summary = execute_task(&host)
        .await
        .map_err(task_failure)?;
    display::print_summary(&summary);
    Ok(())
}

async fn cmd_dry_run(host: ProcessHost) -> Result<()> {
    let host = DryRunHost::new(host);
    let summary = execute_task(&host)
        .await
        .map_err(task_failure)?;
    display::print_dry_run(&host.commands(), &summary);
    Ok(())
}

fn task_failure(error: TaskError) -> anyhow::Error {
    let stage = error.stage();
    anyhow::Error::new(error).context(format!("Frogbot task failed at {}", stage))
}

fn cmd_env(host: &ProcessHost, format: &str) -> Result<()> {
    let inputs = read_inputs(host)?;
    let env = build_environment(host, &inputs)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&env.redacted())?;
            println!("{}", json);
        }
        _ => display::print_environment(&env),
    }
    Ok(())
}

fn cmd_validate(host: &ProcessHost) -> Result<()> {
    let inputs = read_inputs(host)?;
    display::print_inputs(&inputs);
    Ok(())
}
