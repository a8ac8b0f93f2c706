use clap::{Parser, Subcommand};
use docsify_helper::config::{self, ConfigError, DeploymentKind, SiteConfig};
use docsify_helper::deploy::{self, SystemRunner};
use docsify_helper::{generate, output};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docsify-helper")]
#[command(about = "Generate a docsify _sidebar.md and deploy the docs site")]
#[command(long_about = "\
Generate a docsify _sidebar.md and deploy the docs site

The docs directory is the data source. Markdown files become links,
folders become bold headings, and numeric prefixes order entries without
showing up in labels.

  docs/
  ├── 01-intro.md          - [Intro](01-intro.md)
  ├── guide.md             - [Guide](guide.md)
  └── api/                 - **Api**
      └── endpoints.md       - [Endpoints](api/endpoints.md)

Run 'docsify-helper config init' to write a documented docsify-helper.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./docsify-helper.toml, optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Docs directory to scan (overrides docs_dir)
    #[arg(short, long, global = true)]
    docs: Option<PathBuf>,

    /// Directory receiving _sidebar.md (overrides output_dir)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Deployment target (overrides deployment.kind)
    #[arg(long, value_enum, global = true)]
    deployment_type: Option<DeploymentKind>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the docs directory and write _sidebar.md
    Generate,
    /// Verify the tools for the configured deployment target
    Check,
    /// Generate, then deploy the output directory
    Deploy {
        /// Deploy the current output without regenerating the sidebar
        #[arg(long)]
        skip_generate: bool,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,
    /// Write a documented stock config file
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", error_chain(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}

/// `outer: inner: root`, skipping causes already quoted by their parent.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Generate => {
            let config = load_effective_config(cli)?;
            let result = generate::generate(&config)?;
            output::print_generate_output(&result, &config.sidebar);
        }
        Command::Check => {
            let config = load_effective_config(cli)?;
            let report = deploy::check_environment(&config, &SystemRunner)?;
            output::print_deploy_report(&report);
        }
        Command::Deploy { skip_generate } => {
            let config = load_effective_config(cli)?;
            if !skip_generate {
                let result = generate::generate(&config)?;
                output::print_generate_output(&result, &config.sidebar);
                println!();
            }
            let report = deploy::deploy(&config, &SystemRunner, &chrono::Local::now())?;
            output::print_deploy_report(&report);
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_effective_config(cli)?;
                println!("{}", output::format_config(&config)?);
            }
            ConfigAction::Init => {
                let path = config_path(cli);
                config::init_config(&path)?;
                println!("Wrote {}", path.display());
            }
        },
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn configure_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILENAME))
}

/// Load the config file and apply command-line overrides.
///
/// An explicit `--config` must exist; the default file is optional.
fn load_effective_config(cli: &Cli) -> Result<SiteConfig, ConfigError> {
    let path = config_path(cli);
    let mut config = match config::load_config(&path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) if cli.config.is_none() => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            SiteConfig::default()
        }
        Err(e) => return Err(e),
    };

    apply_overrides(&mut config, cli.docs.as_deref(), cli.output.as_deref());
    if let Some(kind) = cli.deployment_type {
        config.deployment.kind = kind;
    }
    config.validate()?;
    Ok(config)
}

/// `--docs` alone also moves the output, so the sidebar lands next to the docs.
fn apply_overrides(config: &mut SiteConfig, docs: Option<&Path>, output: Option<&Path>) {
    if let Some(docs) = docs {
        config.docs_dir = docs.to_path_buf();
        if output.is_none() {
            config.output_dir = docs.to_path_buf();
        }
    }
    if let Some(output) = output {
        config.output_dir = output.to_path_buf();
    }
}
