//! CLI entry point for `mail2es`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use mail2es::config::{self, Config};
use mail2es::index::walker::TracingSink;
use mail2es::model::document::DateFormat;
use mail2es::parser::source::Source;
use mail2es::DocumentOptions;

/// Filter directive for the `TracingSink` events.
const WALK_TRACE_DIRECTIVE: &str = "mail2es::index::walker=debug";

/// Convert an email message into a JSON document for search indexing.
#[derive(Parser)]
#[command(name = "mail2es", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Message file to convert (omit or `-` for standard input)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Trace the MIME walk on stderr
    #[arg(short, long)]
    debug: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the document on a single line
    #[arg(long)]
    compact: bool,

    /// Rendering of the `date` field
    #[arg(long, value_enum, value_name = "FORMAT")]
    date_format: Option<DateFormat>,

    /// Configuration file (default: $MAIL2ES_CONFIG or the user config dir)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = config::locate_config(cli.config.as_deref());
    let (config, config_error) = config::load_config(config_path.as_deref());

    // Configure logging: stderr + optional log file
    let log_level = match (cli.verbose, cli.debug) {
        (0, false) => config.general.log_level.as_str(),
        (0, true) | (2, _) => "debug",
        (1, _) => "info",
        _ => "trace",
    };
    setup_logging(log_level, cli.debug, &config)?;

    if let Some(e) = config_error {
        let reason = format!("{e:#}");
        tracing::warn!(error = %reason, "Failed to load config, using defaults");
    } else if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "Loaded config");
    }

    match cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => cmd_convert(&cli, &config),
    }
}

/// Set up tracing with stderr output and optional file logging.
///
/// `--debug` always enables the walk trace, whatever the base level.
fn setup_logging(level: &str, debug: bool, config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let mut env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    if debug {
        env_filter = env_filter.add_directive(WALK_TRACE_DIRECTIVE.parse()?);
    }

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if config.general.log_to_file && std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mail2es.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
    Ok(())
}

/// Read one message, convert it and print the JSON document to stdout.
fn cmd_convert(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let source = Source::from_arg(cli.file.as_deref());
    let raw = source
        .read(config.input.max_message_size)
        .with_context(|| format!("Cannot read {source}"))?;

    let options = DocumentOptions {
        date_format: cli.date_format.unwrap_or(config.output.date_format),
    };
    let document = if cli.debug {
        mail2es::convert_with_sink(&raw, &options, TracingSink)
    } else {
        mail2es::convert(&raw, &options)
    }
    .with_context(|| format!("Cannot convert {source}"))?;

    let pretty = config.output.pretty && !cli.compact;
    let json = document.to_json(pretty)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mail2es", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}
