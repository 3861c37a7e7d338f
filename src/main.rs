use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use pocket_bookmarks::convert_file;

/// Convert a Pocket CSV export into a Netscape bookmarks HTML file.
#[derive(Parser, Debug)]
#[command(name = "pocket-to-bookmarks", version, long_about = None)]
struct Cli {
    /// Pocket export (CSV with title,url,time_added,status headers)
    input: PathBuf,

    /// Bookmarks HTML file to write
    output: PathBuf,

    /// Print the conversion report as JSON instead of the summary line
    #[arg(long)]
    json: bool,

    /// Log format on stderr: text (default) or json
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "pocket_bookmarks=warn",
        1 => "pocket_bookmarks=info",
        _ => "pocket_bookmarks=debug",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn main() -> Result<()> {
    // Missing arguments: clap prints usage to stderr and exits non-zero
    let cli = Cli::parse();
    init_tracing(&cli);

    let report = convert_file(&cli.input, &cli.output).with_context(|| {
        format!(
            "Failed to convert {} → {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", report.summary());
    }

    Ok(())
}
