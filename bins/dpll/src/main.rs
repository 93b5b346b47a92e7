//! dpll - configure and monitor the kernel DPLL subsystem.
//!
//! Global options are handled by clap; the object/verb/keyword grammar
//! after them is positional and order-sensitive (iproute2-style), so it
//! is dispatched over the raw tokens by the command modules.

mod commands;
mod cursor;

use clap::Parser;
use clap::error::ErrorKind;

use dpll_nl::output::{OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(name = "dpll", about = "DPLL device and pin configuration tool")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version and exit.
    #[arg(short = 'V', long = "Version")]
    version: bool,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// OBJECT { COMMAND | help }
    #[arg(trailing_var_arg = true)]
    tokens: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e);
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            commands::usage();
            std::process::exit(1);
        }
    };

    if cli.version {
        println!("dpll utility, dpll-nl-{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let opts = OutputOptions { pretty: cli.pretty };

    if let Err(e) = commands::run(&cli.tokens, format, &opts).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
