use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use uzfx::core::CurrencyCode;
use uzfx::core::amount::parse_amount;
use uzfx::core::convert::ConversionRequest;
use uzfx::core::log::init_logging;
use uzfx::core::query::parse_query;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display exchange rates against UZS and USD
    Rates {
        /// Fetch new rates even if the current ones are fresh
        #[arg(short, long)]
        refresh: bool,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, e.g. 100, 1500.50 or 1500,50
        amount: String,
        /// Currency to convert from, e.g. USD
        from: String,
        /// Currency to convert to, e.g. UZS
        to: String,
    },
    /// Convert using a one-line query such as "100 USD to UZS"
    Query { text: Vec<String> },
    /// List supported currencies
    Currencies,
}

fn to_app_command(cmd: Commands) -> Result<uzfx::AppCommand> {
    Ok(match cmd {
        Commands::Rates { refresh } => uzfx::AppCommand::Rates { refresh },
        Commands::Convert { amount, from, to } => {
            uzfx::AppCommand::Convert(ConversionRequest {
                amount: parse_amount(&amount)?,
                from: from.parse::<CurrencyCode>()?,
                to: to.parse::<CurrencyCode>()?,
            })
        }
        Commands::Query { text } => uzfx::AppCommand::Convert(parse_query(&text.join(" "))?),
        Commands::Currencies => uzfx::AppCommand::Currencies,
        Commands::Setup => unreachable!("Setup command should be handled separately"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => uzfx::cli::setup::setup(),
        Some(cmd) => match to_app_command(cmd) {
            Ok(command) => uzfx::run_command(command, cli.config_path.as_deref())
                .await
                .map(|output| println!("{output}")),
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
