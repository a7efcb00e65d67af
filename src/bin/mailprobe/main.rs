mod args;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use mailprobe::{BreachClient, Verifier, system_resolver};
use tracing::warn;

use crate::args::Cli;
use crate::output::JsonOutput;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let resolver =
        system_resolver(Some(cli.dns_timeout())).context("initialise the DNS resolver")?;
    let breach = match cli.breach_config() {
        Some(config) => Some(
            BreachClient::new(config).context("build the breach directory client")?,
        ),
        None => {
            if !cli.skip_breach {
                warn!("no breach directory API key (--api-key / BREACH_API_KEY), lookup skipped");
            }
            None
        }
    };

    let verifier = Verifier::new(resolver, breach, cli.verifier_options());
    let outcome = verifier.verify(&cli.email);

    // sortie
    match cli.format.as_str() {
        "json" => {
            let body = serde_json::to_string_pretty(&JsonOutput::new(&cli.email, &outcome))
                .context("serialize report")?;
            println!("{body}");
        }
        _ => {
            for line in output::human_lines(&cli.email, &outcome, cli.verbose) {
                println!("{line}");
            }
        }
    }

    std::process::exit(output::exit_code(&outcome));
}
