use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use reqwest::Client;
use token_renewer::config::cli::Args;
use token_renewer::config::settings::LogFormat;
use token_renewer::server;
use token_renewer::sources::executor::renewal_loop::RenewalChain;
use token_renewer::sources::renew::{renewal_url, Renewer};
use token_renewer::tls::bootstrap;
use token_renewer::tls::trust_store::TrustMode;
use token_renewer::utils::config_loader;
use token_renewer::utils::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // no-op when logging is already set up
            logging::init_logging("error", &LogFormat::Compact);
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // -------------------------------
    // 1. Load config: flags, env, optional YAML
    // -------------------------------

    let settings = config_loader::run(&args)?;
    logging::run(&settings);

    // -------------------------------
    // 2. Locate root CAs, bootstrapping ~/.certificates when none are given
    // -------------------------------

    let root_cas = match &settings.root_cas {
        Some(dir) => dir.clone(),
        None => {
            let home = bootstrap::home_from_env()?;
            let client = Client::builder().build()?;
            bootstrap::ensure_root_cas(&home, &settings.ca_urls, &client, settings.verbosity).await?
        }
    };

    // -------------------------------
    // 3. Build trust mode and renewal client
    // -------------------------------

    let trust = TrustMode::load_or_insecure(&root_cas, settings.verbosity)
        .enforce(&root_cas, settings.require_ca)?;
    let renewer = Renewer::new(renewal_url(&settings.url), &trust, settings.verbosity)?;

    // -------------------------------
    // 4. Renew: once, or forever at the configured interval
    // -------------------------------

    let chain = RenewalChain::new(renewer, settings.token.clone(), settings.out.clone());
    info!("Service starting...");
    match settings.interval {
        Some(interval) if settings.metrics.is_enabled => {
            let renewals = async move { chain.run(Some(interval)).await.map_err(anyhow::Error::from) };
            let metrics_endpoint = server::server::start(&settings.metrics);
            tokio::try_join!(renewals, metrics_endpoint)?;
        }
        interval => chain.run(interval).await?,
    }

    Ok(())
}
