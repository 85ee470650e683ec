mod cli;
mod config;
mod error;
mod logging;
mod prompt;

use std::process;

use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use puzzle_archive::{
    BrowserSession, CredentialResolver, Job, Ledger, LoginClient, NytMiniSite, RunReport, http,
    workflow,
};
use tracing::{error, info, warn};

use crate::{
    cli::Args,
    config::Settings,
    error::Result,
    logging::init_logging,
    prompt::{NoPrompt, Prompter},
};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose, args.quiet) {
        eprintln!("{e}");
    }

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

fn prompter(no_prompt: bool) -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    if !no_prompt {
        return Box::new(prompt::TerminalPrompter);
    }
    let _ = no_prompt;
    Box::new(NoPrompt)
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&config_path)?;
    let mut prompter = prompter(args.no_prompt);

    if prompt::complete_credentials(&mut settings.credentials, prompter.as_mut())? {
        Settings::save_credentials(&config_path, &settings.credentials)?;
        info!(path = %config_path.display(), "Credentials saved");
    }

    settings.browser.headless = prompt::resolve_headless(args.headless, prompter.as_mut())?;
    let mode = prompt::resolve_mode(args.mode, prompter.as_mut())?;
    let range = prompt::resolve_range(mode, args.start, args.end, args.months, prompter.as_mut())?;
    drop(prompter);

    if let Some(url) = args.webdriver_url {
        settings.browser.webdriver_url = Some(url);
    }
    if let Some(driver) = args.driver {
        settings.browser.driver = Some(driver);
    }
    if let Some(proxy) = args.proxy {
        settings.browser.proxy = Some(proxy);
    }

    info!(%mode, "Script started");
    let http = http::build_client(settings.browser.proxy.as_deref())?;
    let resolver = CredentialResolver::new(LoginClient::new(http.clone()), settings.retry.clone());
    let cookie = resolver.resolve(&settings.credentials).await?;

    let session = BrowserSession::launch(&settings.browser, &http).await?;
    let job = Job {
        mode,
        range,
        fresh_ledger: args.fresh,
    };
    let ledger = Ledger::new(&args.ledger);
    let outcome = async {
        session
            .install_cookie(&cookie, &settings.site.bootstrap_url())
            .await?;
        let site = NytMiniSite::new(session.client(), settings.site.clone());
        workflow::run(&site, &job, &ledger, &settings.retry).await
    }
    .await;
    session.close().await;

    summarize(&outcome?, &ledger);
    info!("Operation completed");
    Ok(())
}

fn summarize(report: &RunReport, ledger: &Ledger) {
    if let Some(scan) = &report.scan {
        info!(
            pages = scan.pages_scanned,
            found = scan.dates_found,
            added = scan.dates_added,
            ledger = %ledger.path().display(),
            "Scan summary"
        );
        if scan.aborted {
            warn!("The scan stopped early; run it again to cover the remaining pages");
        }
    }
    if let Some(reset) = &report.reset {
        info!(
            reset = reset.reset.len(),
            failed = reset.failed.len(),
            "Reset summary"
        );
        for (date, reason) in &reset.failed {
            warn!(%date, %reason, "Puzzle was not reset");
        }
    }
}
