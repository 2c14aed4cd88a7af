//! `certify` — Verifies certificate IDs against a static dataset.
//!
//! **Subcommands:**
//! - `verify <ID>` — One-shot lookup; exits 1 when the ID is not found
//! - `link <ID>` — Prints the share link for an ID
//! - `check` — Loads the dataset and reports duplicate IDs
//! - `session` — Interactive session on stdin with rate limiting and deep links
//!
//! **Usage:**
//! ```
//! certify [--config <path>] [--dataset <path>] [--log-level <level>] <command>
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use certify_core::{
    share_link, Clipboard, Config, Dataset, Presenter, Session, VerificationQuery,
    VerificationResult, Verifier,
};
use certify_render::{
    render_result_card, result_text, write_result_page, FileClipboard, NoClipboard,
    TerminalPresenter,
};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Page URL used when neither `--url`/`--base` nor `base_url` is given.
const DEFAULT_PAGE: &str = "http://localhost/";

/// Verify certificate IDs against a static dataset.
#[derive(Parser)]
#[command(name = "certify", version, about = "Verify certificate IDs against a static dataset")]
struct Cli {
    /// Path to a certify.toml configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the certificate dataset (overrides the config file).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Subcommand)]
enum Command {
    /// Look up one certificate ID.
    Verify {
        /// Certificate ID as printed on the certificate.
        id: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Also write an HTML result page to this path.
        #[arg(long)]
        html: Option<PathBuf>,

        /// Page URL used to build the share link on the HTML page.
        #[arg(long)]
        base: Option<Url>,
    },

    /// Print the share link for a certificate ID.
    Link {
        /// Certificate ID.
        id: String,

        /// Page URL the link points at.
        #[arg(long)]
        base: Option<Url>,
    },

    /// Load the dataset and report problems.
    Check,

    /// Run an interactive session: each input line is a submission.
    ///
    /// `:share` copies the share link of the last verified certificate and
    /// `:quit` ends the session.
    Session {
        /// Page URL, including deep-link parameters such as `?id=...&auto=true`.
        #[arg(long)]
        url: Option<Url>,

        /// File that receives copied share links.
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }
    debug!(?config, "configuration resolved");

    match cli.command {
        Command::Verify {
            id,
            json,
            html,
            base,
        } => verify(&config, &id, json, html, base),
        Command::Link { id, base } => link(&config, &id, base),
        Command::Check => check(&config),
        Command::Session { url, clipboard } => run_session(&config, url, clipboard),
    }
}

/// Resolves the page URL from a flag, then the config file, then the default.
fn page_url(config: &Config, flag: Option<Url>) -> Result<Url> {
    if let Some(url) = flag {
        return Ok(url);
    }
    let raw = config.base_url.as_deref().unwrap_or(DEFAULT_PAGE);
    Url::parse(raw).with_context(|| format!("Invalid base_url: {raw}"))
}

fn verify(
    config: &Config,
    id: &str,
    json: bool,
    html: Option<PathBuf>,
    base: Option<Url>,
) -> Result<()> {
    let dataset = Dataset::load(&config.dataset)?;
    let verifier = Verifier::new(dataset).with_max_id_length(config.max_id_length);
    let result = verifier.verify(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result_text(&result));
    }

    if let Some(out) = html {
        let page = page_url(config, base)?;
        let link = match &result {
            VerificationResult::Verified { record } => {
                Some(share_link(&page, &record.certificate_id))
            }
            VerificationResult::NotFound { .. } => None,
        };
        let card = render_result_card(&result, link.as_deref());
        let title = if result.is_verified() {
            "Certificate verified"
        } else {
            "Certificate not found"
        };
        write_result_page(&out, title, &card)?;
        eprintln!("Result page: {}", out.display());
    }

    if !result.is_verified() {
        process::exit(1);
    }
    Ok(())
}

fn link(config: &Config, id: &str, base: Option<Url>) -> Result<()> {
    let query = VerificationQuery::parse(id)?;
    let page = page_url(config, base)?;
    println!("{}", share_link(&page, query.as_str()));
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let dataset = Dataset::load(&config.dataset)?;
    println!(
        "{}: {} certificate(s)",
        config.dataset.display(),
        dataset.len()
    );

    let duplicates = dataset.duplicate_ids();
    if duplicates.is_empty() {
        println!("No duplicate IDs.");
        return Ok(());
    }
    for id in &duplicates {
        println!("  duplicate: {id}");
    }
    eprintln!("Dataset check FAILED: {} duplicate ID(s).", duplicates.len());
    process::exit(1);
}

fn run_session(config: &Config, url: Option<Url>, clipboard: Option<PathBuf>) -> Result<()> {
    let page = page_url(config, url)?;
    let mut clipboard: Box<dyn Clipboard> = match clipboard {
        Some(path) => Box::new(FileClipboard::new(path)),
        None => Box::new(NoClipboard),
    };

    let mut session = Session::new(config, TerminalPresenter::new(io::stdout()));
    session.start(&page, Instant::now());
    session.dataset_loaded(Dataset::load(&config.dataset), Instant::now());
    drain(&mut session);

    if session.is_failed() {
        bail!("Cannot start a session without a dataset");
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("Cannot read input")?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":share" => {
                session.share(clipboard.as_mut());
            }
            _ => {
                session.input_changed(&line);
                session.submit(Instant::now());
            }
        }
        drain(&mut session);

        if let Some(e) = session.presenter_mut().take_error() {
            return Err(e).context("Cannot write to terminal");
        }
    }

    Ok(())
}

/// Sleeps through every scheduled timer until the queue is empty.
///
/// Input is not read meanwhile, which is what keeps submissions from
/// overlapping a pending result or a cooldown.
fn drain<P: Presenter>(session: &mut Session<P>) {
    while let Some(deadline) = session.next_deadline() {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        session.advance(Instant::now());
    }
}
