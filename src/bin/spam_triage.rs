use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

use spam_triage::classify;
use spam_triage::config::load_config;
use spam_triage::mail::imap_client::ImapMailbox;
use spam_triage::pipeline::{RunOptions, run_pipeline};
use spam_triage::report::SmtpNotifier;
use spam_triage::store::jsonl::JsonlStore;

#[derive(Parser)]
#[command(name = "spam_triage")]
#[command(about = "Classify the spam folder with a language model and mail a report", long_about = None)]
struct Cli {
    /// Config file (.toml or .json); defaults to the per-user config dir
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never delete, whatever delete_processed says
    #[arg(long)]
    keep: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(&cli).map_err(|e| {
        eprintln!("{} failed: {e}", e.phase());
        anyhow!(e)
    })
}

fn run(cli: &Cli) -> spam_triage::Result<()> {
    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.keep {
        cfg.delete_processed = false;
    }

    let classifier = classify::from_config(&cfg)?;
    let store = JsonlStore::new(&cfg.results_path);
    let notifier = SmtpNotifier::new(&cfg.smtp_server, &cfg.email, &cfg.app_password);
    let opts = RunOptions {
        delete_processed: cfg.delete_processed,
        recipients: cfg.recipients(),
    };

    let mut mailbox = ImapMailbox::connect_and_select(
        &cfg.imap_server,
        &cfg.email,
        &cfg.app_password,
        &cfg.folder,
    )?;

    let summary = run_pipeline(&mut mailbox, classifier.as_ref(), &store, &notifier, &opts)?;

    if !summary.failed_deletions.is_empty() {
        log::warn!(
            "{} emails could not be flagged for deletion: {:?}",
            summary.failed_deletions.len(),
            summary.failed_deletions
        );
    }
    if opts.delete_processed {
        println!("All spam emails analyzed and deleted.");
    } else {
        println!("All spam emails analyzed.");
    }
    Ok(())
}
