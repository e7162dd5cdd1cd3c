mod cli;
mod report;
mod server;

use std::fs;
use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use faq_core::{
    lint_entries, load_entries_json, summarize_unmatched, FileUnmatchedLog, Matcher,
    NoopUnmatchedLog, UnmatchedSink,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::server::{AppState, KnowledgeSource};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.validate().map_err(anyhow::Error::msg)?;
    let config = cli.match_config();

    match &cli.command {
        Commands::Serve {
            bind,
            reload,
            max_body_bytes,
        } => {
            let source = if *reload {
                // Fail fast on a bad path even though every request re-reads it.
                Matcher::from_path(&cli.faq, config.clone())?;
                KnowledgeSource::Reload {
                    path: cli.faq.clone(),
                    config,
                }
            } else {
                let matcher = Matcher::from_path(&cli.faq, config)?;
                info!(
                    entries = matcher.entries().len(),
                    "Loaded knowledge base from {}",
                    cli.faq.display()
                );
                KnowledgeSource::Loaded(Arc::new(matcher))
            };
            let unmatched = FileUnmatchedLog::new(&cli.unmatched_log);
            info!("Recording unmatched questions to {}", unmatched.path().display());
            let state = AppState {
                source,
                unmatched: Arc::new(unmatched),
            };

            let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
            runtime.block_on(server::serve(*bind, state, *max_body_bytes))?;
        }
        Commands::Ask { message, no_log } => {
            let matcher = match Matcher::from_path(&cli.faq, config.clone()) {
                Ok(matcher) => matcher,
                Err(err) => {
                    println!("{}", serde_json::to_string(&config.internal_error())?);
                    return Err(err.into());
                }
            };
            let sink: Box<dyn UnmatchedSink> = if *no_log {
                Box::new(NoopUnmatchedLog)
            } else {
                Box::new(FileUnmatchedLog::new(&cli.unmatched_log))
            };

            let result = matcher.answer(message, sink.as_ref());
            println!("{}", serde_json::to_string(&result)?);
        }
        Commands::Top { message, k } => {
            let matcher = Matcher::from_path(&cli.faq, config)?;
            report::write_top(&mut io::stdout().lock(), &matcher.top_k(message, *k))?;
        }
        Commands::Unmatched { limit } => {
            let contents = match fs::read_to_string(&cli.unmatched_log) {
                Ok(contents) => contents,
                Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("read {}", cli.unmatched_log.display()));
                }
            };
            let summary = summarize_unmatched(&contents);
            report::write_unmatched(&mut io::stdout().lock(), &summary, *limit)?;
        }
        Commands::Check => {
            let entries = load_entries_json(&cli.faq)?;
            let lint = lint_entries(&entries);
            report::write_lint(&mut io::stdout().lock(), &lint, &entries)?;
            if !lint.is_clean() {
                bail!("knowledge base {} has problems", cli.faq.display());
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
