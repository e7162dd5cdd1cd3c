use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use faq_core::{
    MatchConfig, DEFAULT_EMPTY_MESSAGE, DEFAULT_ERROR_MESSAGE, DEFAULT_FALLBACK_MESSAGE,
    DEFAULT_THRESHOLD,
};

#[derive(Debug, Parser)]
#[command(name = "faq", version, about = "Answer questions from a FAQ file by text similarity")]
pub struct Cli {
    /// Knowledge base: JSON array of {"question", "answer"} objects.
    #[arg(long, global = true, env = "FAQ_PATH", default_value = "faq.json")]
    pub faq: PathBuf,

    /// File that receives one line per unanswered question.
    #[arg(
        long,
        global = true,
        env = "FAQ_UNMATCHED_LOG",
        default_value = "unmatched_questions.log"
    )]
    pub unmatched_log: PathBuf,

    /// Minimum similarity (0-100) for a stored answer to be returned.
    #[arg(long, global = true, env = "FAQ_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    #[arg(long, global = true, env = "FAQ_EMPTY_MESSAGE", default_value = DEFAULT_EMPTY_MESSAGE)]
    pub empty_message: String,

    #[arg(
        long,
        global = true,
        env = "FAQ_FALLBACK_MESSAGE",
        default_value = DEFAULT_FALLBACK_MESSAGE
    )]
    pub fallback_message: String,

    #[arg(long, global = true, env = "FAQ_ERROR_MESSAGE", default_value = DEFAULT_ERROR_MESSAGE)]
    pub error_message: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve POST /ask over HTTP.
    Serve {
        #[arg(long, env = "FAQ_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// Re-read the knowledge base on every request instead of once at startup.
        #[arg(long)]
        reload: bool,

        #[arg(long, default_value_t = 64 * 1024)]
        max_body_bytes: usize,
    },
    /// Answer one question and print the JSON reply.
    Ask {
        message: String,

        /// Do not record the question when it goes unanswered.
        #[arg(long)]
        no_log: bool,
    },
    /// List the best-scoring stored questions for a message.
    Top {
        message: String,

        #[arg(long, default_value_t = 3)]
        k: usize,
    },
    /// Summarize the unmatched log, most frequent questions first.
    Unmatched {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Validate the knowledge base.
    Check,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(format!(
                "threshold must be within 0..=100, got {}",
                self.threshold
            ));
        }

        if let Commands::Top { k: 0, .. } = self.command {
            return Err("k must be > 0".to_string());
        }

        Ok(())
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            threshold: self.threshold,
            empty_message: self.empty_message.clone(),
            fallback_message: self.fallback_message.clone(),
            error_message: self.error_message.clone(),
        }
    }
}
