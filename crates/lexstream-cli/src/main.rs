mod display;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lexstream_client::{AnalysisObserver, AnalyzeClient, run_with_persistence};
use lexstream_core::{AnalysisResult, ProgressUpdate};
use lexstream_store::{AnalysisStore, JsonlStore};
use lexstream_translate::{Translator, translate_analysis};

#[derive(Parser)]
#[command(name = "lexstream", version, about = "Legal document analysis over a streaming backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a document and stream its analysis
    Analyze {
        /// Path to the document (pdf, docx, or txt)
        file: PathBuf,

        /// Base URL of the analysis backend
        #[arg(long, env = "LEXSTREAM_BACKEND_URL", default_value = "http://127.0.0.1:8000")]
        backend_url: String,

        /// User id the analysis is stored under
        #[arg(long, env = "LEXSTREAM_USER", default_value = "local")]
        user: String,

        /// Target language to translate the result into (e.g. "ur")
        #[arg(long)]
        translate_to: Option<String>,

        /// Directory holding the history file
        #[arg(long, env = "LEXSTREAM_DATA_DIR", default_value = ".lexstream")]
        data_dir: PathBuf,
    },

    /// List stored analyses
    History {
        #[arg(long, env = "LEXSTREAM_USER", default_value = "local")]
        user: String,

        #[arg(long, env = "LEXSTREAM_DATA_DIR", default_value = ".lexstream")]
        data_dir: PathBuf,
    },
}

/// Prints each progress upsert and the terminal result as they arrive.
struct TerminalObserver;

impl AnalysisObserver for TerminalObserver {
    fn on_progress(&mut self, update: &ProgressUpdate, _snapshot: &[ProgressUpdate]) {
        display::render_progress(update);
    }

    fn on_result(&mut self, result: &AnalysisResult) {
        display::render_result(result);
    }
}

fn history_store(data_dir: &std::path::Path) -> Arc<dyn AnalysisStore> {
    Arc::new(JsonlStore::new(data_dir.join("analyses.jsonl")))
}

async fn analyze(
    file: PathBuf,
    backend_url: String,
    user: String,
    translate_to: Option<String>,
    data_dir: PathBuf,
) -> anyhow::Result<()> {
    let document_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let client = AnalyzeClient::new(backend_url);
    let response = client.analyze_file(&file).await?;
    if let Some(session_id) = &response.session_id {
        tracing::info!(session = %session_id, "analysis session started");
    }

    let store = history_store(&data_dir);
    let mut observer = TerminalObserver;
    let result =
        run_with_persistence(response.bytes, store, &user, &document_name, &mut observer).await?;

    if let (Some(target), AnalysisResult::LegalAnalysis { analysis, .. }) = (&translate_to, &result)
    {
        let translator = Translator::default_chain();
        let translation = translate_analysis(&translator, analysis, "en", target).await;
        display::render_translation(&translation, target);
    }

    Ok(())
}

async fn history(user: String, data_dir: PathBuf) -> anyhow::Result<()> {
    let store = history_store(&data_dir);
    let records = store.list_for_user(&user).await?;
    display::render_history(&records);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            file,
            backend_url,
            user,
            translate_to,
            data_dir,
        } => analyze(file, backend_url, user, translate_to, data_dir).await,
        Command::History { user, data_dir } => history(user, data_dir).await,
    }
}
