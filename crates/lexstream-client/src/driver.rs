//! The live branch of one analysis run.
//!
//! Consumes the SSE byte stream, reconstructs frames, classifies each one,
//! and drives an observer: a ledger snapshot after every progress upsert,
//! then exactly one terminal result. The ledger is cleared the moment a
//! terminal event is classified, so a consumer never sees stale progress
//! next to a result.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use lexstream_core::{
    AnalysisResult, FrameDecoder, ProgressLedger, ProgressUpdate, StreamEvent, Utf8Chunker,
    classify,
};
use tracing::{debug, warn};

use crate::client::ClientError;

/// Subscription surface for the rendering layer.
pub trait AnalysisObserver {
    /// Called after each progress upsert with the update that changed and the
    /// full ordered ledger snapshot.
    fn on_progress(&mut self, update: &ProgressUpdate, snapshot: &[ProgressUpdate]);

    /// Called exactly once, with the run's terminal result. The progress
    /// ledger is already empty when this fires.
    fn on_result(&mut self, result: &AnalysisResult);
}

/// Drive one analysis run from its byte stream.
///
/// Returns the terminal result, or an error when the transport fails or the
/// stream ends with no terminal frame observed. Malformed frames are dropped
/// with a warning and the stream keeps flowing. Decoding stops at the first
/// terminal event; the `[DONE]` sentinel normally follows immediately after.
pub async fn run_analysis<S, E, O>(stream: S, observer: &mut O) -> Result<AnalysisResult, ClientError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
    O: AnalysisObserver,
{
    futures::pin_mut!(stream);
    let mut chunker = Utf8Chunker::new();
    let mut decoder = FrameDecoder::new();
    let mut ledger = ProgressLedger::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ClientError::Stream(e.to_string()))?;
        let text = chunker.push(&chunk);
        for payload in decoder.push(&text) {
            let value: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(err) => {
                    warn!(error = %err, "dropping malformed frame");
                    continue;
                }
            };
            match classify(&value) {
                StreamEvent::Terminal(result) => {
                    ledger.clear();
                    observer.on_result(&result);
                    return Ok(result);
                }
                StreamEvent::Progress(update) => {
                    debug!(step = %update.step, progress = update.progress, "progress update");
                    ledger.upsert(update.clone());
                    observer.on_progress(&update, ledger.snapshot());
                }
                StreamEvent::Ignore => {}
            }
        }
        if decoder.is_done() {
            break;
        }
    }

    Err(ClientError::NoTerminalResult)
}
