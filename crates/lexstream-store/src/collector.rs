//! Background collection of the analysis stream for durable history.
//!
//! The collector consumes its own clone of the response byte stream, fully
//! independent of the live branch: private decoder, private buffers, nothing
//! shared. It is best-effort end to end — every failure is logged and
//! swallowed, and nothing on this path can reach the caller that started the
//! live stream.

use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use lexstream_core::{
    Analysis, AnalysisResult, FrameDecoder, StreamEvent, Utf8Chunker, classify,
};
use tracing::{error, info, warn};

use crate::record::AnalysisRecord;
use crate::store::AnalysisStore;

/// Drain a stream clone and persist the analysis it carries, if any.
///
/// Tracks the *last* legal-analysis terminal seen, then saves exactly one
/// record — provided the analysis has a non-empty summary and verdict (an
/// empty risks list is fine). Decoding stops at the `[DONE]` sentinel so a
/// transport that never closes its body cannot hang this task.
pub async fn collect_and_save<S, E>(
    stream: S,
    store: Arc<dyn AnalysisStore>,
    user_id: &str,
    document_name: &str,
) where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    info!(user = %user_id, document = %document_name, "collecting analysis stream");

    let Some(analysis) = drain_last_analysis(stream).await else {
        warn!(document = %document_name, "no analysis result found in stream; nothing saved");
        return;
    };

    if analysis.summary.is_empty() || analysis.verdict.is_empty() {
        warn!(document = %document_name, "analysis missing summary or verdict; nothing saved");
        return;
    }

    let record = AnalysisRecord::from_analysis(user_id, document_name, analysis);
    if let Err(err) = store.save(record).await {
        error!(error = %err, document = %document_name, "failed to save analysis");
    }
}

/// Decode and classify the whole stream, keeping the last legal analysis.
async fn drain_last_analysis<S, E>(stream: S) -> Option<Analysis>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    futures::pin_mut!(stream);
    let mut chunker = Utf8Chunker::new();
    let mut decoder = FrameDecoder::new();
    let mut last: Option<Analysis> = None;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(error = %err, "stream read failed while collecting; stopping");
                break;
            }
        };
        let text = chunker.push(&chunk);
        for payload in decoder.push(&text) {
            let value: serde_json::Value = match serde_json::from_str(&payload) {
                Ok(value) => value,
                // Partial or malformed frames are expected; keep going.
                Err(_) => continue,
            };
            if let StreamEvent::Terminal(AnalysisResult::LegalAnalysis { analysis, .. }) =
                classify(&value)
            {
                last = Some(analysis);
            }
        }
        if decoder.is_done() {
            break;
        }
    }

    last
}

/// Start the collector detached from the caller ("fire and forget").
///
/// The task handle is dropped on purpose: completion or failure of this path
/// has no observable effect on the live stream, and its error channel ends in
/// the log sink only.
pub fn spawn_collector<S, E>(
    stream: S,
    store: Arc<dyn AnalysisStore>,
    user_id: String,
    document_name: String,
) where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        collect_and_save(stream, store, &user_id, &document_name).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use lexstream_core::RiskLevel;

    fn byte_stream(parts: &[&str]) -> impl Stream<Item = Result<Bytes, String>> + Send + 'static {
        let chunks: Vec<Result<Bytes, String>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
            .collect();
        futures::stream::iter(chunks)
    }

    const FULL_RESULT: &str = "data: {\"final_result\":{\"type\":\"legal_analysis\",\"analysis\":{\"summary\":\"S\",\"risks\":[{\"level\":\"high\",\"description\":\"D\"}],\"verdict\":\"V\"},\"session_id\":\"s1\"}}\n\n";

    #[tokio::test]
    async fn saves_exactly_one_record() {
        let store = Arc::new(MemoryStore::new());
        collect_and_save(
            byte_stream(&[
                "data: {\"step\":\"Extracting\",\"progress\":10}\n\n",
                FULL_RESULT,
                "data: [DONE]\n\n",
            ]),
            store.clone(),
            "u1",
            "lease.pdf",
        )
        .await;

        let records = store.list_for_user("u1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary, "S");
        assert_eq!(records[0].verdict, "V");
        assert_eq!(records[0].risks[0].level, RiskLevel::High);
        assert_eq!(records[0].document_name, "lease.pdf");
    }

    #[tokio::test]
    async fn last_legal_result_wins() {
        let earlier = "data: {\"final_result\":{\"type\":\"legal_analysis\",\"analysis\":{\"summary\":\"old\",\"risks\":[],\"verdict\":\"old\"}}}\n\n";
        let later = "data: {\"final_result\":{\"type\":\"legal_analysis\",\"analysis\":{\"summary\":\"new\",\"risks\":[],\"verdict\":\"new\"}}}\n\n";
        let store = Arc::new(MemoryStore::new());
        collect_and_save(byte_stream(&[earlier, later]), store.clone(), "u1", "d").await;

        let records = store.list_for_user("u1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary, "new");
    }

    #[tokio::test]
    async fn empty_summary_is_not_saved() {
        let incomplete = "data: {\"final_result\":{\"type\":\"legal_analysis\",\"analysis\":{\"risks\":[],\"verdict\":\"V\"}}}\n\n";
        let store = Arc::new(MemoryStore::new());
        collect_and_save(byte_stream(&[incomplete]), store.clone(), "u1", "d").await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_risks_list_is_still_saved() {
        let no_risks = "data: {\"final_result\":{\"type\":\"legal_analysis\",\"analysis\":{\"summary\":\"S\",\"risks\":[],\"verdict\":\"V\"}}}\n\n";
        let store = Arc::new(MemoryStore::new());
        collect_and_save(byte_stream(&[no_risks]), store.clone(), "u1", "d").await;
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn error_terminal_is_not_saved() {
        let store = Arc::new(MemoryStore::new());
        collect_and_save(
            byte_stream(&[
                "data: {\"final_result\":{\"type\":\"error\",\"message\":\"x\"}}\n\n",
                "data: [DONE]\n\n",
            ]),
            store.clone(),
            "u1",
            "d",
        )
        .await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn done_sentinel_is_a_hard_stop() {
        // A result after [DONE] must be ignored, matching the live branch.
        let store = Arc::new(MemoryStore::new());
        collect_and_save(
            byte_stream(&["data: [DONE]\n\n", FULL_RESULT]),
            store.clone(),
            "u1",
            "d",
        )
        .await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn transport_error_mid_stream_keeps_earlier_result() {
        let chunks = vec![
            Ok(Bytes::copy_from_slice(FULL_RESULT.as_bytes())),
            Err("connection reset".to_string()),
        ];
        let store = Arc::new(MemoryStore::new());
        collect_and_save(futures::stream::iter(chunks), store.clone(), "u1", "d").await;
        // The result seen before the failure is still persisted.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn spawned_collector_runs_detached() {
        let store = Arc::new(MemoryStore::new());
        spawn_collector(
            byte_stream(&[FULL_RESULT, "data: [DONE]\n\n"]),
            store.clone(),
            "u1".to_string(),
            "d".to_string(),
        );

        // Fire and forget: poll until the detached task lands the record.
        for _ in 0..100 {
            if store.len() == 1 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("collector never saved the record");
    }
}
