//! One analysis run wired end to end: tee the response stream, detach the
//! history collector, drive the live branch.

use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use lexstream_core::AnalysisResult;
use lexstream_store::{AnalysisStore, spawn_collector};

use crate::client::ClientError;
use crate::driver::{AnalysisObserver, run_analysis};
use crate::tee::tee;

/// Consume a response byte stream with persistence on the side.
///
/// The stream is tee'd: one branch drives `observer` and produces the return
/// value, the other is drained by a detached collector that writes history to
/// `store`. The collector cannot fail this function — its errors terminate in
/// the log only.
pub async fn run_with_persistence<S, E, O>(
    stream: S,
    store: Arc<dyn AnalysisStore>,
    user_id: &str,
    document_name: &str,
    observer: &mut O,
) -> Result<AnalysisResult, ClientError>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    O: AnalysisObserver,
{
    let (live, persist) = tee(stream);
    spawn_collector(persist, store, user_id.to_string(), document_name.to_string());
    run_analysis(live, observer).await
}
