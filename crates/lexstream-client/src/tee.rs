//! Fan one byte stream out to two independent consumers.
//!
//! Standard tee semantics: both branches see every chunk in order; a slow or
//! dropped branch never stalls or starves the other. Branches hold no shared
//! mutable state — each gets its own unbounded channel fed by one forwarding
//! task.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Item delivered on each branch. Upstream transport errors are carried as
/// strings because they must be delivered to both branches.
pub type TeeItem = Result<Bytes, String>;

/// Split `upstream` into two independently consumable byte streams.
///
/// The forwarding task runs until the upstream ends; `Bytes` chunks are
/// reference-counted, so the duplication is cheap.
pub fn tee<S, E>(
    upstream: S,
) -> (
    UnboundedReceiverStream<TeeItem>,
    UnboundedReceiverStream<TeeItem>,
)
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let (tx_a, rx_a) = mpsc::unbounded_channel();
    let (tx_b, rx_b) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        futures::pin_mut!(upstream);
        while let Some(item) = upstream.next().await {
            let item: TeeItem = item.map_err(|e| e.to_string());
            // A closed receiver just means that branch is gone; keep feeding
            // the other one.
            let _ = tx_a.send(item.clone());
            let _ = tx_b.send(item);
        }
    });

    (
        UnboundedReceiverStream::new(rx_a),
        UnboundedReceiverStream::new(rx_b),
    )
}
