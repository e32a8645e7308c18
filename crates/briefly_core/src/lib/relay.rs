//! Stream relay with parallel capture.
//!
//! The upstream summary stream feeds two consumers: the client response body
//! (chunk by chunk, as bytes arrive) and an in-memory accumulator handed to a
//! completion hook once the upstream is drained. The hook runs inside the
//! relay's background task, after the response body has finished; it is
//! fire-and-forget with respect to the HTTP response.

use std::future::Future;

use bytes::Bytes;
use futures::{channel::mpsc, SinkExt, Stream, StreamExt};

use crate::{agent::SummaryStream, Error};

/// Forwards `upstream` verbatim to the returned stream while accumulating the
/// decoded text, then invokes `on_done` exactly once with whatever was
/// captured. If the consumer of the returned stream is dropped mid-relay,
/// forwarding stops and `on_done` receives the partial capture.
pub fn relay_with_capture<F, Fut>(
    mut upstream: SummaryStream,
    on_done: F,
) -> impl Stream<Item = Result<Bytes, Error>>
where
    F: FnOnce(String) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let (mut tx, rx) = mpsc::channel::<Result<Bytes, Error>>(16);

    tokio::spawn(async move {
        let mut captured = String::new();

        while let Some(next) = upstream.next().await {
            match next {
                Ok(chunk) => {
                    captured.push_str(&String::from_utf8_lossy(&chunk));
                    if tx.send(Ok(chunk)).await.is_err() {
                        tracing::debug!("client disconnected mid-stream, stopping relay");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "upstream failed mid-relay");
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }

        // close the response body before the side effect runs
        drop(tx);
        on_done(captured).await;
    });

    rx
}
