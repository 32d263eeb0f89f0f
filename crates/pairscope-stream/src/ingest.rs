//! Reconnecting ingestion loop.

use futures::{SinkExt, StreamExt};
use pairscope_store::TickSink;
use pairscope_types::PairscopeError;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{StreamConfig, parse_trade_message};

/// Error that ends a feed session.
#[derive(Debug, Error)]
pub enum StreamError {
    /// WebSocket failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The sink rejected a tick.
    #[error(transparent)]
    Store(#[from] PairscopeError),

    /// The blocking append task did not complete.
    #[error("append task failed: {0}")]
    Append(#[from] tokio::task::JoinError),
}

/// Counters reported when ingestion stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Ticks appended to the sink.
    pub ticks: u64,
    /// Messages that were not trade payloads.
    pub skipped: u64,
    /// Sessions that ended and were retried.
    pub reconnects: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    skipped: AtomicU64,
    reconnects: AtomicU64,
}

impl Counters {
    fn summary(&self) -> IngestSummary {
        IngestSummary {
            ticks: self.ticks.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    IdleTimeout,
    Closed,
}

/// Streams trades into `sink` until `shutdown` resolves.
///
/// A session ends on an idle timeout, a close frame or an error; each is
/// followed by `reconnect_delay` before the next connection attempt. Appends
/// run on the blocking pool.
pub async fn run_ingestion<S, F>(config: &StreamConfig, sink: Arc<S>, shutdown: F) -> IngestSummary
where
    S: TickSink + ?Sized + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let counters = Counters::default();

    info!(url = %config.url(), "Starting trade ingestion");

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            outcome = stream_session(config, &sink, &counters) => {
                match outcome {
                    Ok(SessionEnd::IdleTimeout) => warn!(
                        timeout_secs = config.idle_timeout.as_secs(),
                        "No message received, reconnecting"
                    ),
                    Ok(SessionEnd::Closed) => info!("Trade stream closed, reconnecting"),
                    Err(e) => warn!(error = %e, "Trade stream failed, reconnecting"),
                }
                counters.reconnects.fetch_add(1, Ordering::Relaxed);
            }
        }

        tokio::select! {
            () = &mut shutdown => break,
            () = sleep(config.reconnect_delay) => {}
        }
    }

    let summary = counters.summary();
    info!(
        ticks = summary.ticks,
        skipped = summary.skipped,
        reconnects = summary.reconnects,
        "Trade ingestion stopped"
    );
    summary
}

async fn stream_session<S>(
    config: &StreamConfig,
    sink: &Arc<S>,
    counters: &Counters,
) -> Result<SessionEnd, StreamError>
where
    S: TickSink + ?Sized + 'static,
{
    let url = config.url();
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    info!(url = %url, "Connected to trade stream");

    let (mut write, mut read) = ws_stream.split();

    loop {
        let msg = match timeout(config.idle_timeout, read.next()).await {
            Err(_) => return Ok(SessionEnd::IdleTimeout),
            Ok(None) => return Ok(SessionEnd::Closed),
            Ok(Some(msg)) => msg?,
        };

        match msg {
            Message::Text(text) => handle_text(&text, sink, counters).await?,
            Message::Binary(data) => match std::str::from_utf8(&data) {
                Ok(text) => handle_text(text, sink, counters).await?,
                Err(_) => {
                    counters.skipped.fetch_add(1, Ordering::Relaxed);
                }
            },
            Message::Ping(payload) => write.send(Message::Pong(payload)).await?,
            Message::Close(frame) => {
                debug!(?frame, "Close frame received");
                return Ok(SessionEnd::Closed);
            }
            _ => {}
        }
    }
}

async fn handle_text<S>(text: &str, sink: &Arc<S>, counters: &Counters) -> Result<(), StreamError>
where
    S: TickSink + ?Sized + 'static,
{
    let Some(tick) = parse_trade_message(text) else {
        debug!(len = text.len(), "Skipping non-trade message");
        counters.skipped.fetch_add(1, Ordering::Relaxed);
        return Ok(());
    };

    let sink = Arc::clone(sink);
    tokio::task::spawn_blocking(move || sink.append(std::slice::from_ref(&tick))).await??;
    counters.ticks.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairscope_store::{MemoryTickStore, TickSource};
    use pairscope_types::Tick;
    use std::sync::{Mutex, mpsc};
    use std::time::Duration;
    use tokio::net::TcpListener;

    /// Sink whose append waits until the test releases it.
    struct GatedSink {
        gate: Mutex<mpsc::Receiver<()>>,
        inner: MemoryTickStore,
    }

    impl TickSink for GatedSink {
        fn append(&self, ticks: &[Tick]) -> pairscope_types::Result<usize> {
            self.gate
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .map_err(|_| PairscopeError::store("append was never released"))?;
            self.inner.append(ticks)
        }
    }

    fn trade(symbol: &str, price: &str, time_ms: i64) -> String {
        format!(
            r#"{{"stream":"{}@trade","data":{{"e":"trade","s":"{symbol}","p":"{price}","q":"0.5","T":{time_ms}}}}}"#,
            symbol.to_lowercase()
        )
    }

    #[tokio::test]
    async fn test_handle_text_counts() {
        let store = Arc::new(MemoryTickStore::new());
        let counters = Counters::default();

        handle_text(&trade("BTCUSDT", "42000", 1_704_067_200_000), &store, &counters)
            .await
            .unwrap();
        handle_text(r#"{"result":null,"id":1}"#, &store, &counters)
            .await
            .unwrap();

        assert_eq!(
            counters.summary(),
            IngestSummary {
                ticks: 1,
                skipped: 1,
                reconnects: 0
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_ingests_from_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((stream, _)) = listener.accept().await {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                ws.send(Message::Text(trade("BTCUSDT", "42000.5", 1_704_067_200_000)))
                    .await
                    .unwrap();
                ws.send(Message::Text("not json".to_string())).await.unwrap();
                ws.send(Message::Text(trade("ETHUSDT", "2200.25", 1_704_067_200_500)))
                    .await
                    .unwrap();
                while ws.next().await.is_some() {}
            }
        });

        let config = StreamConfig::default()
            .with_base_url(format!("ws://{addr}/stream"))
            .with_reconnect_delay(Duration::from_millis(50));
        let store = Arc::new(MemoryTickStore::new());
        let watched = Arc::clone(&store);
        let shutdown = async move {
            while watched.len() < 2 {
                sleep(Duration::from_millis(10)).await;
            }
        };

        let summary = timeout(
            Duration::from_secs(10),
            run_ingestion(&config, Arc::clone(&store), shutdown),
        )
        .await
        .unwrap();

        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.skipped, 1);

        let snapshot = store.snapshot(10).unwrap();
        assert_eq!(snapshot[0].symbol, "BTCUSDT");
        assert_eq!(snapshot[1].symbol, "ETHUSDT");
    }

    #[tokio::test]
    async fn test_idle_timeout_reconnects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut sessions = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                    sessions.push(ws);
                }
            }
        });

        let config = StreamConfig::default()
            .with_base_url(format!("ws://{addr}/stream"))
            .with_idle_timeout(Duration::from_millis(50))
            .with_reconnect_delay(Duration::from_millis(10));
        let store = Arc::new(MemoryTickStore::new());

        let summary = run_ingestion(&config, store, sleep(Duration::from_millis(400))).await;

        assert!(summary.reconnects >= 2);
        assert_eq!(summary.ticks, 0);
    }

    #[tokio::test]
    async fn test_append_runs_off_the_runtime_thread() {
        let (release, gate) = mpsc::channel();
        let sink = Arc::new(GatedSink {
            gate: Mutex::new(gate),
            inner: MemoryTickStore::new(),
        });
        let counters = Counters::default();
        // Only reachable while the single runtime thread is free.
        tokio::spawn(async move { release.send(()).unwrap() });

        handle_text(&trade("BTCUSDT", "42000", 1_704_067_200_000), &sink, &counters)
            .await
            .unwrap();
        assert_eq!(counters.summary().ticks, 1);
        assert_eq!(sink.inner.len(), 1);
    }
}
