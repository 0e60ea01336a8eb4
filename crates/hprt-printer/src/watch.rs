//! Polling subscription on the radio's enabled state.
//!
//! A background task samples the radio once per interval and forwards a
//! value only when it differs from the previous one. Cancelling or dropping
//! the [`TransportWatch`] stops the task.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::native::BluetoothRadio;
use crate::session::{duration_millis, radio_enabled};

const CHANNEL_CAPACITY: usize = 16;

/// Stream of radio enabled-state changes. The first item is the current state.
#[derive(Debug)]
pub struct TransportWatch {
    rx: mpsc::Receiver<bool>,
    token: CancellationToken,
}

impl TransportWatch {
    pub(crate) fn spawn<R>(radio: Option<Arc<R>>, interval: Duration) -> Self
    where
        R: BluetoothRadio + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let token = CancellationToken::new();

        tokio::spawn(poll_loop(radio, interval, tx, token.clone()));
        tracing::debug!(interval_ms = duration_millis(interval), "Transport watch started");

        Self { rx, token }
    }

    /// Wait for the next change. `None` once the watch has stopped.
    pub async fn next_change(&mut self) -> Option<bool> {
        self.rx.recv().await
    }

    /// Stop polling. Pending values already sent can still be received.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TransportWatch {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Stream for TransportWatch {
    type Item = bool;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<bool>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}

async fn poll_loop<R: BluetoothRadio>(
    radio: Option<Arc<R>>,
    interval: Duration,
    tx: mpsc::Sender<bool>,
    token: CancellationToken,
) {
    let mut last = None;

    loop {
        let enabled = radio_enabled(radio.as_deref());
        if last != Some(enabled) {
            last = Some(enabled);
            tracing::debug!(enabled, "Bluetooth state changed");
            if tx.send(enabled).await.is_err() {
                break;
            }
        }

        if sleep_or_cancel(&token, interval).await {
            break;
        }
    }

    tracing::debug!("Transport watch stopped");
}
