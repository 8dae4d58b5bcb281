use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum Message<T> {
    Value(T),
    Flush(oneshot::Sender<()>),
}

/// Run the sink on the blocking pool so slow file or process work does not
/// stall the runtime
async fn deliver<T, F>(sink: &Arc<Mutex<F>>, value: T)
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let sink = Arc::clone(sink);
    let result = tokio::task::spawn_blocking(move || {
        let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink(value);
    })
    .await;

    if let Err(e) = result {
        log::error!("debounce sink failed: {e}");
    }
}

/// Coalesces bursts of values: each push restarts a quiet window and only
/// the most recent value reaches the sink once the window passes without a
/// newer push.
///
/// A pending value is never lost: it is delivered early by [`flush`], and
/// when the debouncer is closed or dropped.
///
/// [`flush`]: Debouncer::flush
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Message<T>>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the debouncing task on the current tokio runtime
    pub fn spawn<F>(window: Duration, sink: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message<T>>();
        let sink = Arc::new(Mutex::new(sink));

        let handle = tokio::spawn(async move {
            let mut pending: Option<T> = None;

            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(Message::Value(value)) => pending = Some(value),
                        Some(Message::Flush(done)) => {
                            let _ = done.send(());
                        }
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            msg = rx.recv() => match msg {
                                Some(Message::Value(newer)) => {
                                    log::trace!("debounce: superseded pending value");
                                    pending = Some(newer);
                                }
                                Some(Message::Flush(done)) => {
                                    deliver(&sink, value).await;
                                    let _ = done.send(());
                                }
                                None => {
                                    deliver(&sink, value).await;
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(window) => deliver(&sink, value).await,
                        }
                    }
                }
            }

            log::debug!("debounce task finished");
        });

        Self { tx, handle }
    }

    /// Queue a value, replacing any value still waiting out its window
    pub fn push(&self, value: T) {
        if self.tx.send(Message::Value(value)).is_err() {
            log::warn!("debounce task is gone, value dropped");
        }
    }

    /// Deliver the pending value now, if any, and wait until the sink ran
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Deliver the pending value and stop the task
    pub async fn close(self) {
        let Self { tx, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            log::error!("debounce task failed: {e}");
        }
    }
}
