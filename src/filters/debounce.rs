use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

/// Quiet period applied to filter→URL propagation and map viewport changes
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Trailing-edge debouncer for a rapidly-changing value
///
/// Emits the latest input only after the input has stopped changing for the
/// configured delay; every new input restarts the timer. Intermediate values
/// are never observable downstream. Dropping the debouncer ends the worker
/// task through channel closure.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: watch::Sender<Option<T>>,
    output: watch::Receiver<Option<T>>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        let (input, mut rx) = watch::channel(None::<T>);
        let (tx, output) = watch::channel(None::<T>);

        tokio::spawn(async move {
            loop {
                // Wait for the first update of a burst
                if rx.changed().await.is_err() {
                    return;
                }
                // Restart the timer on every further update within the window
                loop {
                    tokio::select! {
                        changed = rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        _ = sleep(delay) => {
                            let latest = rx.borrow_and_update().clone();
                            if tx.send(latest).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { input, output }
    }

    /// Feed a new value; restarts the quiet-period timer
    pub fn update(&self, value: T) {
        let _ = self.input.send(Some(value));
    }

    /// Receiver observing debounced values; `None` until the first emission
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.clone()
    }
}
