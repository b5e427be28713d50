use std::time::Duration;

use tokio::sync::mpsc;

/// Input half of a debounced channel. Cloneable; dropping every clone
/// tears the worker down and cancels any pending emission.
#[derive(Clone)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
}

/// Output half: values that stayed the latest arrival for one full
/// quiescence window.
pub struct Settled<T> {
    output: mpsc::UnboundedReceiver<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Builds the pair and spawns the worker. Every `observe` call
    /// restarts the window, so a value is only emitted once arrivals go
    /// quiet for `window`. A settled value equal to the previously
    /// emitted one is swallowed.
    pub fn channel(window: Duration) -> (Self, Settled<T>) {
        let (input, in_rx) = mpsc::unbounded_channel();
        let (out_tx, output) = mpsc::unbounded_channel();
        tokio::spawn(run(window, in_rx, out_tx));
        (Self { input }, Settled { output })
    }

    /// Feeds a new arrival. A send after teardown is a no-op.
    pub fn observe(&self, value: T) {
        let _ = self.input.send(value);
    }
}

impl<T> Settled<T> {
    /// Next settled value, or `None` once every input handle is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.output.recv().await
    }
}

async fn run<T>(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    settled: mpsc::UnboundedSender<T>,
) where
    T: Clone + PartialEq,
{
    let mut last_emitted: Option<T> = None;

    while let Some(mut latest) = input.recv().await {
        loop {
            let timer = tokio::time::sleep(window);
            tokio::pin!(timer);
            tokio::select! {
                arrival = input.recv() => match arrival {
                    Some(value) => latest = value,
                    // Input gone mid-window: the pending emission dies
                    // with the timer.
                    None => return,
                },
                _ = &mut timer => break,
            }
        }

        if last_emitted.as_ref() == Some(&latest) {
            continue;
        }
        if settled.send(latest.clone()).is_err() {
            return;
        }
        last_emitted = Some(latest);
    }
}
