use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Sent once when the process should stop. Dropping the trigger counts as a
/// shutdown too.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    pub fn trigger(&self, reason: &str) {
        log::info!("Shutdown requested: {}", reason);
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    /// True once triggered or once the trigger is gone.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleeps until `deadline`. Returns true if woken by shutdown instead.
    pub async fn sleep_until(&mut self, deadline: Instant) -> bool {
        tokio::select! {
            _ = sleep_until(deadline) => self.is_triggered(),
            _ = self.triggered() => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn sleep_runs_to_deadline_without_trigger() {
        let (_trigger, mut shutdown) = channel();
        let start = Instant::now();

        assert!(!shutdown.sleep_until(start + Duration::from_secs(5)).await);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_trigger_counts_as_shutdown() {
        let (trigger, mut shutdown) = channel();
        assert!(!shutdown.is_triggered());

        drop(trigger);

        assert!(shutdown.is_triggered());
        let start = Instant::now();
        assert!(shutdown.sleep_until(start + Duration::from_secs(30)).await);
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_cuts_sleep_short() {
        let (trigger, mut shutdown) = channel();
        let start = Instant::now();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.trigger("test");
        });

        assert!(shutdown.sleep_until(start + Duration::from_secs(30)).await);
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(shutdown.is_triggered());
    }
}
