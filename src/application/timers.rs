use tokio::task::JoinHandle;

/// The deferred tasks of the round on the board: at most one ticker and one
/// completion follow-up.
///
/// Arming a slot aborts whatever it held. Everything still armed is aborted
/// when the value is dropped.
#[derive(Debug, Default)]
pub struct RoundTimers {
    ticker: Option<JoinHandle<()>>,
    completion: Option<JoinHandle<()>>,
}

impl RoundTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_ticker(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.ticker.replace(handle) {
            previous.abort();
        }
    }

    pub fn arm_completion(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.completion.replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            tracing::trace!("ticker cancelled");
            handle.abort();
        }
    }

    pub fn cancel_completion(&mut self) {
        if let Some(handle) = self.completion.take() {
            tracing::trace!("completion follow-up cancelled");
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel_ticker();
        self.cancel_completion();
    }

    /// Forgets the ticker handle without aborting it.
    ///
    /// Called from inside the ticker task itself, which then runs to its end.
    pub fn release_ticker(&mut self) {
        drop(self.ticker.take());
    }

    /// Same as [`release_ticker`](Self::release_ticker) for the completion task.
    pub fn release_completion(&mut self) {
        drop(self.completion.take());
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn has_pending_completion(&self) -> bool {
        self.completion
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RoundTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pending() -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_aborts_previous() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let first = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = tx.send(());
        });

        let mut timers = RoundTimers::new();
        timers.arm_ticker(first);
        timers.arm_ticker(pending());

        assert!(rx.await.is_err());
        assert!(timers.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let mut timers = RoundTimers::new();
        timers.arm_ticker(pending());
        timers.arm_completion(pending());
        assert!(timers.is_ticking());
        assert!(timers.has_pending_completion());

        timers.cancel_all();
        assert!(!timers.is_ticking());
        assert!(!timers.has_pending_completion());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_tasks() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = tx.send(());
        });

        let mut timers = RoundTimers::new();
        timers.arm_completion(handle);
        drop(timers);

        // an aborted task drops its sender without sending
        assert!(rx.await.is_err());
    }
}
