//! Quiescence window for live filter inputs.
//!
//! Callers that refetch on every keystroke hold one [`Debouncer`] per input
//! field. Each new input cancels the pending fetch and schedules a fresh one;
//! only a fetch that survives a full window without being replaced runs.

use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending task with `task`, to run once the window elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task.await;
        }));
    }

    /// Drops the pending task, if any, before it fires.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tokio::time::sleep;

    use super::*;

    fn counting(hits: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let hits = Arc::clone(hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_collapse_into_one_run() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::default();

        for _ in 0..3 {
            debouncer.schedule(counting(&hits));
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(600)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_run() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        debouncer.schedule(counting(&hits));
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_pending_task() {
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::default();
            debouncer.schedule(counting(&hits));
        }
        sleep(DEFAULT_WINDOW * 2).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_inputs_each_fire() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(counting(&hits));
        sleep(Duration::from_millis(150)).await;
        debouncer.schedule(counting(&hits));
        sleep(Duration::from_millis(150)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
