//! # Debounce
//!
//! Coalesces rapid query changes into one deferred search.
//!
//! ## States
//! - Idle: nothing scheduled
//! - Pending: one search scheduled, carrying the last query seen
//!
//! ## Rules
//! - Every push cancels the scheduled search and arms a new one, the quiet period restarts
//!   from zero
//! - Only one handle is ever outstanding, it lives behind a single mutex-guarded slot
//! - A search that already fired is not cancelled here, stale responses are handled by
//!   [`Sequencer`](crate::sequence::Sequencer)
use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle, time::sleep};
use tracing::debug;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait TimerHandle: Send {
    fn cancel(&self);
}

/// Host scheduling capability.
///
/// `schedule` must not run `task` before it returns.
pub trait Timer: Send + Sync {
    type Handle: TimerHandle;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;
}

#[derive(Debug, Clone)]
pub struct TokioTimer {
    runtime: Handle,
}

impl TokioTimer {
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self {
            runtime: Handle::current(),
        }
    }
}

impl From<Handle> for TokioTimer {
    fn from(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Timer for TokioTimer {
    type Handle = JoinHandle<()>;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle {
        self.runtime.spawn(async move {
            sleep(delay).await;
            task();
        })
    }
}

impl TimerHandle for JoinHandle<()> {
    fn cancel(&self) {
        self.abort();
    }
}

struct Pending<H> {
    generation: u64,
    handle: H,
}

struct Slot<H> {
    generation: u64,
    pending: Option<Pending<H>>,
}

type Action = Arc<dyn Fn(String) + Send + Sync>;

pub struct Debouncer<T: Timer> {
    timer: T,
    quiet_period: Duration,
    slot: Arc<Mutex<Slot<T::Handle>>>,
    action: Action,
}

impl<T: Timer> Debouncer<T>
where
    T::Handle: 'static,
{
    pub fn new<F>(timer: T, quiet_period: Duration, action: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            timer,
            quiet_period,
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                pending: None,
            })),
            action: Arc::new(action),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Records a query change, replacing whatever was scheduled.
    pub fn push(&self, query: impl Into<String>) {
        let query = query.into();
        let mut slot = self.slot.lock();

        if let Some(previous) = slot.pending.take() {
            previous.handle.cancel();
            debug!("Cancelled pending search #{}", previous.generation);
        }

        slot.generation += 1;
        let generation = slot.generation;

        let shared = Arc::clone(&self.slot);
        let action = Arc::clone(&self.action);

        // held across schedule so the task cannot observe the slot before it is armed
        let handle = self.timer.schedule(
            self.quiet_period,
            Box::new(move || {
                {
                    let mut slot = shared.lock();
                    if slot.pending.as_ref().map(|pending| pending.generation) != Some(generation) {
                        return;
                    }
                    slot.pending = None;
                }

                debug!("Firing search #{generation}");
                action(query);
            }),
        );

        slot.pending = Some(Pending { generation, handle });
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.slot.lock().pending.take() {
            pending.handle.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl<T: Timer> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.slot.lock().pending.take() {
            pending.handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);

        (fired, move |query| sink.lock().push(query))
    }

    const QUIET: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_coalesces_burst() {
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(TokioTimer::current(), QUIET, action);

        debouncer.push("i");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ip");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("iph");

        sleep(Duration::from_millis(499)).await;
        assert!(fired.lock().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock(), vec!["iph".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_from_zero() {
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(TokioTimer::current(), QUIET, action);

        debouncer.push("first");
        sleep(Duration::from_millis(499)).await;
        debouncer.push("second");

        sleep(Duration::from_millis(499)).await;
        assert!(fired.lock().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock(), vec!["second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_fire_twice() {
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(TokioTimer::current(), QUIET, action);

        debouncer.push("shoe");
        sleep(Duration::from_millis(600)).await;
        debouncer.push("shirt");
        sleep(Duration::from_millis(600)).await;

        assert_eq!(*fired.lock(), vec!["shoe".to_string(), "shirt".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(TokioTimer::current(), QUIET, action);

        debouncer.push("gone");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(2)).await;
        assert!(fired.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_configurable_quiet_period() {
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(TokioTimer::current(), Duration::from_millis(200), action);
        assert_eq!(debouncer.quiet_period(), Duration::from_millis(200));

        debouncer.push("fast");
        sleep(Duration::from_millis(201)).await;

        assert_eq!(*fired.lock(), vec!["fast".to_string()]);
    }

    struct ManualHandle(Arc<AtomicBool>);

    impl TimerHandle for ManualHandle {
        fn cancel(&self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Runs nothing until told to, ignores delays.
    #[derive(Default)]
    struct ManualTimer {
        queue: Mutex<Vec<(Arc<AtomicBool>, Task)>>,
    }

    impl ManualTimer {
        fn run_all(&self) {
            let tasks: Vec<_> = self.queue.lock().drain(..).collect();
            for (cancelled, task) in tasks {
                if !cancelled.load(Ordering::SeqCst) {
                    task();
                }
            }
        }
    }

    impl Timer for Arc<ManualTimer> {
        type Handle = ManualHandle;

        fn schedule(&self, _delay: Duration, task: Task) -> Self::Handle {
            let cancelled = Arc::new(AtomicBool::new(false));
            self.queue.lock().push((Arc::clone(&cancelled), task));
            ManualHandle(cancelled)
        }
    }

    #[test]
    fn test_host_agnostic_timer() {
        let timer = Arc::new(ManualTimer::default());
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(Arc::clone(&timer), QUIET, action);

        debouncer.push("a");
        debouncer.push("ab");
        debouncer.push("abc");
        timer.run_all();

        assert_eq!(*fired.lock(), vec!["abc".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_stale_task_ignored_even_if_run() {
        let timer = Arc::new(ManualTimer::default());
        let (fired, action) = recorder();
        let debouncer = Debouncer::new(Arc::clone(&timer), QUIET, action);

        debouncer.push("old");
        let (_, stale) = timer.queue.lock().remove(0);
        debouncer.push("new");

        stale();
        assert!(fired.lock().is_empty());

        timer.run_all();
        assert_eq!(*fired.lock(), vec!["new".to_string()]);
    }
}
