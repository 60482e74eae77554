//! Fixed-rate update loop for continuously updating displays.
//!
//! The loop pulls one line per tick. Delays are corrected against the
//! clock so the long-run rate matches the configured rate even when
//! individual ticks run late.

use log::{debug, info};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub mod clock;
pub mod timer;

pub use clock::{Clock, TokioClock};
pub use timer::RateTimer;

/// A cancellable repeating task driven by a [`RateTimer`].
///
/// Each tick runs to completion before the next one is scheduled. Stopping
/// clears the running flag, which every tick checks before doing any work,
/// and aborts the pending sleep.
pub struct TimedLoop {
    interval_ns: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TimedLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ns: Arc::new(AtomicU64::new(interval.as_nanos() as u64)),
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_ns.load(Ordering::SeqCst))
    }

    /// Change the interval; a running loop picks it up on its next tick.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ns
            .store(interval.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start ticking with the tokio clock. Must be called inside a tokio runtime.
    pub fn start<F>(&mut self, tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.start_with_clock(Arc::new(TokioClock::new()), tick);
    }

    /// Start ticking, measuring drift against `clock`.
    ///
    /// The first tick runs immediately. Starting a running loop restarts it.
    pub fn start_with_clock<F>(&mut self, clock: Arc<dyn Clock>, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        // A fresh flag, so a lingering task from an earlier run stays stopped
        let running = Arc::new(AtomicBool::new(true));
        self.running = running.clone();
        let interval_ns = self.interval_ns.clone();

        info!("Starting update loop every {:?}", self.interval());
        self.task = Some(tokio::spawn(async move {
            let mut timer = RateTimer::new(Duration::from_nanos(interval_ns.load(Ordering::SeqCst)));
            timer.start(clock.as_ref());

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                tick();

                timer.set_interval(Duration::from_nanos(interval_ns.load(Ordering::SeqCst)));
                let delay = timer.next_delay(clock.as_ref());
                tokio::time::sleep(delay).await;
            }
            debug!("Update loop task ended");
        }));
    }

    /// Stop ticking. Safe to call at any time, including when not started.
    pub fn stop(&mut self) {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if was_running {
            info!("Stopped update loop");
        }
    }
}

impl Drop for TimedLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_tick(count: &Arc<AtomicUsize>) -> impl FnMut() + Send + 'static {
        let count = count.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_ticks_at_the_configured_rate() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut timed = TimedLoop::new(Duration::from_millis(50));
        timed.start(counting_tick(&count));
        assert!(timed.is_running());

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        timed.stop();

        let ticks = count.load(Ordering::SeqCst) as i64;
        assert!((ticks - 40).abs() <= 1, "{} ticks", ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_is_immediate() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut timed = TimedLoop::new(Duration::from_millis(100));
        timed.start(counting_tick(&count));

        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        timed.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut timed = TimedLoop::new(Duration::from_millis(20));
        timed.start(counting_tick(&count));

        tokio::time::sleep(Duration::from_millis(205)).await;
        timed.stop();
        assert!(!timed.is_running());
        let stopped_at = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_changes_apply_while_running() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut timed = TimedLoop::new(Duration::from_millis(100));
        timed.start(counting_tick(&count));

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let slow = count.load(Ordering::SeqCst);
        timed.set_interval(Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        timed.stop();

        let fast = count.load(Ordering::SeqCst) - slow;
        assert!(fast > 2 * slow, "slow {} fast {}", slow, fast);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_the_running_task() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut timed = TimedLoop::new(Duration::from_millis(50));

        timed.start(counting_tick(&first));
        tokio::time::sleep(Duration::from_millis(120)).await;
        timed.start(counting_tick(&second));
        let first_total = first.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(500)).await;
        timed.stop();
        assert_eq!(first.load(Ordering::SeqCst), first_total);
        assert!(second.load(Ordering::SeqCst) >= 9);
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let mut timed = TimedLoop::new(Duration::from_millis(10));
        timed.stop();
        timed.stop();
        assert!(!timed.is_running());
    }
}
