//! Clock and scheduler seam for the conversation controller.
//!
//! The controller's only time dependencies are "what time is it" (message
//! timestamps) and "wait this long" (the artificial reply delay). Both go
//! through [`Clock`] so tests can run turns against a paused or scripted
//! clock.

use std::time::Duration;

use time::OffsetDateTime;

/// Source of timestamps and delays.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    /// The current wall-clock time.
    fn now(&self) -> OffsetDateTime;

    /// Suspend the calling task for at least `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The real clock: UTC wall time and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait::async_trait]
impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn paused_runtime_advances_sleep() {
        let clock = SystemClock;
        let before = tokio::time::Instant::now();
        clock.sleep(Duration::from_millis(500)).await;
        assert_eq!(before.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn system_clock_reports_utc() {
        assert_eq!(SystemClock.now().offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn zero_sleep_completes() {
        tokio_test::block_on(SystemClock.sleep(Duration::ZERO));
    }
}
