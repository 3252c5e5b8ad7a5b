// Periodic refresh of plot snapshots
use crate::application::plot_service::PlotService;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

/// Refresh every tracked plot period on a fixed interval. Runs until the task is dropped.
pub async fn run_refresh_loop(service: PlotService, every: Duration) {
    tracing::info!(interval_secs = every.as_secs(), "Starting plot refresh scheduler");

    // `interval` panics on a zero period
    let mut ticker = interval(every.max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(ticker);

    while ticks.next().await.is_some() {
        service.refresh_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::plot_reducer::PlotReducer;
    use crate::application::plot_service::tests::{sample_records, FakeSource};
    use crate::domain::palette::Palette;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_loop_refreshes_on_every_tick() {
        let source = Arc::new(FakeSource::with_records(sample_records()));
        let service = PlotService::new(source.clone(), PlotReducer::default(), Palette::default(), 86_400, 4);

        let handle = tokio::spawn(run_refresh_loop(service, Duration::from_secs(30)));

        // first tick fires immediately, then two more within 65s
        tokio::time::sleep(Duration::from_secs(65)).await;
        handle.abort();

        assert_eq!(source.bulk_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_does_not_panic() {
        let source = Arc::new(FakeSource::with_records(sample_records()));
        let service = PlotService::new(source.clone(), PlotReducer::default(), Palette::default(), 86_400, 4);

        let handle = tokio::spawn(run_refresh_loop(service, Duration::ZERO));
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert!(!handle.is_finished());
        handle.abort();
        assert_eq!(source.bulk_calls.load(Ordering::SeqCst), 2);
    }
}
