// Plot service - Use case for serving reduced plot data per period
use crate::application::measurement_source::MeasurementSource;
use crate::application::plot_reducer::PlotReducer;
use crate::domain::measurement::MeasurementRecord;
use crate::domain::palette::Palette;
use crate::domain::plot::PlotResult;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Newest reading of a node together with its chart color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReading {
    #[serde(flatten)]
    pub record: MeasurementRecord,
    pub color: String,
}

/// Cached reduction of one period; `generation` orders concurrent refreshes.
#[derive(Debug, Clone)]
struct Snapshot {
    generation: u64,
    result: Arc<PlotResult>,
}

#[derive(Clone)]
pub struct PlotService {
    source: Arc<dyn MeasurementSource>,
    reducer: PlotReducer,
    palette: Palette,
    default_period: i64,
    max_tracked_periods: usize,
    snapshots: Arc<RwLock<HashMap<i64, Snapshot>>>,
    generation: Arc<AtomicU64>,
}

impl PlotService {
    pub fn new(
        source: Arc<dyn MeasurementSource>,
        reducer: PlotReducer,
        palette: Palette,
        default_period: i64,
        max_tracked_periods: usize,
    ) -> Self {
        Self {
            source,
            reducer,
            palette,
            default_period,
            max_tracked_periods,
            snapshots: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn default_period(&self) -> i64 {
        self.default_period
    }

    /// Latest snapshot for `period`, reduced on demand when none exists yet.
    pub async fn plot(&self, period: i64) -> Arc<PlotResult> {
        if let Some(snapshot) = self.snapshots.read().await.get(&period) {
            return snapshot.result.clone();
        }
        self.refresh(period).await
    }

    /// Fetch fresh history for `period` and reduce it.
    ///
    /// A failed fetch keeps serving the previous snapshot, or an empty result if there is none.
    pub async fn refresh(&self, period: i64) -> Arc<PlotResult> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let records = match self.source.bulk(period).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(period, error = %e, "Failed to fetch measurement history");
                let snapshots = self.snapshots.read().await;
                return snapshots
                    .get(&period)
                    .map(|snapshot| snapshot.result.clone())
                    .unwrap_or_default();
            }
        };

        let result = Arc::new(self.reducer.reduce(Some(records.as_slice()), period));
        tracing::debug!(
            period,
            records = records.len(),
            nodes = result.data.values().next().map(|s| s.len()).unwrap_or(0),
            "Reduced plot data"
        );

        self.store_snapshot(period, generation, result).await
    }

    /// Store `result` unless a refresh started later already stored its own.
    /// Returns whatever the cache now serves for `period`.
    async fn store_snapshot(&self, period: i64, generation: u64, result: Arc<PlotResult>) -> Arc<PlotResult> {
        let mut snapshots = self.snapshots.write().await;
        match snapshots.get(&period) {
            Some(current) if current.generation > generation => {
                tracing::debug!(period, generation, stored = current.generation, "Discarding stale reduction");
                current.result.clone()
            }
            Some(_) => {
                snapshots.insert(period, Snapshot { generation, result: result.clone() });
                result
            }
            None if snapshots.len() < self.max_tracked_periods => {
                snapshots.insert(period, Snapshot { generation, result: result.clone() });
                result
            }
            None => {
                tracing::debug!(period, "Snapshot cache full, not tracking period");
                result
            }
        }
    }

    /// Refresh the default period and every period that has been requested so far.
    pub async fn refresh_all(&self) {
        let mut periods: Vec<i64> = self.snapshots.read().await.keys().copied().collect();
        if !periods.contains(&self.default_period) {
            periods.push(self.default_period);
        }

        join_all(periods.iter().map(|&period| self.refresh(period))).await;
        tracing::debug!(periods = periods.len(), "Refreshed plot snapshots");
    }

    pub async fn newest_nodes(&self) -> Vec<NodeReading> {
        match self.source.newest().await {
            Ok(records) => records
                .into_iter()
                .map(|record| NodeReading {
                    color: self.palette.color_for(record.node_id).to_string(),
                    record,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch newest measurements");
                Vec::new()
            }
        }
    }
}
