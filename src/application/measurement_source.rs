// Source trait for measurement history
use crate::domain::measurement::MeasurementRecord;
use async_trait::async_trait;

#[async_trait]
pub trait MeasurementSource: Send + Sync {
    /// All records of the last `period_secs` seconds, chronological per node
    async fn bulk(&self, period_secs: i64) -> anyhow::Result<Vec<MeasurementRecord>>;

    /// Most recent record of every node
    async fn newest(&self) -> anyhow::Result<Vec<MeasurementRecord>>;
}
