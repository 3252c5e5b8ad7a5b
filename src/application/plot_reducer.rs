// Plot reducer - turns raw measurement history into chart-ready series and settings
use chrono_tz::Tz;

use crate::application::axes::build_plot_settings;
use crate::application::series::{gap_threshold, group_by_node, insert_gaps, project_fields, NodeEntries};
use crate::domain::measurement::{Field, MeasurementRecord};
use crate::domain::plot::PlotResult;

/// Reduces raw history for one plot period. Ticks are aligned in `timezone`.
#[derive(Debug, Clone, Copy)]
pub struct PlotReducer {
    timezone: Tz,
}

impl PlotReducer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Pure: the output depends only on `raw` and `plot_period` (seconds).
    /// Missing or empty input yields an empty result.
    pub fn reduce(&self, raw: Option<&[MeasurementRecord]>, plot_period: i64) -> PlotResult {
        let Some(raw) = raw.filter(|records| !records.is_empty()) else {
            return PlotResult::default();
        };

        let threshold = gap_threshold(plot_period);
        let gapped: Vec<NodeEntries<'_>> = group_by_node(raw)
            .into_iter()
            .map(|group| NodeEntries {
                node_id: group.node_id,
                entries: insert_gaps(&group.records, threshold),
            })
            .collect();

        PlotResult {
            data: project_fields(&gapped, &Field::ALL),
            settings: build_plot_settings(raw, &self.timezone),
        }
    }
}

impl Default for PlotReducer {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// Reduce `raw` for `plot_period` seconds with ticks aligned in UTC.
pub fn reduce_plot_data(raw: Option<&[MeasurementRecord]>, plot_period: i64) -> PlotResult {
    PlotReducer::default().reduce(raw, plot_period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plot::FieldPoint;

    const DAY: i64 = 24 * 60 * 60;

    fn record(node_id: u32, timestamp: i64, temperature: f64) -> MeasurementRecord {
        MeasurementRecord::new(node_id, timestamp)
            .with_value(Field::Temperature, temperature)
            .with_value(Field::Humidity, 45.0)
            .with_value(Field::Battery1Level, 1.4)
            .with_value(Field::Battery2Level, 1.3)
    }

    #[test]
    fn test_missing_input_yields_empty_result() {
        assert!(reduce_plot_data(None, DAY).is_empty());
        assert!(reduce_plot_data(Some(&[][..]), DAY).is_empty());
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let raw = vec![record(1, 0, 20.0), record(2, 600, 21.0), record(1, 9_000, 19.0)];

        let first = reduce_plot_data(Some(raw.as_slice()), DAY);
        let second = reduce_plot_data(Some(raw.as_slice()), DAY);
        assert_eq!(first, second);
    }

    #[test]
    fn test_node_order_follows_first_appearance() {
        let raw = vec![record(5, 0, 20.0), record(2, 10, 21.0), record(5, 20, 22.0), record(2, 30, 23.0)];
        let result = reduce_plot_data(Some(raw.as_slice()), DAY);

        for field in Field::ALL {
            assert_eq!(result.data[&field].node_ids(), vec![5, 2]);
        }
    }

    #[test]
    fn test_gap_inserted_for_short_period_only() {
        let raw = vec![record(1, 0, 20.0), record(1, 7_200, 21.0)];

        let short = reduce_plot_data(Some(raw.as_slice()), 3 * DAY);
        assert_eq!(
            short.data[&Field::Temperature].get(1).unwrap(),
            &vec![
                FieldPoint::new(0, Some(20.0)),
                FieldPoint::new(3_600, None),
                FieldPoint::new(7_200, Some(21.0)),
            ]
        );

        let long = reduce_plot_data(Some(raw.as_slice()), 30 * DAY);
        assert_eq!(long.data[&Field::Temperature].get(1).unwrap().len(), 2);
    }

    #[test]
    fn test_settings_use_ungapped_input() {
        // Node 1 gets a gap marker; the time axis still runs from the first to the last record.
        let raw = vec![record(1, 0, 20.0), record(2, 50_000, 25.0), record(1, 86_400, 21.0)];
        let result = reduce_plot_data(Some(raw.as_slice()), DAY);

        let settings = &result.settings[&Field::Temperature];
        assert!((settings.x_domain.min + 2_160.0).abs() < 1e-6);
        assert!((settings.x_domain.max - 88_560.0).abs() < 1e-6);
        assert_eq!(settings.tick_values.len(), 11);
        assert_eq!(result.settings.len(), 4);
        assert_eq!(result.data[&Field::Temperature].get(1).unwrap()[1], FieldPoint::new(43_200, None));
    }

    #[test]
    fn test_reducer_aligns_ticks_in_configured_timezone() {
        let raw = vec![record(1, 0, 20.0), record(1, 10 * 3_600, 21.0)];

        let utc = reduce_plot_data(Some(raw.as_slice()), DAY);
        let kolkata = PlotReducer::new(chrono_tz::Asia::Kolkata).reduce(Some(raw.as_slice()), DAY);

        assert_eq!(utc.settings[&Field::Humidity].tick_values[0], 3_600);
        assert_eq!(kolkata.settings[&Field::Humidity].tick_values[0], 1_800);
        assert_eq!(utc.data, kolkata.data);
    }
}
