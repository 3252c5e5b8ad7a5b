// Series stages of the plot reduction: grouping by node, gap insertion, field projection
use std::collections::{BTreeMap, HashMap};

use crate::domain::measurement::{Field, MeasurementRecord, NodeId};
use crate::domain::plot::{FieldPoint, GapMarker, NodeSeries};

const HOUR_SECS: i64 = 60 * 60;
const WEEK_SECS: i64 = 7 * 24 * HOUR_SECS;

/// Gap threshold for short plot periods (under a week).
pub const SHORT_GAP_SECS: i64 = HOUR_SECS;
/// Gap threshold for plot periods of a week or longer.
pub const LONG_GAP_SECS: i64 = 6 * HOUR_SECS;

/// Records of one node, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecords<'a> {
    pub node_id: NodeId,
    pub records: Vec<&'a MeasurementRecord>,
}

/// A point of a gapped node sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesEntry<'a> {
    Reading(&'a MeasurementRecord),
    Gap(GapMarker),
}

impl SeriesEntry<'_> {
    pub fn timestamp(&self) -> i64 {
        match self {
            SeriesEntry::Reading(record) => record.timestamp,
            SeriesEntry::Gap(gap) => gap.timestamp,
        }
    }

    fn value(&self, field: Field) -> Option<f64> {
        match self {
            SeriesEntry::Reading(record) => record.value(field),
            SeriesEntry::Gap(_) => None,
        }
    }
}

/// Gapped sequence of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntries<'a> {
    pub node_id: NodeId,
    pub entries: Vec<SeriesEntry<'a>>,
}

/// Partition records per node. Nodes come out in order of first appearance.
pub fn group_by_node(records: &[MeasurementRecord]) -> Vec<NodeRecords<'_>> {
    let mut groups: Vec<NodeRecords<'_>> = Vec::new();
    let mut positions: HashMap<NodeId, usize> = HashMap::new();

    for record in records {
        match positions.get(&record.node_id) {
            Some(&pos) => groups[pos].records.push(record),
            None => {
                positions.insert(record.node_id, groups.len());
                groups.push(NodeRecords {
                    node_id: record.node_id,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

/// Maximum tolerated silence between two readings before the line is broken.
pub fn gap_threshold(plot_period: i64) -> i64 {
    if plot_period < WEEK_SECS {
        SHORT_GAP_SECS
    } else {
        LONG_GAP_SECS
    }
}

/// Insert a [`GapMarker`] halfway between neighbours further apart than `threshold` seconds.
pub fn insert_gaps<'a>(records: &[&'a MeasurementRecord], threshold: i64) -> Vec<SeriesEntry<'a>> {
    let mut entries = Vec::with_capacity(records.len());
    let mut previous: Option<&MeasurementRecord> = None;

    for &record in records {
        if let Some(prev) = previous {
            let delta = record.timestamp - prev.timestamp;
            if delta > threshold {
                // Midpoint rounded down to a whole second, so an odd sum lands
                // half a second early. Still strictly between the neighbours.
                entries.push(SeriesEntry::Gap(GapMarker {
                    timestamp: prev.timestamp + delta / 2,
                }));
            }
        }
        entries.push(SeriesEntry::Reading(record));
        previous = Some(record);
    }

    entries
}

/// Project gapped node sequences onto `{timestamp, value}` series for each field.
pub fn project_fields(nodes: &[NodeEntries<'_>], fields: &[Field]) -> BTreeMap<Field, NodeSeries> {
    fields
        .iter()
        .map(|&field| {
            let mut series = NodeSeries::new();
            for node in nodes {
                let points = node
                    .entries
                    .iter()
                    .map(|entry| FieldPoint::new(entry.timestamp(), entry.value(field)))
                    .collect();
                series.insert(node.node_id, points);
            }
            (field, series)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(node_id: NodeId, timestamp: i64) -> MeasurementRecord {
        MeasurementRecord::new(node_id, timestamp).with_value(Field::Temperature, 20.0)
    }

    #[test]
    fn test_group_by_node_keeps_first_appearance_order() {
        let records = vec![reading(5, 0), reading(2, 10), reading(5, 20), reading(2, 30)];
        let groups = group_by_node(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].node_id, 5);
        assert_eq!(groups[1].node_id, 2);
        let timestamps: Vec<i64> = groups[0].records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![0, 20]);
    }

    #[test]
    fn test_group_by_node_many_interleaved_nodes() {
        let records: Vec<MeasurementRecord> = (0..3_000)
            .map(|i| reading((999 - i % 1_000) as NodeId, i as i64))
            .collect();
        let groups = group_by_node(&records);

        assert_eq!(groups.len(), 1_000);
        assert_eq!(groups[0].node_id, 999);
        assert_eq!(groups[999].node_id, 0);
        let timestamps: Vec<i64> = groups[10].records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![10, 1_010, 2_010]);
    }

    #[test]
    fn test_gap_threshold_by_period() {
        assert_eq!(gap_threshold(3 * 24 * 3600), 3600);
        assert_eq!(gap_threshold(7 * 24 * 3600 - 1), 3600);
        assert_eq!(gap_threshold(7 * 24 * 3600), 21600);
        assert_eq!(gap_threshold(365 * 24 * 3600), 21600);
    }

    #[test]
    fn test_insert_gaps_adds_midpoint_marker() {
        let first = reading(1, 0);
        let second = reading(1, 3700);
        let entries = insert_gaps(&[&first, &second], SHORT_GAP_SECS);

        assert_eq!(
            entries,
            vec![
                SeriesEntry::Reading(&first),
                SeriesEntry::Gap(GapMarker { timestamp: 1850 }),
                SeriesEntry::Reading(&second),
            ]
        );
    }

    #[test]
    fn test_insert_gaps_odd_span_rounds_down() {
        let first = reading(1, 100);
        let second = reading(1, 3_901);
        let entries = insert_gaps(&[&first, &second], SHORT_GAP_SECS);

        // true midpoint is 2000.5
        assert_eq!(entries[1], SeriesEntry::Gap(GapMarker { timestamp: 2_000 }));
    }

    #[test]
    fn test_insert_gaps_ignores_short_silence() {
        let first = reading(1, 0);
        let second = reading(1, 3000);
        let exact = reading(1, 6600);
        let entries = insert_gaps(&[&first, &second, &exact], SHORT_GAP_SECS);

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| matches!(e, SeriesEntry::Reading(_))));
    }

    #[test]
    fn test_insert_gaps_trivial_inputs() {
        assert!(insert_gaps(&[], SHORT_GAP_SECS).is_empty());

        let only = reading(1, 42);
        assert_eq!(insert_gaps(&[&only], SHORT_GAP_SECS), vec![SeriesEntry::Reading(&only)]);
    }

    #[test]
    fn test_project_fields_keeps_absent_values() {
        let full = MeasurementRecord::new(7, 0)
            .with_value(Field::Temperature, 0.0)
            .with_value(Field::Humidity, 55.0);
        let partial = MeasurementRecord::new(7, 5000).with_value(Field::Humidity, 56.0);
        let nodes = vec![NodeEntries {
            node_id: 7,
            entries: insert_gaps(&[&full, &partial], SHORT_GAP_SECS),
        }];

        let projected = project_fields(&nodes, &Field::ALL);
        let temperature = projected[&Field::Temperature].get(7).unwrap();

        assert_eq!(
            temperature,
            &vec![
                FieldPoint::new(0, Some(0.0)),
                FieldPoint::new(2500, None),
                FieldPoint::new(5000, None),
            ]
        );
        let humidity = projected[&Field::Humidity].get(7).unwrap();
        assert_eq!(humidity[2].value, Some(56.0));
        assert!(projected[&Field::Humidity].get(8).is_none());
    }
}
