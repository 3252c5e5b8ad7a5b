// Axis stages of the plot reduction: value domains, time ticks and per-field settings
use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike,
};
use std::collections::BTreeMap;

use crate::domain::measurement::{Field, MeasurementRecord};
use crate::domain::plot::{AxisDomain, PlotSettings, TickFormat, TickSpec};

const DOMAIN_PADDING: f64 = 0.1;
const TIME_PADDING: f64 = 0.025;

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;

/// Value-axis range for `field` over the full record list.
///
/// The data range is padded by 10% of its span on each side and then widened
/// to the field's default domain, so the result never hides a reading.
pub fn field_domain(records: &[MeasurementRecord], field: Field) -> AxisDomain {
    let default = field.default_domain();

    let bounds = records
        .iter()
        .filter_map(|r| r.value(field))
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        });

    let Some((data_min, data_max)) = bounds else {
        return default;
    };

    let span = data_max - data_min;
    let padded = AxisDomain::new(
        data_min - DOMAIN_PADDING * span,
        data_max + DOMAIN_PADDING * span,
    );

    default.union(&padded)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlignUnit {
    Hour,
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickStep {
    Minutes(i64),
    Hours(i64),
    Days(u64),
    Months(u32),
}

struct TickRule {
    below: Option<i64>,
    align: AlignUnit,
    step: TickStep,
    format: TickFormat,
}

static TICK_RULES: [TickRule; 7] = [
    TickRule { below: Some(5 * HOUR), align: AlignUnit::Hour, step: TickStep::Minutes(15), format: TickFormat::HourMinute },
    TickRule { below: Some(13 * HOUR), align: AlignUnit::Day, step: TickStep::Hours(1), format: TickFormat::HourMinute },
    TickRule { below: Some(25 * HOUR), align: AlignUnit::Day, step: TickStep::Hours(2), format: TickFormat::HourMinute },
    TickRule { below: Some(4 * DAY), align: AlignUnit::Day, step: TickStep::Hours(6), format: TickFormat::HourMinute },
    TickRule { below: Some(8 * DAY), align: AlignUnit::Day, step: TickStep::Days(1), format: TickFormat::DayMonth },
    TickRule { below: Some(32 * DAY), align: AlignUnit::Month, step: TickStep::Days(2), format: TickFormat::DayMonth },
    TickRule { below: None, align: AlignUnit::Year, step: TickStep::Months(1), format: TickFormat::DayMonth },
];

fn select_rule(duration: i64) -> &'static TickRule {
    TICK_RULES
        .iter()
        .find(|rule| rule.below.is_none_or(|limit| duration < limit))
        .unwrap_or(&TICK_RULES[TICK_RULES.len() - 1])
}

/// Resolve a local wall-clock time, skipping forward over a DST gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
}

fn align_down<Tz: TimeZone>(time: &DateTime<Tz>, unit: AlignUnit) -> Option<DateTime<Tz>> {
    let local = time.naive_local();
    let date = local.date();
    let aligned = match unit {
        AlignUnit::Hour => date.and_hms_opt(local.hour(), 0, 0)?,
        AlignUnit::Day => date.and_hms_opt(0, 0, 0)?,
        AlignUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?,
        AlignUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
    };
    resolve_local(&time.timezone(), aligned)
}

fn advance<Tz: TimeZone>(time: &DateTime<Tz>, step: TickStep) -> Option<DateTime<Tz>> {
    match step {
        TickStep::Minutes(n) => Some(time.clone() + TimeDelta::minutes(n)),
        TickStep::Hours(n) => Some(time.clone() + TimeDelta::hours(n)),
        TickStep::Days(n) => {
            let next = time.naive_local().checked_add_days(Days::new(n))?;
            resolve_local(&time.timezone(), next)
        }
        TickStep::Months(n) => {
            let next = time.naive_local().checked_add_months(Months::new(n))?;
            resolve_local(&time.timezone(), next)
        }
    }
}

/// Time-axis ticks for the span `start..end` (unix seconds), aligned to calendar
/// boundaries in `tz`. Only ticks strictly inside the span are returned.
pub fn plan_ticks<Tz: TimeZone>(start: i64, end: i64, tz: &Tz) -> TickSpec {
    let rule = select_rule(end - start);
    let mut tick_values = Vec::new();

    let mut cursor = DateTime::from_timestamp(start, 0)
        .map(|t| t.with_timezone(tz))
        .and_then(|t| align_down(&t, rule.align));

    while let Some(time) = cursor {
        let ts = time.timestamp();
        if ts > end {
            break;
        }
        if ts > start && ts < end {
            tick_values.push(ts);
        }
        cursor = advance(&time, rule.step).filter(|next| next.timestamp() > ts);
    }

    TickSpec {
        tick_values,
        tick_format: rule.format,
    }
}

/// Time-axis range: the data span padded by 2.5% on each side.
pub fn time_domain(start: i64, end: i64) -> AxisDomain {
    let span = (end - start) as f64;
    AxisDomain::new(
        start as f64 - TIME_PADDING * span,
        end as f64 + TIME_PADDING * span,
    )
}

/// Axis settings for every field. The span runs from the first to the last record.
pub fn build_plot_settings<Tz: TimeZone>(
    records: &[MeasurementRecord],
    tz: &Tz,
) -> BTreeMap<Field, PlotSettings> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return BTreeMap::new();
    };
    let (start, end) = (first.timestamp, last.timestamp);

    let x_domain = time_domain(start, end);
    let ticks = plan_ticks(start, end, tz);
    let battery_domain = field_domain(records, Field::Battery1Level)
        .union(&field_domain(records, Field::Battery2Level));

    Field::ALL
        .into_iter()
        .map(|field| {
            let y_domain = if field.is_battery() {
                battery_domain
            } else {
                field_domain(records, field)
            };
            let settings = PlotSettings {
                x_domain,
                y_domain,
                tick_values: ticks.tick_values.clone(),
                tick_format: ticks.tick_format,
                unit: field.unit(),
                title: field.title(),
            };
            (field, settings)
        })
        .collect()
}
