use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use crate::models::activity::Activity;
use crate::models::summary::{DailyTotal, Summary};

/// Sums every activity dated at or after `period_start`.
pub fn aggregate(activities: &[Activity], period_start: DateTime<Utc>) -> Summary {
    activities
        .iter()
        .filter(|activity| activity.date >= period_start)
        .fold(Summary::default(), |mut summary, activity| {
            let usage = activity.usage();
            let emissions = activity.emissions();

            summary.total_activities += 1;
            summary.total_co2 += emissions.total;
            summary.electricity.add(usage.electricity, emissions.electricity);
            summary.water.add(usage.water, emissions.water);
            summary.gas.add(usage.gas, emissions.gas);
            summary.waste.add(usage.waste, emissions.waste);
            summary.transport.add(usage.transport_distance, emissions.transport);
            summary
        })
}

/// Total CO2 per calendar day in `tz`, for the `days` days ending on `end_day`.
/// Oldest day first; days without activities report zero.
pub fn daily_trend<Tz: TimeZone>(
    activities: &[Activity],
    end_day: NaiveDate,
    days: u32,
    tz: &Tz,
) -> Vec<DailyTotal> {
    let mut per_day: HashMap<NaiveDate, f64> = HashMap::new();
    for activity in activities {
        let day = activity.date.with_timezone(tz).date_naive();
        *per_day.entry(day).or_default() += activity.emissions().total;
    }

    (0..days)
        .rev()
        .map(|back| {
            let date = end_day - Duration::days(i64::from(back));
            DailyTotal {
                date,
                total_co2: per_day.get(&date).copied().unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{TransportMode, Usage};
    use chrono::FixedOffset;
    use uuid::Uuid;

    fn at(date: &str, usage: Usage) -> Activity {
        let date = DateTime::parse_from_rfc3339(date).unwrap().with_timezone(&Utc);
        Activity::new(Uuid::new_v4(), Uuid::new_v4(), date, usage, date, date)
    }

    fn worked_example(date: &str) -> Activity {
        at(
            date,
            Usage {
                electricity: 10.0,
                water: 100.0,
                transport_mode: TransportMode::Car,
                transport_distance: 20.0,
                ..Usage::default()
            },
        )
    }

    fn gas_only(date: &str, gas: f64) -> Activity {
        at(date, Usage { gas, ..Usage::default() })
    }

    fn start(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_set_is_all_zero() {
        let summary = aggregate(&[], start("2024-05-01T00:00:00Z"));
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.total_activities, 0);
        assert_eq!(summary.total_co2, 0.0);
    }

    #[test]
    fn activities_before_start_are_excluded() {
        let activities = vec![
            worked_example("2024-04-29T10:00:00Z"),
            gas_only("2024-04-30T23:59:59Z", 3.0),
        ];
        assert_eq!(aggregate(&activities, start("2024-05-01T00:00:00Z")), Summary::default());
    }

    #[test]
    fn start_boundary_is_inclusive() {
        let activities = vec![gas_only("2024-05-01T00:00:00Z", 1.0)];
        let summary = aggregate(&activities, start("2024-05-01T00:00:00Z"));
        assert_eq!(summary.total_activities, 1);
        assert_eq!(summary.gas.total, 1.0);
        assert_eq!(summary.gas.co2, 2.0);
    }

    #[test]
    fn sums_both_activities_in_period() {
        let activities = vec![
            worked_example("2024-05-02T09:00:00Z"),
            gas_only("2024-05-03T09:00:00Z", 1.0),
            gas_only("2024-04-01T09:00:00Z", 50.0),
        ];
        let summary = aggregate(&activities, start("2024-05-01T00:00:00Z"));

        assert_eq!(summary.total_activities, 2);
        assert!(approx(summary.total_co2, 11.03));
        assert_eq!(summary.electricity.total, 10.0);
        assert_eq!(summary.electricity.co2, 5.0);
        assert_eq!(summary.water.total, 100.0);
        assert!(approx(summary.water.co2, 0.03));
        assert_eq!(summary.gas.total, 1.0);
        assert_eq!(summary.gas.co2, 2.0);
        assert_eq!(summary.waste, Default::default());
        assert_eq!(summary.transport.total, 20.0);
        assert_eq!(summary.transport.co2, 4.0);
    }

    #[test]
    fn order_does_not_change_result() {
        let mut activities = vec![
            worked_example("2024-05-02T09:00:00Z"),
            gas_only("2024-05-03T09:00:00Z", 1.5),
            gas_only("2024-05-04T09:00:00Z", 0.5),
        ];
        let from = start("2024-05-01T00:00:00Z");
        let forward = aggregate(&activities, from);
        activities.reverse();
        let backward = aggregate(&activities, from);

        assert_eq!(forward.total_activities, backward.total_activities);
        assert!(approx(forward.total_co2, backward.total_co2));
        assert!(approx(forward.gas.co2, backward.gas.co2));
    }

    #[test]
    fn trend_zero_fills_and_orders_oldest_first() {
        let activities = vec![
            gas_only("2024-05-10T08:00:00Z", 1.0),
            gas_only("2024-05-10T20:00:00Z", 2.0),
            gas_only("2024-05-12T12:00:00Z", 0.5),
            gas_only("2024-04-01T12:00:00Z", 100.0),
        ];
        let end = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        let trend = daily_trend(&activities, end, 4, &Utc);

        let days: Vec<_> = trend.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(days, ["2024-05-09", "2024-05-10", "2024-05-11", "2024-05-12"]);
        let totals: Vec<_> = trend.iter().map(|d| d.total_co2).collect();
        assert_eq!(totals, [0.0, 6.0, 0.0, 1.0]);
    }

    #[test]
    fn trend_buckets_by_local_day() {
        let activities = vec![gas_only("2024-05-10T20:00:00Z", 1.0)];
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        let trend = daily_trend(&activities, end, 2, &tokyo);

        assert_eq!(trend[0].total_co2, 0.0);
        assert_eq!(trend[1].total_co2, 2.0);
    }

    #[test]
    fn trend_with_zero_days_is_empty() {
        let end = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert!(daily_trend(&[], end, 0, &Utc).is_empty());
    }
}
