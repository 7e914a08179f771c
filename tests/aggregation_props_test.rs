use bizdash::analytics::metrics::{profit_margin, roas};
use bizdash::analytics::{AggregationConfig, Aggregator};
use bizdash::domain_types::{
    AggregatedPeriod, BusinessRecord, BusinessTotals, DateRange, Granularity,
};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()
}

fn full_range() -> DateRange {
    DateRange::new(start(), start() + Duration::days(400)).unwrap()
}

// 營收取整數，避免浮點加總順序造成誤差
fn records_strategy() -> impl Strategy<Value = Vec<BusinessRecord>> {
    prop::collection::btree_set(0i64..400, 1..120).prop_flat_map(|days: BTreeSet<i64>| {
        let days: Vec<i64> = days.into_iter().collect();
        let n = days.len();
        prop::collection::vec((1u64..500, 0u64..20_000), n).prop_map(move |values| {
            days.iter()
                .zip(values)
                .map(|(offset, (orders, revenue))| BusinessRecord {
                    date: start() + Duration::days(*offset),
                    order_count: orders,
                    new_order_count: orders / 3,
                    new_customers: orders / 4,
                    total_revenue: revenue as f64,
                    gross_profit: (revenue / 2) as f64,
                    cogs: (revenue - revenue / 2) as f64,
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn monthly_buckets_sum_their_days(records in records_strategy()) {
        let config = AggregationConfig::new(full_range(), Granularity::Month);
        let months: Vec<AggregatedPeriod<BusinessTotals>> = Aggregator::aggregate(&records, &config).unwrap();

        for month in &months {
            prop_assert_eq!(month.period_start.day(), 1);
            let expected: f64 = records
                .iter()
                .filter(|r| (r.date.year(), r.date.month()) == (month.period_start.year(), month.period_start.month()))
                .map(|r| r.total_revenue)
                .sum();
            prop_assert_eq!(month.totals.revenue, expected);
        }

        let total: BusinessTotals = Aggregator::total(&records, &full_range()).unwrap();
        let orders: u64 = months.iter().map(|m| m.totals.orders).sum();
        prop_assert_eq!(orders, total.orders);
        prop_assert_eq!(total.days, records.len());
    }

    #[test]
    fn daily_reaggregation_is_identity(records in records_strategy()) {
        let config = AggregationConfig::new(full_range(), Granularity::Day);
        let daily: Vec<AggregatedPeriod<BusinessTotals>> = Aggregator::aggregate(&records, &config).unwrap();
        let again: Vec<AggregatedPeriod<BusinessTotals>> = Aggregator::aggregate(&daily, &config).unwrap();
        prop_assert_eq!(daily, again);
    }

    #[test]
    fn weekly_buckets_start_on_monday(records in records_strategy()) {
        let config = AggregationConfig::new(full_range(), Granularity::Week);
        let weeks: Vec<AggregatedPeriod<BusinessTotals>> = Aggregator::aggregate(&records, &config).unwrap();

        for week in &weeks {
            prop_assert_eq!(week.period_start.weekday(), Weekday::Mon);
        }
        let days: usize = weeks.iter().map(|w| w.totals.days).sum();
        prop_assert_eq!(days, records.len());
    }

    #[test]
    fn zero_denominators_are_not_available(numerator in 0.0f64..1e9) {
        prop_assert!(roas(numerator, 0.0).value().is_none());
        prop_assert!(profit_margin(numerator, 0.0).value().is_none());
        prop_assert_eq!(roas(numerator, 0.0).to_string(), "N/A");
    }
}
