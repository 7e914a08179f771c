mod common;

use assert_matches::assert_matches;
use bizdash::analytics::Aggregator;
use bizdash::data_ingestion::validator::ValidationError;
use bizdash::data_ingestion::{CsvError, DataLoader, RowErrorPolicy};
use bizdash::domain_types::{BusinessTotals, DateRange, Platform};
use chrono::NaiveDate;
use common::{write_file, BUSINESS_HEADER, MARKETING_HEADER};

#[test]
fn test_business_headers_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &["2024-01-02,80,20,15,8000,3000,5000", "2024-01-01,100,30,25,10000,4000,6000"],
    );

    let loaded = DataLoader::default().load_business(dir.path().join("business.csv")).unwrap();

    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(loaded.records[0].order_count, 100);
    assert_eq!(loaded.report.valid_records, 2);
}

#[test]
fn test_missing_column_names_the_column() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        "date,# of orders,# of new orders,new customers,total revenue,COGS",
        &["2024-01-01,100,30,25,10000,6000"],
    );

    let err = DataLoader::default().load_business(dir.path().join("business.csv")).unwrap_err();
    assert_matches!(err, CsvError::MissingColumn { ref column, .. } if column == "gross_profit");
    assert!(err.to_string().contains("gross_profit"));
}

#[test]
fn test_skip_policy_drops_and_counts_bad_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &[
            "2024-01-01,100,30,25,10000,4000,6000",
            "not-a-date,100,30,25,10000,4000,6000",
            "2024-01-03,abc,30,25,10000,4000,6000",
            "2024-01-04,10,30,5,1000,400,600",
        ],
    );

    let loaded = DataLoader::default().load_business(dir.path().join("business.csv")).unwrap();

    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.report.total_records, 4);
    assert_eq!(loaded.report.dropped_records, 3);
}

#[test]
fn test_fail_policy_aborts_on_first_bad_row() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &["2024-01-01,100,30,25,10000,4000,6000", "2024-01-02,100,30,25,oops,4000,6000"],
    );

    let loader = DataLoader::default().with_policy(RowErrorPolicy::Fail);
    let err = loader.load_business(dir.path().join("business.csv")).unwrap_err();

    assert_matches!(err, CsvError::ParseError { line: 3, ref column, ref value, .. } if column == "total_revenue" && value == "oops");
}

#[test]
fn test_profit_above_revenue_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &["2024-01-01,100,30,25,10000,4000,6000", "2024-01-02,10,3,2,100,150,0"],
    );

    let loaded = DataLoader::default().load_business(dir.path().join("business.csv")).unwrap();

    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.report.dropped_records, 1);
    assert_eq!(loaded.report.error_summary.error_counts.get("InconsistentValue"), Some(&1));
}

#[test]
fn test_profit_above_revenue_fails_under_fail_policy() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &["2024-01-01,100,30,25,10000,4000,6000", "2024-01-02,10,3,2,100,150,0"],
    );

    let loader = DataLoader::default().with_policy(RowErrorPolicy::Fail);
    let err = loader.load_business(dir.path().join("business.csv")).unwrap_err();

    assert_matches!(
        err,
        CsvError::InvalidRow { line: 3, error: ValidationError::InconsistentValue { .. }, .. }
    );
}

#[test]
fn test_oversized_counts_are_rejected_before_summing() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "business.csv",
        BUSINESS_HEADER,
        &[
            "2024-01-01,18446744073709551615,0,0,10000,4000,6000",
            "2024-01-02,18446744073709551615,0,0,10000,4000,6000",
            "2024-01-03,100,30,25,10000,4000,6000",
        ],
    );

    let loaded = DataLoader::default().load_business(dir.path().join("business.csv")).unwrap();
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.report.dropped_records, 2);

    let range = DateRange::new(loaded.records[0].date, loaded.records[0].date).unwrap();
    let totals: BusinessTotals = Aggregator::total(&loaded.records, &range).unwrap();
    assert_eq!(totals.orders, 100);
}

#[test]
fn test_missing_platform_keeps_the_others() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Facebook_clean.csv",
        MARKETING_HEADER,
        &["2024-03-01,Prospecting,CA,Spring,10000,200,500,2000"],
    );
    write_file(
        dir.path(),
        "TikTok_clean.csv",
        MARKETING_HEADER,
        &["2024-03-01,Prospecting,CA,Launch,10000,50,100,300"],
    );

    let load = DataLoader::default().load_marketing_dir(dir.path());

    assert_eq!(load.records.len(), 2);
    let platforms: Vec<Platform> = load.records.iter().map(|r| r.platform).collect();
    assert_eq!(platforms, vec![Platform::Facebook, Platform::TikTok]);
    assert_eq!(load.failures.len(), 1);
    assert_matches!(load.failures[0], (Platform::Google, CsvError::FileNotFound(_)));
}

#[test]
fn test_platform_taken_from_file_name() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Google_clean.csv",
        MARKETING_HEADER,
        &["2024-03-01,Search,CA,Brand,8000,400,1000,1500"],
    );

    let loaded = DataLoader::default()
        .load_marketing_file(dir.path().join("Google_clean.csv"), Platform::Google)
        .unwrap();

    assert_eq!(loaded.records[0].platform, Platform::Google);
    assert_eq!(loaded.records[0].impressions, 8000);
}
