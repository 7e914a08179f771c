use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const BUSINESS_HEADER: &str =
    "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS";

pub const MARKETING_HEADER: &str =
    "date,tactic,state,campaign,impression,clicks,spend,attributed revenue";

pub fn write_file(dir: &Path, name: &str, header: &str, rows: &[&str]) {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.join(name), content).unwrap();
}

/// 2024 年 1 月到 3 月，每天 100 筆訂單、營收 10000
pub fn business_rows() -> Vec<String> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..91)
        .map(|i| {
            let date = start + chrono::Duration::days(i);
            format!("{},100,30,25,10000,4000,6000", date)
        })
        .collect()
}

/// 建立含營運數據與三個平台檔案的資料目錄
pub fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let rows = business_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_file(dir.path(), "business.csv", BUSINESS_HEADER, &rows);

    write_file(
        dir.path(),
        "Facebook_clean.csv",
        MARKETING_HEADER,
        &[
            "2024-03-01,Prospecting,CA,Spring,10000,200,500,2000",
            "2024-03-02,Retargeting,NY,Spring,5000,100,250,500",
        ],
    );
    write_file(
        dir.path(),
        "Google_clean.csv",
        MARKETING_HEADER,
        &["2024-03-01,Search,CA,Brand,8000,400,1000,1500"],
    );
    write_file(
        dir.path(),
        "TikTok_clean.csv",
        MARKETING_HEADER,
        &["2024-03-03,Prospecting,TX,Launch,20000,100,0,0"],
    );
    dir
}
