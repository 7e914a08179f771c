// 模組定義
pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod data_ingestion;
pub mod domain_types;
pub mod presentation;
pub mod session;
