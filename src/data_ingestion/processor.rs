pub mod cleaner;
pub mod csv_io;
pub mod data_loader;
pub mod exporter;

pub use cleaner::{CleanSummary, PlatformCleaner};
pub use csv_io::{CsvError, CsvParser, CsvReader, CsvReaderConfig, CsvResult};
pub use data_loader::{DataLoader, Loaded, MarketingLoad, RowErrorPolicy};
pub use exporter::CsvExporter;
