//! CSV 檔案讀取與處理模組

pub mod error;
pub mod parser;
pub mod reader;
pub mod schema;

pub use error::{CsvError, CsvResult};
pub use parser::CsvParser;
pub use reader::{CsvReader, CsvReaderConfig, RawRow, RawTable};
pub use schema::{ColumnIndex, ColumnSpec, Schema};
