// ==========================================
// 选股辅助函数库 - 导入层
// ==========================================
// 职责: 外部文件 (证券列表/日线) 导入
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod market_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
pub use market_importer::{read_bars, read_stock_list, ImportSummary, MarketImporter};
