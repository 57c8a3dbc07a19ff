// ==========================================
// 选股辅助函数库 - 领域层
// ==========================================
// 职责: 日线/证券/信号等领域实体与类型
// ==========================================

pub mod bar;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use bar::{Bar, BarSeries, ShoubanRecord};
pub use stock::{is_valid_code, StockInfo};
pub use types::{Board, FourWeekState, ShoubanType, CHINEXT_20PCT_FROM};
