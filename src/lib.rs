// ==========================================
// 选股辅助函数库 - 核心库
// ==========================================
// 统一入口: user_func (getCodeList / CHCOUNTS* / FOURWEEK / shouban* / ifupMA)
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 公式基础函数 (MA/REF/HHV/LLV/COUNT)
pub mod formula;

// 指标函数 (各自独立, 由 user_func 统一导出)
pub mod ch_counts;
pub mod comm;
pub mod my_function;
pub mod shouban;

// 统一入口
pub mod user_func;

// 导出清单 (运行期绑定表)
pub mod manifest;

// 数据库基础设施
pub mod db;

// 数据仓储层
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层
pub mod config;

// 引擎层
pub mod engine;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, IndicatorConfig};
pub use domain::{Bar, BarSeries, Board, FourWeekState, ShoubanRecord, ShoubanType, StockInfo};
pub use engine::{ScreenRow, ShoubanScreener};
pub use manifest::{LoadError, Manifest};
pub use my_function::{CodeListError, CodeListSource};
pub use repository::MarketDataRepository;

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
