// ==========================================
// 选股辅助函数库 - 引擎层
// ==========================================
// 职责: 组合指标函数完成选股流程
// 红线: Engine 不拼 SQL
// ==========================================

pub mod screener;

// 重导出核心引擎
pub use screener::{ScreenRow, ScreenerError, ShoubanScreener};
