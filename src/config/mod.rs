// ==========================================
// 选股辅助函数库 - 配置层
// ==========================================
// 职责: 指标参数默认值 + config_kv 覆写
// ==========================================

pub mod config_manager;
pub mod indicator_config;

// 重导出核心配置管理器
pub use config_manager::ConfigManager;
pub use indicator_config::{config_keys, IndicatorConfig};
