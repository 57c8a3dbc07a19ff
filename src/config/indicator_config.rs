// ==========================================
// 选股辅助函数库 - 指标参数
// ==========================================

use serde::{Deserialize, Serialize};

/// 指标参数 (默认值与 QA 公式常用参数一致)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// ifupMA 均线周期
    pub ma_period: usize,
    /// CHCOUNTS 系列统计窗口
    pub count_window: usize,
    /// FOURWEEK 突破窗口 (m)
    pub fourweek_high: usize,
    /// FOURWEEK 跌破窗口 (n)
    pub fourweek_low: usize,
    /// 首板回看天数
    pub shouban_lookback: usize,
    /// 扫描时向前加载的自然日数
    pub history_days: i64,
    /// getCodeList 返回上限
    pub code_list_count: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_period: 20,
            count_window: 20,
            fourweek_high: 20,
            fourweek_low: 20,
            shouban_lookback: 20,
            history_days: 90,
            code_list_count: 5000,
        }
    }
}

/// config_kv 中的键名
pub mod config_keys {
    pub const MA_PERIOD: &str = "indicator/ma_period";
    pub const COUNT_WINDOW: &str = "indicator/count_window";
    pub const FOURWEEK_HIGH: &str = "indicator/fourweek_high";
    pub const FOURWEEK_LOW: &str = "indicator/fourweek_low";
    pub const SHOUBAN_LOOKBACK: &str = "indicator/shouban_lookback";
    pub const HISTORY_DAYS: &str = "indicator/history_days";
    pub const CODE_LIST_COUNT: &str = "indicator/code_list_count";
}
