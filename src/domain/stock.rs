// ==========================================
// 选股辅助函数库 - 证券列表
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 证券基本信息 (stock_list 表)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub code: String,
    pub name: String,
    pub list_date: Option<NaiveDate>,
}

impl StockInfo {
    /// 退市整理期证券 (名称含"退")
    pub fn is_delisted(&self) -> bool {
        self.name.contains('退')
    }
}

/// 证券代码校验: 6 位 ASCII 数字
pub fn is_valid_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("000001"));
        assert!(!is_valid_code("00001"));
        assert!(!is_valid_code("SH600000"));
        assert!(!is_valid_code("60000１"));
    }
}
