// ==========================================
// 选股辅助函数库 - 证券代码列表
// ==========================================
// getCodeList: 按来源取证券代码, 截取前 count 个
// - Testing  : 2018 年 8 月首板个股, 减少调试时间
// - File     : 证券列表文件 (.csv/.xlsx/.xls)
// - Database : stock_list 表
// ==========================================
#![allow(non_snake_case)]

use crate::domain::{is_valid_code, StockInfo};
use crate::importer::{read_stock_list, ImportError};
use crate::repository::{MarketDataRepository, RepositoryError};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// 返回代码数量上限
pub const MAX_CODE_COUNT: usize = 5000;

/// 测试用代码 (2018 年 8 月首板个股)
const TESTING_CODES: &[&str] = &[
    "000023", "000068", "000407", "000561", "000590", "000593", "000608", "000610", "000626",
    "000638", "000657", "000659", "000663", "000669", "000677", "000705", "000759", "000766",
    "000780", "000792", "000815", "000852", "000885", "000909", "000913", "000921", "000928",
    "000931", "000950", "000953", "000966", "000972", "000979", "000981", "002005", "002006",
    "002008", "002011", "002018", "002022", "002035", "002040", "002042", "002047", "002049",
    "002052", "002053", "002057", "002061", "002064", "002070", "002072", "002076", "002084",
    "002092", "002096", "002099", "002103", "002105", "002109", "002112", "002113", "002121",
    "002123", "002124", "002125", "300004", "300009", "300013", "300020", "300022", "300029",
    "600119", "600132", "600180", "600186", "600193", "600200", "600215", "600228", "600234",
    "600240", "600243", "600247", "600255", "600259", "600265", "600271", "600272", "600281",
    "600282", "600290", "600302", "600311", "600318", "600333", "600354", "600365", "600367",
    "600375", "600381",
];

/// 代码列表来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeListSource {
    Testing,
    File(PathBuf),
    Database(String),
}

/// 代码列表错误
#[derive(Error, Debug)]
pub enum CodeListError {
    #[error("证券列表文件读取失败: {0}")]
    Import(#[from] ImportError),

    #[error("证券列表查询失败: {0}")]
    Repository(#[from] RepositoryError),
}

/// 获取证券代码列表
///
/// - count 截断到 MAX_CODE_COUNT
/// - 非 6 位数字代码跳过, 重复代码保留首次出现
/// - 退市整理期证券 (名称含"退") 跳过
#[instrument]
pub fn getCodeList(source: &CodeListSource, count: usize) -> Result<Vec<String>, CodeListError> {
    let count = count.min(MAX_CODE_COUNT);

    let stocks: Vec<StockInfo> = match source {
        CodeListSource::Testing => TESTING_CODES
            .iter()
            .map(|c| StockInfo {
                code: c.to_string(),
                name: String::new(),
                list_date: None,
            })
            .collect(),
        CodeListSource::File(path) => read_stock_list(path)?.0,
        CodeListSource::Database(db_path) => MarketDataRepository::new(db_path)?.list_stocks()?,
    };

    let mut seen = HashSet::new();
    let mut codes = Vec::new();
    for stock in stocks {
        if codes.len() >= count {
            break;
        }
        if !is_valid_code(&stock.code) {
            warn!(code = %stock.code, "证券代码无效, 跳过");
            continue;
        }
        if stock.is_delisted() {
            debug!(code = %stock.code, name = %stock.name, "退市整理期, 跳过");
            continue;
        }
        if seen.insert(stock.code.clone()) {
            codes.push(stock.code);
        }
    }

    debug!(count = codes.len(), "代码列表获取完成");
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_testing_source_truncates() {
        let codes = getCodeList(&CodeListSource::Testing, 5).unwrap();
        assert_eq!(codes, vec!["000023", "000068", "000407", "000561", "000590"]);

        let all = getCodeList(&CodeListSource::Testing, usize::MAX).unwrap();
        assert_eq!(all.len(), TESTING_CODES.len());
        assert!(getCodeList(&CodeListSource::Testing, 0).unwrap().is_empty());
    }

    #[test]
    fn test_file_source_filters() {
        let mut f = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(f, "code,name").unwrap();
        writeln!(f, "000001,平安银行").unwrap();
        writeln!(f, "XYZ,无效").unwrap();
        writeln!(f, "600087,退市长油").unwrap();
        writeln!(f, "1,平安银行").unwrap();
        writeln!(f, "600000,浦发银行").unwrap();

        let codes = getCodeList(&CodeListSource::File(f.path().to_path_buf()), 100).unwrap();
        assert_eq!(codes, vec!["000001", "600000"]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = getCodeList(&CodeListSource::File(PathBuf::from("missing.csv")), 10).unwrap_err();
        assert!(matches!(err, CodeListError::Import(ImportError::FileNotFound(_))));
    }
}
