// ==========================================
// 选股辅助函数库 - 字段映射
// ==========================================
// 职责: 原始记录 → StockInfo / (代码, Bar)
// 表头同时接受中文 (通达信/同花顺导出) 与英文 (QA 导出) 别名
// ==========================================

use crate::domain::{is_valid_code, Bar, StockInfo};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::NaiveDate;

const CODE_ALIASES: &[&str] = &["code", "代码", "证券代码", "股票代码"];
const NAME_ALIASES: &[&str] = &["name", "名称", "证券名称", "股票名称"];
const LIST_DATE_ALIASES: &[&str] = &["list_date", "上市日期"];
const DATE_ALIASES: &[&str] = &["date", "日期", "交易日期"];
const OPEN_ALIASES: &[&str] = &["open", "开盘", "开盘价"];
const HIGH_ALIASES: &[&str] = &["high", "最高", "最高价"];
const LOW_ALIASES: &[&str] = &["low", "最低", "最低价"];
const CLOSE_ALIASES: &[&str] = &["close", "收盘", "收盘价"];
const VOLUME_ALIASES: &[&str] = &["volume", "vol", "成交量"];
const AMOUNT_ALIASES: &[&str] = &["amount", "成交额"];

pub struct FieldMapper;

impl FieldMapper {
    /// 映射证券列表记录
    ///
    /// 代码缺失或非法的行返回错误, 由调用方决定跳过还是中止
    pub fn map_stock_info(&self, row: usize, record: &RawRecord) -> ImportResult<StockInfo> {
        let code = self.required(record, CODE_ALIASES, "code")?;
        let code = normalize_code(row, code)?;
        let name = lookup(record, NAME_ALIASES).unwrap_or_default().to_string();
        let list_date = match lookup(record, LIST_DATE_ALIASES) {
            Some(v) if !v.is_empty() => Some(parse_date(row, "list_date", v)?),
            _ => None,
        };

        Ok(StockInfo {
            code,
            name,
            list_date,
        })
    }

    /// 映射日线记录, 返回 (代码, Bar)
    pub fn map_bar(&self, row: usize, record: &RawRecord) -> ImportResult<(String, Bar)> {
        let code = normalize_code(row, self.required(record, CODE_ALIASES, "code")?)?;
        let date = parse_date(row, "date", self.required(record, DATE_ALIASES, "date")?)?;

        let bar = Bar {
            date,
            open: self.number(row, record, OPEN_ALIASES, "open")?,
            high: self.number(row, record, HIGH_ALIASES, "high")?,
            low: self.number(row, record, LOW_ALIASES, "low")?,
            close: self.number(row, record, CLOSE_ALIASES, "close")?,
            volume: self.number(row, record, VOLUME_ALIASES, "volume")?,
            amount: match lookup(record, AMOUNT_ALIASES) {
                Some(v) if !v.is_empty() => parse_f64(row, "amount", v)?,
                _ => 0.0,
            },
        };

        Ok((code, bar))
    }

    fn required<'a>(
        &self,
        record: &'a RawRecord,
        aliases: &[&str],
        field: &str,
    ) -> ImportResult<&'a str> {
        lookup(record, aliases).ok_or_else(|| ImportError::MissingColumn(field.to_string()))
    }

    fn number(
        &self,
        row: usize,
        record: &RawRecord,
        aliases: &[&str],
        field: &str,
    ) -> ImportResult<f64> {
        parse_f64(row, field, self.required(record, aliases, field)?)
    }
}

fn lookup<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|a| record.get(*a))
        .map(|s| s.as_str())
}

/// 代码规范化: 去掉市场前缀/后缀, 数字代码左补零到 6 位
fn normalize_code(row: usize, raw: &str) -> ImportResult<String> {
    let trimmed = raw.trim();
    let digits: &str = trimmed
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .split('.')
        .next()
        .unwrap_or("");

    let code = if !digits.is_empty() && digits.len() < 6 && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:0>6}", digits)
    } else {
        digits.to_string()
    };

    if !is_valid_code(&code) {
        return Err(ImportError::InvalidCode {
            row,
            value: raw.to_string(),
        });
    }
    Ok(code)
}

fn parse_date(row: usize, field: &str, value: &str) -> ImportResult<NaiveDate> {
    let v = value.trim();
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(v, "%Y%m%d"))
        .or_else(|_| NaiveDate::parse_from_str(v, "%Y/%m/%d"))
        .map_err(|_| ImportError::DateFormatError {
            row,
            field: field.to_string(),
            value: v.to_string(),
        })
}

fn parse_f64(row: usize, field: &str, value: &str) -> ImportResult<f64> {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_stock_info_chinese_headers() {
        let r = record(&[("代码", "1"), ("名称", "平安银行"), ("上市日期", "19910403")]);
        let info = FieldMapper.map_stock_info(1, &r).unwrap();
        assert_eq!(info.code, "000001");
        assert_eq!(info.name, "平安银行");
        assert_eq!(info.list_date, NaiveDate::from_ymd_opt(1991, 4, 3));
    }

    #[test]
    fn test_normalize_code_prefix_and_suffix() {
        assert_eq!(normalize_code(1, "SH600000").unwrap(), "600000");
        assert_eq!(normalize_code(1, "000001.SZ").unwrap(), "000001");
        assert!(matches!(
            normalize_code(3, "ABC"),
            Err(ImportError::InvalidCode { row: 3, .. })
        ));
    }

    #[test]
    fn test_map_bar_english_headers() {
        let r = record(&[
            ("code", "600000"),
            ("date", "2018-08-01"),
            ("open", "10.0"),
            ("high", "11.0"),
            ("low", "9.9"),
            ("close", "11.0"),
            ("vol", "1,200"),
        ]);
        let (code, bar) = FieldMapper.map_bar(1, &r).unwrap();
        assert_eq!(code, "600000");
        assert_eq!(bar.volume, 1200.0);
        assert_eq!(bar.amount, 0.0);
    }

    #[test]
    fn test_map_bar_errors() {
        let missing = record(&[("code", "600000"), ("date", "2018-08-01")]);
        assert!(matches!(
            FieldMapper.map_bar(2, &missing),
            Err(ImportError::MissingColumn(f)) if f == "open"
        ));

        let bad_date = record(&[("code", "600000"), ("date", "2018.08.01")]);
        assert!(matches!(
            FieldMapper.map_bar(5, &bad_date),
            Err(ImportError::DateFormatError { row: 5, .. })
        ));
    }
}
