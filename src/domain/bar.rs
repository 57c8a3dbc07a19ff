// ==========================================
// 选股辅助函数库 - 日线数据
// ==========================================
// BarSeries: 单只证券按日期升序排列的日线序列
// ==========================================

use crate::domain::types::{Board, ShoubanType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 日线 K 线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount: 0.0,
        }
    }
}

/// 单只证券的日线序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub code: String,
    pub name: Option<String>,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// 创建序列, 按日期升序整理
    pub fn new(code: impl Into<String>, name: Option<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            code: code.into(),
            name,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 名称包含 ST (含 *ST) 视为 ST 股
    pub fn is_st(&self) -> bool {
        self.name
            .as_deref()
            .map(|n| n.to_uppercase().contains("ST"))
            .unwrap_or(false)
    }

    pub fn board(&self) -> Board {
        Board::from_code(&self.code)
    }

    /// 指定交易日的涨跌停幅度
    pub fn limit_ratio(&self, date: NaiveDate) -> f64 {
        self.board().limit_ratio(self.is_st(), date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// 查找指定日期的下标
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }
}

/// 首板明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoubanRecord {
    pub code: String,
    pub name: Option<String>,
    pub date: NaiveDate,
    pub close: f64,
    pub limit_price: f64,
    pub board_type: ShoubanType,
    /// 当日成交量 / 前 5 日均量
    pub volume_ratio: Option<f64>,
}
