// ==========================================
// 选股辅助函数库 - 领域类型定义
// ==========================================
// 涨跌停幅度按板块区分, ST 股单独处理
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 创业板注册制首日 (2020-08-24), 当日起涨跌幅 20%, 此前与主板相同
pub const CHINEXT_20PCT_FROM: (i32, u32, u32) = (2020, 8, 24);

// ==========================================
// 板块 (Board)
// ==========================================
// 由证券代码前缀判定, 决定涨跌停幅度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Board {
    MainBoard, // 沪深主板
    ChiNext,   // 创业板 (300/301)
    Star,      // 科创板 (688/689)
    Beijing,   // 北交所 (4/8/92)
}

impl Board {
    /// 根据证券代码判定板块
    pub fn from_code(code: &str) -> Self {
        if code.starts_with("300") || code.starts_with("301") {
            Board::ChiNext
        } else if code.starts_with("688") || code.starts_with("689") {
            Board::Star
        } else if code.starts_with("92") || code.starts_with('4') || code.starts_with('8') {
            Board::Beijing
        } else {
            Board::MainBoard
        }
    }

    /// 指定交易日的涨跌停幅度
    ///
    /// ST 仅影响主板 (5%), 注册制板块维持原幅度;
    /// 创业板在 CHINEXT_20PCT_FROM 之前按主板规则
    pub fn limit_ratio(&self, is_st: bool, date: NaiveDate) -> f64 {
        match self {
            Board::ChiNext if !chinext_registered(date) => Board::MainBoard.limit_ratio(is_st, date),
            Board::MainBoard if is_st => 0.05,
            Board::MainBoard => 0.10,
            Board::ChiNext | Board::Star => 0.20,
            Board::Beijing => 0.30,
        }
    }
}

fn chinext_registered(date: NaiveDate) -> bool {
    (date.year(), date.month(), date.day()) >= CHINEXT_20PCT_FROM
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::MainBoard => write!(f, "MAIN_BOARD"),
            Board::ChiNext => write!(f, "CHI_NEXT"),
            Board::Star => write!(f, "STAR"),
            Board::Beijing => write!(f, "BEIJING"),
        }
    }
}

// ==========================================
// 首板类型 (Shouban Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShoubanType {
    OneWord,  // 一字板: 开高低收均为涨停价
    TShape,   // T字板: 开盘=收盘=涨停价, 盘中打开
    Turnover, // 换手板: 其他收盘涨停
}

impl fmt::Display for ShoubanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoubanType::OneWord => write!(f, "ONE_WORD"),
            ShoubanType::TShape => write!(f, "T_SHAPE"),
            ShoubanType::Turnover => write!(f, "TURNOVER"),
        }
    }
}

// ==========================================
// 四周规则状态 (Four Week State)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FourWeekState {
    Long,  // 突破 m 日最高, 持有
    Short, // 跌破 n 日最低, 空仓
    Flat,  // 尚无信号
}

impl fmt::Display for FourWeekState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FourWeekState::Long => write!(f, "LONG"),
            FourWeekState::Short => write!(f, "SHORT"),
            FourWeekState::Flat => write!(f, "FLAT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_code() {
        assert_eq!(Board::from_code("000001"), Board::MainBoard);
        assert_eq!(Board::from_code("600519"), Board::MainBoard);
        assert_eq!(Board::from_code("300750"), Board::ChiNext);
        assert_eq!(Board::from_code("301001"), Board::ChiNext);
        assert_eq!(Board::from_code("688981"), Board::Star);
        assert_eq!(Board::from_code("830799"), Board::Beijing);
        assert_eq!(Board::from_code("920001"), Board::Beijing);
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_limit_ratio() {
        let today = d(2024, 1, 2);
        assert_eq!(Board::MainBoard.limit_ratio(false, today), 0.10);
        assert_eq!(Board::MainBoard.limit_ratio(true, today), 0.05);
        assert_eq!(Board::ChiNext.limit_ratio(true, today), 0.20);
        assert_eq!(Board::Star.limit_ratio(false, today), 0.20);
        assert_eq!(Board::Beijing.limit_ratio(false, today), 0.30);
    }

    #[test]
    fn test_chinext_ratio_switches_on_registration_day() {
        assert_eq!(Board::ChiNext.limit_ratio(false, d(2018, 8, 1)), 0.10);
        assert_eq!(Board::ChiNext.limit_ratio(true, d(2018, 8, 1)), 0.05);
        assert_eq!(Board::ChiNext.limit_ratio(false, d(2020, 8, 21)), 0.10);
        assert_eq!(Board::ChiNext.limit_ratio(false, d(2020, 8, 24)), 0.20);
        assert_eq!(Board::ChiNext.limit_ratio(true, d(2020, 8, 24)), 0.20);
    }
}
