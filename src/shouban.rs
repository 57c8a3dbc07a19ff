// ==========================================
// 选股辅助函数库 - 首板
// ==========================================
// shouban     : 首板信号 (当日收盘涨停, 前 lookback 日无涨停)
// shoubanType : 涨停形态 (一字板 / T字板 / 换手板)
// shoubanData : 指定交易日全市场首板明细
// ==========================================
#![allow(non_snake_case)]

use crate::ch_counts::limit_up_flags;
use crate::domain::{BarSeries, ShoubanRecord, ShoubanType};
use crate::formula::{limit_up_price, price_eq, reaches_limit_up};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// 量比基准周期
const VOLUME_BASE_DAYS: usize = 5;

/// 首板信号
///
/// lookback 为 0 时退化为涨停信号
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn shouban(series: &BarSeries, lookback: usize) -> Vec<bool> {
    let flags = limit_up_flags(series);
    (0..flags.len())
        .map(|i| {
            if !flags[i] {
                return false;
            }
            let from = i.saturating_sub(lookback);
            !flags[from..i].iter().any(|f| *f)
        })
        .collect()
}

/// 涨停形态
///
/// # 返回
/// - None: 下标越界、首根 K 线或当日未收盘涨停
pub fn shoubanType(series: &BarSeries, index: usize) -> Option<ShoubanType> {
    if index == 0 || index >= series.len() {
        return None;
    }

    let bar = &series.bars[index];
    let prev_close = series.bars[index - 1].close;
    let ratio = series.limit_ratio(bar.date);
    if !reaches_limit_up(bar.close, prev_close, ratio) {
        return None;
    }

    let limit = limit_up_price(prev_close, ratio);
    let open_at_limit = price_eq(bar.open, limit);
    let low_at_limit = price_eq(bar.low, limit);

    if open_at_limit && low_at_limit {
        Some(ShoubanType::OneWord)
    } else if open_at_limit {
        Some(ShoubanType::TShape)
    } else {
        Some(ShoubanType::Turnover)
    }
}

/// 指定交易日的首板明细, 按代码排序
///
/// 当日停牌(无 K 线)的证券跳过
#[instrument(skip(universe), fields(universe = universe.len()))]
pub fn shoubanData(universe: &[BarSeries], date: NaiveDate, lookback: usize) -> Vec<ShoubanRecord> {
    let mut records: Vec<ShoubanRecord> = universe
        .iter()
        .filter_map(|series| {
            let idx = series.index_of(date)?;
            if !shouban(series, lookback)[idx] {
                return None;
            }
            let board_type = shoubanType(series, idx)?;
            let bar = &series.bars[idx];
            let prev_close = series.bars[idx - 1].close;

            Some(ShoubanRecord {
                code: series.code.clone(),
                name: series.name.clone(),
                date,
                close: bar.close,
                limit_price: limit_up_price(prev_close, series.limit_ratio(date)),
                board_type,
                volume_ratio: volume_ratio(series, idx),
            })
        })
        .collect();

    records.sort_by(|a, b| a.code.cmp(&b.code));
    debug!(codes = ?records.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(), "首板明细");
    info!(date = %date, count = records.len(), "首板扫描完成");
    records
}

/// 量比: 当日成交量 / 前 5 日均量
fn volume_ratio(series: &BarSeries, idx: usize) -> Option<f64> {
    if idx < VOLUME_BASE_DAYS {
        return None;
    }
    let base: f64 = series.bars[idx - VOLUME_BASE_DAYS..idx]
        .iter()
        .map(|b| b.volume)
        .sum::<f64>()
        / VOLUME_BASE_DAYS as f64;
    if base <= 0.0 {
        return None;
    }
    Some(series.bars[idx].volume / base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::Duration;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 8, 1).unwrap() + Duration::days(i)
    }

    fn flat(i: i64, c: f64) -> Bar {
        Bar::new(day(i), c, c, c, c, 100.0)
    }

    #[test]
    fn test_shouban_only_first_board() {
        let s = BarSeries::new(
            "000001",
            None,
            vec![flat(0, 10.0), flat(1, 11.0), flat(2, 12.1), flat(3, 12.0), flat(4, 13.2)],
        );
        // 第 2 板不是首板; 第 4 日 lookback=2 内有涨停
        assert_eq!(shouban(&s, 2), vec![false, true, false, false, false]);
        // lookback=1 时第 4 日前一日未涨停, 视为首板
        assert_eq!(shouban(&s, 1), vec![false, true, false, false, true]);
        assert_eq!(shouban(&s, 0), vec![false, true, true, false, true]);
    }

    #[test]
    fn test_shouban_type() {
        let s = BarSeries::new(
            "000001",
            None,
            vec![
                flat(0, 10.0),
                Bar::new(day(1), 11.0, 11.0, 11.0, 11.0, 100.0),     // 一字板
                Bar::new(day(2), 12.1, 12.1, 11.5, 12.1, 100.0),     // T字板
                Bar::new(day(3), 12.5, 13.31, 12.2, 13.31, 100.0),   // 换手板
                Bar::new(day(4), 13.5, 14.0, 13.0, 13.8, 100.0),     // 未涨停
            ],
        );
        assert_eq!(shoubanType(&s, 0), None);
        assert_eq!(shoubanType(&s, 1), Some(ShoubanType::OneWord));
        assert_eq!(shoubanType(&s, 2), Some(ShoubanType::TShape));
        assert_eq!(shoubanType(&s, 3), Some(ShoubanType::Turnover));
        assert_eq!(shoubanType(&s, 4), None);
        assert_eq!(shoubanType(&s, 99), None);
    }

    #[test]
    fn test_chinext_first_board_in_2018() {
        // 2018 年创业板 10% 涨停, 一字首板
        let s = BarSeries::new("300004", None, vec![flat(0, 10.0), flat(1, 11.0)]);
        assert_eq!(shouban(&s, 5), vec![false, true]);
        assert_eq!(shoubanType(&s, 1), Some(ShoubanType::OneWord));

        let records = shoubanData(&[s], day(1), 5);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].limit_price, 11.0);
    }

    #[test]
    fn test_st_first_board_five_percent() {
        let name = Some("ST 测试".to_string());
        let s = BarSeries::new("000010", name.clone(), vec![flat(0, 10.0), flat(1, 10.5)]);
        assert_eq!(shouban(&s, 5), vec![false, true]);

        let s = BarSeries::new("000010", name, vec![flat(0, 10.0), flat(1, 10.49)]);
        assert_eq!(shouban(&s, 5), vec![false, false]);
        assert_eq!(shoubanType(&s, 1), None);
    }

    #[test]
    fn test_shouban_data_sorted_with_volume_ratio() {
        let mut bars_b: Vec<Bar> = (0..6).map(|i| flat(i, 10.0)).collect();
        bars_b.push(Bar::new(day(6), 10.2, 11.0, 10.1, 11.0, 300.0));
        let b = BarSeries::new("600002", Some("测试B".to_string()), bars_b);

        let a = BarSeries::new("000009", None, vec![flat(5, 10.0), flat(6, 11.0)]);
        let no_board = BarSeries::new("000005", None, vec![flat(5, 10.0), flat(6, 10.5)]);
        let suspended = BarSeries::new("000007", None, vec![flat(4, 10.0), flat(5, 11.0)]);

        let records = shoubanData(&[b, a, no_board, suspended], day(6), 20);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "000009");
        assert_eq!(records[0].volume_ratio, None);
        assert_eq!(records[0].board_type, ShoubanType::OneWord);
        assert_eq!(records[1].code, "600002");
        assert_eq!(records[1].limit_price, 11.0);
        assert_eq!(records[1].board_type, ShoubanType::Turnover);
        assert_eq!(records[1].volume_ratio, Some(3.0));
    }
}
