// ==========================================
// 选股辅助函数库 - 涨跌停计数 / 四周规则
// ==========================================
// CHCOUNTS  : N 日内涨停次数
// CHCOUNTS2 : N 日内跌停次数
// CHCOUNTS3 : N 日内炸板次数 (最高触及涨停, 收盘未封住)
// FOURWEEK  : 四周规则 (突破 M 日最高做多, 跌破 N 日最低离场)
// ==========================================
#![allow(non_snake_case)]

use crate::domain::{Bar, BarSeries, FourWeekState};
use crate::formula::{count_true, hhv, llv, reaches_limit_down, reaches_limit_up};
use tracing::{debug, instrument};

/// 收盘涨停标记 (首根 K 线无昨收, 恒为 false)
pub(crate) fn limit_up_flags(series: &BarSeries) -> Vec<bool> {
    flags_with_prev(series, |bar, prev_close, ratio| {
        reaches_limit_up(bar.close, prev_close, ratio)
    })
}

/// 收盘跌停标记
pub(crate) fn limit_down_flags(series: &BarSeries) -> Vec<bool> {
    flags_with_prev(series, |bar, prev_close, ratio| {
        reaches_limit_down(bar.close, prev_close, ratio)
    })
}

/// 炸板标记: 最高价触及涨停, 收盘未涨停
pub(crate) fn broken_board_flags(series: &BarSeries) -> Vec<bool> {
    flags_with_prev(series, |bar, prev_close, ratio| {
        reaches_limit_up(bar.high, prev_close, ratio)
            && !reaches_limit_up(bar.close, prev_close, ratio)
    })
}

/// 逐根 K 线判定, 幅度取当根 K 线交易日的规则
fn flags_with_prev<F>(series: &BarSeries, pred: F) -> Vec<bool>
where
    F: Fn(&Bar, f64, f64) -> bool,
{
    let bars = &series.bars;
    (0..bars.len())
        .map(|i| i > 0 && pred(&bars[i], bars[i - 1].close, series.limit_ratio(bars[i].date)))
        .collect()
}

/// N 日内涨停次数
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn CHCOUNTS(series: &BarSeries, n: usize) -> Vec<u32> {
    let counts = count_true(&limit_up_flags(series), n);
    debug!(last = ?counts.last(), "涨停计数完成");
    counts
}

/// N 日内跌停次数
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn CHCOUNTS2(series: &BarSeries, n: usize) -> Vec<u32> {
    count_true(&limit_down_flags(series), n)
}

/// N 日内炸板次数
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn CHCOUNTS3(series: &BarSeries, n: usize) -> Vec<u32> {
    count_true(&broken_board_flags(series), n)
}

/// 四周规则
///
/// - 收盘价 > 前 m 日最高价 → Long
/// - 收盘价 < 前 n 日最低价 → Short
/// - 其他情况沿用上一状态, 首个信号前为 Flat
///
/// m 或 n 为 0 时对应方向不产生信号
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn FOURWEEK(series: &BarSeries, m: usize, n: usize) -> Vec<FourWeekState> {
    let highest = hhv(&series.highs(), m);
    let lowest = llv(&series.lows(), n);
    let mut out = Vec::with_capacity(series.len());
    let mut state = FourWeekState::Flat;

    for (i, bar) in series.bars.iter().enumerate() {
        // 前 m / n 日 (不含当日)
        let prev_high = if i > 0 { highest[i - 1] } else { None };
        let prev_low = if i > 0 { lowest[i - 1] } else { None };

        if prev_high.is_some_and(|h| bar.close > h) {
            state = FourWeekState::Long;
        }
        if prev_low.is_some_and(|l| bar.close < l) {
            state = FourWeekState::Short;
        }
        out.push(state);
    }

    out
}
