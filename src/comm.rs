// ==========================================
// 选股辅助函数库 - 通用判断
// ==========================================
#![allow(non_snake_case)]

use crate::domain::BarSeries;
use crate::formula::{ma, ref_n};
use tracing::instrument;

/// 均线是否向上: MA(C, N) > REF(MA(C, N), 1)
///
/// 两日均线任一不可得时为 None
#[instrument(skip(series), fields(code = %series.code, len = series.len()))]
pub fn ifupMA(series: &BarSeries, n: usize) -> Vec<Option<bool>> {
    let ma_n = ma(&series.closes(), n);
    let prev = ref_n(&ma_n, 1);
    ma_n.iter()
        .zip(prev)
        .map(|(cur, prev)| match (cur, prev.flatten()) {
            (Some(c), Some(p)) => Some(*c > p),
            _ => None,
        })
        .collect()
}
