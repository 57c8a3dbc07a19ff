// ==========================================
// 选股辅助函数库 - 公式基础函数
// ==========================================
// 对应通达信/QA 公式: MA, REF, HHV, LLV, COUNT
// 所有输出与输入序列等长, 数据不足处为 None
// ==========================================

/// 价格保留两位小数 (四舍五入)
///
/// 加一个极小量抵消浮点误差, 如 10.05 * 1.1 = 11.054999...
pub fn round2(value: f64) -> f64 {
    ((value * 100.0) + 1e-6).round() / 100.0
}

/// 涨停价
pub fn limit_up_price(prev_close: f64, ratio: f64) -> f64 {
    round2(prev_close * (1.0 + ratio))
}

/// 跌停价
pub fn limit_down_price(prev_close: f64, ratio: f64) -> f64 {
    round2(prev_close * (1.0 - ratio))
}

/// 价格比较容差 (半分钱)
const PRICE_EPS: f64 = 0.005;

/// 是否触及(或超过)涨停价
pub fn reaches_limit_up(price: f64, prev_close: f64, ratio: f64) -> bool {
    prev_close > 0.0 && price >= limit_up_price(prev_close, ratio) - PRICE_EPS
}

/// 是否触及(或低于)跌停价
pub fn reaches_limit_down(price: f64, prev_close: f64, ratio: f64) -> bool {
    prev_close > 0.0 && price <= limit_down_price(prev_close, ratio) + PRICE_EPS
}

/// 两个价格是否视为相等
pub fn price_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < PRICE_EPS
}

/// 简单移动平均 MA(X, N)
pub fn ma(values: &[f64], n: usize) -> Vec<Option<f64>> {
    if n == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= n {
            sum -= values[i - n];
        }
        if i + 1 >= n {
            out.push(Some(sum / n as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// 向前引用 REF(X, N)
pub fn ref_n<T: Copy>(values: &[T], n: usize) -> Vec<Option<T>> {
    (0..values.len())
        .map(|i| if i >= n { Some(values[i - n]) } else { None })
        .collect()
}

/// 最近 N 周期最高值 HHV(X, N), 含当前周期
pub fn hhv(values: &[f64], n: usize) -> Vec<Option<f64>> {
    rolling(values, n, f64::max)
}

/// 最近 N 周期最低值 LLV(X, N), 含当前周期
pub fn llv(values: &[f64], n: usize) -> Vec<Option<f64>> {
    rolling(values, n, f64::min)
}

fn rolling(values: &[f64], n: usize, fold: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    if n == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < n {
                return None;
            }
            values[i + 1 - n..=i].iter().copied().reduce(fold)
        })
        .collect()
}

/// 最近 N 周期满足条件的次数 COUNT(X, N), 含当前周期
///
/// 不足 N 周期时按已有周期统计
pub fn count_true(flags: &[bool], n: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(flags.len());
    let mut running: u32 = 0;
    for (i, flag) in flags.iter().enumerate() {
        if *flag {
            running += 1;
        }
        if n > 0 && i >= n && flags[i - n] {
            running -= 1;
        }
        out.push(if n == 0 { 0 } else { running });
    }
    out
}
