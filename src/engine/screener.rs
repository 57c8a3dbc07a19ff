// ==========================================
// 选股辅助函数库 - 首板扫描引擎
// ==========================================
// 输入: 行情仓储 + 指标参数
// 输出: 指定交易日首板明细, 附带涨停/炸板计数、四周规则、均线方向
// 红线: Engine 不拼 SQL, 只通过统一入口调用指标函数
// ==========================================

use crate::config::IndicatorConfig;
use crate::domain::{FourWeekState, ShoubanRecord};
use crate::manifest::{self, LoadError, Manifest};
use crate::repository::{MarketDataRepository, RepositoryError};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

/// 扫描引擎错误
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("导出清单加载失败: {0}")]
    Load(#[from] LoadError),

    #[error("行情读取失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("导出清单缺少函数: {0}")]
    MissingFunction(&'static str),

    #[error("配置参数无效: {0}")]
    InvalidConfig(String),
}

/// 扫描结果行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenRow {
    #[serde(flatten)]
    pub record: ShoubanRecord,
    /// 统计窗口内涨停次数 (含当日)
    pub limit_up_count: u32,
    /// 统计窗口内炸板次数
    pub broken_count: u32,
    pub four_week: FourWeekState,
    pub ma_up: Option<bool>,
}

// ==========================================
// ShoubanScreener - 首板扫描
// ==========================================
pub struct ShoubanScreener<'a> {
    repo: &'a MarketDataRepository,
    config: IndicatorConfig,
    manifest: &'static Manifest,
}

impl<'a> ShoubanScreener<'a> {
    /// 创建扫描引擎 (导出清单加载失败则整体失败)
    pub fn new(repo: &'a MarketDataRepository, config: IndicatorConfig) -> Result<Self, ScreenerError> {
        Ok(Self {
            repo,
            config,
            manifest: manifest::facade()?,
        })
    }

    /// 扫描指定交易日
    #[instrument(skip(self), fields(lookback = self.config.shouban_lookback))]
    pub fn scan(&self, date: NaiveDate) -> Result<Vec<ScreenRow>, ScreenerError> {
        let shouban_data = self
            .manifest
            .scanner("shoubanData")
            .ok_or(ScreenerError::MissingFunction("shoubanData"))?;
        let chcounts = self
            .manifest
            .counter("CHCOUNTS")
            .ok_or(ScreenerError::MissingFunction("CHCOUNTS"))?;
        let chcounts3 = self
            .manifest
            .counter("CHCOUNTS3")
            .ok_or(ScreenerError::MissingFunction("CHCOUNTS3"))?;
        let fourweek = self
            .manifest
            .four_week("FOURWEEK")
            .ok_or(ScreenerError::MissingFunction("FOURWEEK"))?;
        let ifup_ma = self
            .manifest
            .trend("ifupMA")
            .ok_or(ScreenerError::MissingFunction("ifupMA"))?;

        let start = self.history_start(date)?;
        let universe = self.repo.load_universe(start, date)?;
        let records = shouban_data(&universe, date, self.config.shouban_lookback);

        let rows: Vec<ScreenRow> = records
            .into_iter()
            .filter_map(|record| {
                let series = universe.iter().find(|s| s.code == record.code)?;
                let idx = series.index_of(date)?;
                Some(ScreenRow {
                    limit_up_count: chcounts(series, self.config.count_window)[idx],
                    broken_count: chcounts3(series, self.config.count_window)[idx],
                    four_week: fourweek(series, self.config.fourweek_high, self.config.fourweek_low)[idx],
                    ma_up: ifup_ma(series, self.config.ma_period)[idx],
                    record,
                })
            })
            .collect();

        info!(date = %date, universe = universe.len(), hits = rows.len(), "首板扫描完成");
        Ok(rows)
    }

    /// 行情回看起始日 (history_days 须为非负且不越过日期范围)
    fn history_start(&self, date: NaiveDate) -> Result<NaiveDate, ScreenerError> {
        let days = self.config.history_days;
        if days < 0 {
            return Err(ScreenerError::InvalidConfig(format!("history_days 不能为负: {}", days)));
        }
        Duration::try_days(days)
            .and_then(|span| date.checked_sub_signed(span))
            .ok_or_else(|| ScreenerError::InvalidConfig(format!("history_days 超出日期范围: {}", days)))
    }
}
