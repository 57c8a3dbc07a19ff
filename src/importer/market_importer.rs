// ==========================================
// 选股辅助函数库 - 行情导入器
// ==========================================
// 流程: 文件解析 → 字段映射 → 落库
// 非法行记录 warn 并跳过, 文件级错误直接返回
// ==========================================

use crate::domain::{Bar, StockInfo};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::MarketDataRepository;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument, warn};

/// 导入汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
}

/// 读取证券列表文件 (不落库)
pub fn read_stock_list<P: AsRef<Path>>(path: P) -> ImportResult<(Vec<StockInfo>, ImportSummary)> {
    let records = UniversalFileParser.parse(path)?;
    let mut summary = ImportSummary {
        total_rows: records.len(),
        ..Default::default()
    };

    let mut stocks = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        // 表头占第 1 行
        let row = idx + 2;
        match FieldMapper.map_stock_info(row, record) {
            Ok(info) => stocks.push(info),
            Err(e @ ImportError::MissingColumn(_)) => return Err(e),
            Err(e) => {
                warn!(row, error = %e, "证券列表行跳过");
                summary.skipped += 1;
            }
        }
    }
    summary.imported = stocks.len();
    Ok((stocks, summary))
}

/// 读取日线文件, 按代码分组 (不落库)
pub fn read_bars<P: AsRef<Path>>(
    path: P,
) -> ImportResult<(BTreeMap<String, Vec<Bar>>, ImportSummary)> {
    let records = UniversalFileParser.parse(path)?;
    let mut summary = ImportSummary {
        total_rows: records.len(),
        ..Default::default()
    };

    let mut grouped: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 2;
        match FieldMapper.map_bar(row, record) {
            Ok((code, bar)) => {
                grouped.entry(code).or_default().push(bar);
                summary.imported += 1;
            }
            Err(e @ ImportError::MissingColumn(_)) => return Err(e),
            Err(e) => {
                warn!(row, error = %e, "日线行跳过");
                summary.skipped += 1;
            }
        }
    }
    Ok((grouped, summary))
}

// ==========================================
// MarketImporter - 导入并落库
// ==========================================
pub struct MarketImporter<'a> {
    repo: &'a MarketDataRepository,
}

impl<'a> MarketImporter<'a> {
    pub fn new(repo: &'a MarketDataRepository) -> Self {
        Self { repo }
    }

    /// 导入证券列表文件
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_stock_list<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportSummary> {
        let (stocks, summary) = read_stock_list(&path)?;
        self.repo.upsert_stocks(&stocks)?;
        info!(imported = summary.imported, skipped = summary.skipped, "证券列表导入完成");
        Ok(summary)
    }

    /// 导入日线文件
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_bars<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportSummary> {
        let (grouped, summary) = read_bars(&path)?;
        for (code, bars) in &grouped {
            self.repo.upsert_bars(code, bars)?;
        }
        info!(
            codes = grouped.len(),
            imported = summary.imported,
            skipped = summary.skipped,
            "日线导入完成"
        );
        Ok(summary)
    }
}
