// ==========================================
// 选股辅助函数库 - 导出清单
// ==========================================
// 统一入口的运行期绑定表:
// - 进程内只加载一次, 之后只读
// - 缺少/多出/重复/类型不符任一情况整体加载失败, 不返回残缺清单
// ==========================================

use crate::domain::{BarSeries, FourWeekState, ShoubanRecord, ShoubanType};
use crate::my_function::{CodeListError, CodeListSource};
use crate::user_func;
use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::info;

// ==========================================
// 函数签名
// ==========================================
pub type CodeListFn = fn(&CodeListSource, usize) -> Result<Vec<String>, CodeListError>;
pub type CounterFn = fn(&BarSeries, usize) -> Vec<u32>;
pub type FourWeekFn = fn(&BarSeries, usize, usize) -> Vec<FourWeekState>;
pub type SignalFn = fn(&BarSeries, usize) -> Vec<bool>;
pub type ClassifierFn = fn(&BarSeries, usize) -> Option<ShoubanType>;
pub type ScannerFn = fn(&[BarSeries], NaiveDate, usize) -> Vec<ShoubanRecord>;
pub type TrendFn = fn(&BarSeries, usize) -> Vec<Option<bool>>;

/// 导出符号类别 (按签名区分)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    CodeList,
    Counter,
    FourWeek,
    Signal,
    Classifier,
    Scanner,
    Trend,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 已解析的导出符号
#[derive(Clone, Copy)]
pub enum ExportedSymbol {
    CodeList(CodeListFn),
    Counter(CounterFn),
    FourWeek(FourWeekFn),
    Signal(SignalFn),
    Classifier(ClassifierFn),
    Scanner(ScannerFn),
    Trend(TrendFn),
}

impl ExportedSymbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            ExportedSymbol::CodeList(_) => SymbolKind::CodeList,
            ExportedSymbol::Counter(_) => SymbolKind::Counter,
            ExportedSymbol::FourWeek(_) => SymbolKind::FourWeek,
            ExportedSymbol::Signal(_) => SymbolKind::Signal,
            ExportedSymbol::Classifier(_) => SymbolKind::Classifier,
            ExportedSymbol::Scanner(_) => SymbolKind::Scanner,
            ExportedSymbol::Trend(_) => SymbolKind::Trend,
        }
    }
}

impl fmt::Debug for ExportedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExportedSymbol::{}", self.kind())
    }
}

/// 清单条目: 来源模块 + 名称 + 符号
#[derive(Debug, Clone, Copy)]
pub struct ExportEntry {
    pub module: &'static str,
    pub name: &'static str,
    pub symbol: ExportedSymbol,
}

/// 统一入口必须导出的符号: (来源模块, 名称, 类别)
pub const REQUIRED_EXPORTS: [(&str, &str, SymbolKind); 9] = [
    ("my_function", "getCodeList", SymbolKind::CodeList),
    ("ch_counts", "CHCOUNTS", SymbolKind::Counter),
    ("ch_counts", "CHCOUNTS2", SymbolKind::Counter),
    ("ch_counts", "CHCOUNTS3", SymbolKind::Counter),
    ("ch_counts", "FOURWEEK", SymbolKind::FourWeek),
    ("shouban", "shouban", SymbolKind::Signal),
    ("shouban", "shoubanData", SymbolKind::Scanner),
    ("shouban", "shoubanType", SymbolKind::Classifier),
    ("comm", "ifupMA", SymbolKind::Trend),
];

// ==========================================
// 加载错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("缺少导出符号: {module}::{symbol}")]
    MissingSymbol { module: String, symbol: String },

    #[error("清单外的导出符号: {module}::{symbol}")]
    UnexpectedSymbol { module: String, symbol: String },

    #[error("重复的导出符号: {symbol}")]
    DuplicateSymbol { symbol: String },

    #[error("导出符号来源不符: {symbol} 期望来自 {expected}, 实际来自 {actual}")]
    WrongOrigin {
        symbol: String,
        expected: String,
        actual: String,
    },

    #[error("导出符号类型不符: {module}::{symbol} 期望 {expected}, 实际 {actual}")]
    KindMismatch {
        module: String,
        symbol: String,
        expected: SymbolKind,
        actual: SymbolKind,
    },
}

// ==========================================
// Manifest - 不可变绑定表
// ==========================================
#[derive(Debug)]
pub struct Manifest {
    entries: BTreeMap<&'static str, ExportEntry>,
}

impl Manifest {
    /// 校验并构建绑定表
    pub fn load(entries: Vec<ExportEntry>) -> Result<Self, LoadError> {
        let mut table: BTreeMap<&'static str, ExportEntry> = BTreeMap::new();

        for entry in entries {
            let Some((module, _, kind)) = REQUIRED_EXPORTS.iter().find(|(_, n, _)| *n == entry.name)
            else {
                return Err(LoadError::UnexpectedSymbol {
                    module: entry.module.to_string(),
                    symbol: entry.name.to_string(),
                });
            };
            if *module != entry.module {
                return Err(LoadError::WrongOrigin {
                    symbol: entry.name.to_string(),
                    expected: module.to_string(),
                    actual: entry.module.to_string(),
                });
            }
            if *kind != entry.symbol.kind() {
                return Err(LoadError::KindMismatch {
                    module: entry.module.to_string(),
                    symbol: entry.name.to_string(),
                    expected: *kind,
                    actual: entry.symbol.kind(),
                });
            }
            if table.insert(entry.name, entry).is_some() {
                return Err(LoadError::DuplicateSymbol {
                    symbol: entry.name.to_string(),
                });
            }
        }

        for (module, name, _) in REQUIRED_EXPORTS.iter() {
            if !table.contains_key(name) {
                return Err(LoadError::MissingSymbol {
                    module: module.to_string(),
                    symbol: name.to_string(),
                });
            }
        }

        Ok(Self { entries: table })
    }

    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.get(name)
    }

    /// 导出名称 (字典序)
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn code_list(&self, name: &str) -> Option<CodeListFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::CodeList(f) => Some(f),
            _ => None,
        }
    }

    pub fn counter(&self, name: &str) -> Option<CounterFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::Counter(f) => Some(f),
            _ => None,
        }
    }

    pub fn four_week(&self, name: &str) -> Option<FourWeekFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::FourWeek(f) => Some(f),
            _ => None,
        }
    }

    pub fn signal(&self, name: &str) -> Option<SignalFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::Signal(f) => Some(f),
            _ => None,
        }
    }

    pub fn classifier(&self, name: &str) -> Option<ClassifierFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::Classifier(f) => Some(f),
            _ => None,
        }
    }

    pub fn scanner(&self, name: &str) -> Option<ScannerFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::Scanner(f) => Some(f),
            _ => None,
        }
    }

    pub fn trend(&self, name: &str) -> Option<TrendFn> {
        match self.get(name)?.symbol {
            ExportedSymbol::Trend(f) => Some(f),
            _ => None,
        }
    }
}

/// 统一入口的内置清单 (绑定到 user_func 重导出的同一函数)
pub fn builtin_entries() -> Vec<ExportEntry> {
    vec![
        ExportEntry {
            module: "my_function",
            name: "getCodeList",
            symbol: ExportedSymbol::CodeList(user_func::getCodeList),
        },
        ExportEntry {
            module: "ch_counts",
            name: "CHCOUNTS",
            symbol: ExportedSymbol::Counter(user_func::CHCOUNTS),
        },
        ExportEntry {
            module: "ch_counts",
            name: "CHCOUNTS2",
            symbol: ExportedSymbol::Counter(user_func::CHCOUNTS2),
        },
        ExportEntry {
            module: "ch_counts",
            name: "CHCOUNTS3",
            symbol: ExportedSymbol::Counter(user_func::CHCOUNTS3),
        },
        ExportEntry {
            module: "ch_counts",
            name: "FOURWEEK",
            symbol: ExportedSymbol::FourWeek(user_func::FOURWEEK),
        },
        ExportEntry {
            module: "shouban",
            name: "shouban",
            symbol: ExportedSymbol::Signal(user_func::shouban),
        },
        ExportEntry {
            module: "shouban",
            name: "shoubanData",
            symbol: ExportedSymbol::Scanner(user_func::shoubanData),
        },
        ExportEntry {
            module: "shouban",
            name: "shoubanType",
            symbol: ExportedSymbol::Classifier(user_func::shoubanType),
        },
        ExportEntry {
            module: "comm",
            name: "ifupMA",
            symbol: ExportedSymbol::Trend(user_func::ifupMA),
        },
    ]
}

static FACADE: OnceCell<Manifest> = OnceCell::new();

/// 统一入口绑定表 (进程内只加载一次, 多次调用返回同一实例)
pub fn facade() -> Result<&'static Manifest, LoadError> {
    FACADE.get_or_try_init(|| {
        let manifest = Manifest::load(builtin_entries())?;
        info!(symbols = manifest.len(), "导出清单加载完成");
        Ok(manifest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_manifest_loads_all_symbols() {
        let manifest = Manifest::load(builtin_entries()).unwrap();
        assert_eq!(manifest.len(), REQUIRED_EXPORTS.len());
        for (_, name, kind) in REQUIRED_EXPORTS.iter() {
            assert_eq!(manifest.get(name).map(|e| e.symbol.kind()), Some(*kind));
        }
    }

    #[test]
    fn test_missing_symbol_fails_loudly() {
        let entries: Vec<_> = builtin_entries()
            .into_iter()
            .filter(|e| e.name != "ifupMA")
            .collect();
        assert_eq!(
            Manifest::load(entries).unwrap_err(),
            LoadError::MissingSymbol {
                module: "comm".to_string(),
                symbol: "ifupMA".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut entries = builtin_entries();
        entries.push(entries[1]);
        assert!(matches!(
            Manifest::load(entries),
            Err(LoadError::DuplicateSymbol { symbol }) if symbol == "CHCOUNTS"
        ));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut entries = builtin_entries();
        entries[8].symbol = ExportedSymbol::Counter(user_func::CHCOUNTS);
        assert!(matches!(
            Manifest::load(entries),
            Err(LoadError::KindMismatch { expected: SymbolKind::Trend, actual: SymbolKind::Counter, .. })
        ));
    }

    #[test]
    fn test_typed_accessor_checks_kind() {
        let manifest = Manifest::load(builtin_entries()).unwrap();
        assert!(manifest.counter("CHCOUNTS3").is_some());
        assert!(manifest.counter("ifupMA").is_none());
        assert!(manifest.trend("missing").is_none());
    }
}
