// ==========================================
// 选股辅助函数库 - 行情数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: stock_list (证券列表) / stock_day (日线)
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema};
use crate::domain::{Bar, BarSeries, StockInfo};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

const DATE_FMT: &str = "%Y-%m-%d";

// ==========================================
// MarketDataRepository - 行情数据仓储
// ==========================================
pub struct MarketDataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MarketDataRepository {
    /// 打开数据库并确保 schema 存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // stock_list
    // ==========================================

    /// 批量写入证券列表 (存在则覆盖名称/上市日期)
    #[instrument(skip(self, stocks), fields(count = stocks.len()))]
    pub fn upsert_stocks(&self, stocks: &[StockInfo]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO stock_list (code, name, list_date)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(code) DO UPDATE SET name = excluded.name, list_date = excluded.list_date
                "#,
            )?;
            for s in stocks {
                stmt.execute(params![
                    s.code,
                    s.name,
                    s.list_date.map(|d| d.format(DATE_FMT).to_string()),
                ])?;
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(stocks.len())
    }

    /// 查询全部证券, 按代码升序
    pub fn list_stocks(&self) -> RepositoryResult<Vec<StockInfo>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT code, name, list_date FROM stock_list ORDER BY code ASC")?;
        let stocks = stmt
            .query_map([], |row| {
                Ok(StockInfo {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    list_date: row
                        .get::<_, Option<String>>(2)?
                        .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FMT).ok()),
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(stocks)
    }

    // ==========================================
    // stock_day
    // ==========================================

    /// 批量写入单只证券日线 (同日覆盖)
    #[instrument(skip(self, bars), fields(count = bars.len()))]
    pub fn upsert_bars(&self, code: &str, bars: &[Bar]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR REPLACE INTO stock_day (code, date, open, high, low, close, volume, amount)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;
            for b in bars {
                stmt.execute(params![
                    code,
                    b.date.format(DATE_FMT).to_string(),
                    b.open,
                    b.high,
                    b.low,
                    b.close,
                    b.volume,
                    b.amount,
                ])?;
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(bars.len())
    }

    /// 读取单只证券 [start, end] 区间日线
    pub fn load_series(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<BarSeries> {
        let conn = self.get_conn()?;

        let name: Option<String> = conn
            .query_row("SELECT name FROM stock_list WHERE code = ?1", params![code], |row| {
                row.get(0)
            })
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT date, open, high, low, close, volume, amount
            FROM stock_day
            WHERE code = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC
            "#,
        )?;
        let raw = stmt
            .query_map(
                params![
                    code,
                    start.format(DATE_FMT).to_string(),
                    end.format(DATE_FMT).to_string()
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                        row.get::<_, f64>(6)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        let bars = raw
            .into_iter()
            .map(|(date, open, high, low, close, volume, amount)| {
                let date = parse_db_date(&date)?;
                Ok(Bar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                    amount,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(BarSeries::new(code, name, bars))
    }

    /// 读取全市场 [start, end] 区间日线, 按代码分组
    #[instrument(skip(self))]
    pub fn load_universe(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<BarSeries>> {
        let conn = self.get_conn()?;

        let names: BTreeMap<String, String> = {
            let mut stmt = conn.prepare("SELECT code, name FROM stock_list")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<SqliteResult<Vec<_>>>()?;
            rows.into_iter().collect()
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT code, date, open, high, low, close, volume, amount
            FROM stock_day
            WHERE date >= ?1 AND date <= ?2
            ORDER BY code ASC, date ASC
            "#,
        )?;
        let rows = stmt
            .query_map(
                params![start.format(DATE_FMT).to_string(), end.format(DATE_FMT).to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                        row.get::<_, f64>(6)?,
                        row.get::<_, f64>(7)?,
                    ))
                },
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut grouped: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
        for (code, date, open, high, low, close, volume, amount) in rows {
            grouped.entry(code).or_default().push(Bar {
                date: parse_db_date(&date)?,
                open,
                high,
                low,
                close,
                volume,
                amount,
            });
        }

        debug!(codes = grouped.len(), "全市场日线加载完成");
        Ok(grouped
            .into_iter()
            .map(|(code, bars)| {
                let name = names.get(&code).cloned();
                BarSeries::new(code, name, bars)
            })
            .collect())
    }
}

fn parse_db_date(s: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| RepositoryError::FieldValueError {
        field: "date".to_string(),
        message: format!("{}: {}", s, e),
    })
}
