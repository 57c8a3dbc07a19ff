// ==========================================
// 选股辅助函数库 - 命令行入口
// ==========================================
// 用法:
//   userfunc <db|-> <证券列表文件> <日线文件> <YYYY-MM-DD>
// db 为 "-" 时使用默认路径 (USERFUNC_DB_PATH 或用户数据目录)
// ==========================================

use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::path::PathBuf;
use userfunc::config::ConfigManager;
use userfunc::engine::ShoubanScreener;
use userfunc::importer::MarketImporter;
use userfunc::repository::MarketDataRepository;

/// 默认数据库路径
fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("USERFUNC_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./userfunc.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("userfunc");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("userfunc.db");
        }
    }
    path.to_string_lossy().to_string()
}

fn main() -> anyhow::Result<()> {
    userfunc::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 4 {
        bail!("用法: userfunc <db|-> <证券列表文件> <日线文件> <YYYY-MM-DD>");
    }

    let db_path = if args[0] == "-" {
        get_default_db_path()
    } else {
        args[0].clone()
    };
    let date = NaiveDate::parse_from_str(&args[3], "%Y-%m-%d")
        .with_context(|| format!("日期格式错误: {}", args[3]))?;

    tracing::info!("选股辅助函数库 v{}", userfunc::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let repo = MarketDataRepository::new(&db_path).context("无法打开行情数据库")?;
    let importer = MarketImporter::new(&repo);
    importer
        .import_stock_list(&args[1])
        .with_context(|| format!("证券列表导入失败: {}", args[1]))?;
    importer
        .import_bars(&args[2])
        .with_context(|| format!("日线导入失败: {}", args[2]))?;

    let config = ConfigManager::new(&db_path)?.load_indicator_config()?;
    let screener = ShoubanScreener::new(&repo, config)?;
    let rows = screener.scan(date)?;

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
