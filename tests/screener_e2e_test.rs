// ==========================================
// 首板扫描端到端测试
// ==========================================
// 流程: CSV 导入 → 仓储 → 配置覆写 → 扫描
// ==========================================


use test_helpers::{create_test_db, day, write_csv};
use userfunc::config::{config_keys, ConfigManager};
use userfunc::domain::{FourWeekState, ShoubanType};
use userfunc::engine::{ScreenerError, ShoubanScreener};
use userfunc::importer::MarketImporter;
use userfunc::my_function::CodeListSource;
use userfunc::repository::MarketDataRepository;
use userfunc::user_func;

fn bars_csv() -> Vec<String> {
    let mut lines = vec!["code,date,open,high,low,close,volume".to_string()];
    // 000001: 横盘 5 日后换手涨停
    for i in 0..5 {
        lines.push(format!("000001,{},10.00,10.05,9.95,10.00,1000", day(i)));
    }
    lines.push(format!("000001,{},10.10,11.00,10.05,11.00,4000", day(5)));
    // 600001: 连板, 扫描日为第 2 板
    lines.push(format!("600001,{},5.00,5.00,5.00,5.00,1000", day(3)));
    lines.push(format!("600001,{},5.50,5.50,5.50,5.50,500", day(4)));
    lines.push(format!("600001,{},6.05,6.05,6.05,6.05,500", day(5)));
    // 300001: 创业板涨 9% 未涨停 (2018 年仍为 10% 幅度)
    lines.push(format!("300001,{},20.00,20.00,20.00,20.00,800", day(4)));
    lines.push(format!("300001,{},20.00,21.80,20.00,21.80,900", day(5)));
    lines
}

#[test]
fn test_import_then_scan() {
    userfunc::logging::init_test();

    let (_db_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = MarketDataRepository::new(&db_path).expect("Failed to open repository");
    let importer = MarketImporter::new(&repo);

    let list = write_csv(&["代码,名称", "000001,平安银行", "600001,邯郸钢铁", "300001,特锐德"]).unwrap();
    let lines = bars_csv();
    let bars = write_csv(&lines.iter().map(String::as_str).collect::<Vec<_>>()).unwrap();

    let summary = importer.import_stock_list(list.path()).unwrap();
    assert_eq!(summary.imported, 3);
    let summary = importer.import_bars(bars.path()).unwrap();
    assert_eq!(summary.imported, 11);
    assert_eq!(summary.skipped, 0);

    // 配置覆写: 均线周期 3, 四周规则突破窗口 5
    let config_manager = ConfigManager::new(&db_path).unwrap();
    config_manager.set_global_config_value(config_keys::MA_PERIOD, "3").unwrap();
    config_manager.set_global_config_value(config_keys::FOURWEEK_HIGH, "5").unwrap();
    let config = config_manager.load_indicator_config().unwrap();
    assert_eq!(config.ma_period, 3);
    assert_eq!(config.fourweek_high, 5);

    let screener = ShoubanScreener::new(&repo, config).unwrap();
    let rows = screener.scan(day(5)).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.record.code, "000001");
    assert_eq!(row.record.name.as_deref(), Some("平安银行"));
    assert_eq!(row.record.board_type, ShoubanType::Turnover);
    assert_eq!(row.record.volume_ratio, Some(4.0));
    assert_eq!(row.limit_up_count, 1);
    assert_eq!(row.broken_count, 0);
    assert_eq!(row.four_week, FourWeekState::Long);
    assert_eq!(row.ma_up, Some(true));

    // 数据库来源的代码列表
    let codes = user_func::getCodeList(&CodeListSource::Database(db_path.clone()), 2).unwrap();
    assert_eq!(codes, vec!["000001", "300001"]);
}

#[test]
fn test_scan_empty_database() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let repo = MarketDataRepository::new(&db_path).unwrap();
    let screener = ShoubanScreener::new(&repo, Default::default()).unwrap();
    assert!(screener.scan(day(0)).unwrap().is_empty());
}

#[test]
fn test_scan_rejects_out_of_range_history_days() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let repo = MarketDataRepository::new(&db_path).unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    for value in ["9223372036854775807", "-1"] {
        config_manager
            .set_global_config_value(config_keys::HISTORY_DAYS, value)
            .unwrap();
        let config = config_manager.load_indicator_config().unwrap();
        assert_eq!(config.history_days.to_string(), value);

        let screener = ShoubanScreener::new(&repo, config).unwrap();
        let result = screener.scan(day(0));
        assert!(
            matches!(result, Err(ScreenerError::InvalidConfig(_))),
            "history_days = {} 应返回配置错误",
            value
        );
    }

    // 零天回看合法
    config_manager.set_global_config_value(config_keys::HISTORY_DAYS, "0").unwrap();
    let config = config_manager.load_indicator_config().unwrap();
    let screener = ShoubanScreener::new(&repo, config).unwrap();
    assert!(screener.scan(day(0)).unwrap().is_empty());
}
