// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: 文件解析 + 字段映射 + 落库
// ==========================================


use test_helpers::{create_test_db, day, write_csv};
use userfunc::importer::{read_bars, ImportError, MarketImporter};
use userfunc::repository::MarketDataRepository;

#[test]
fn test_import_bars_with_chinese_headers_skips_bad_rows() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let repo = MarketDataRepository::new(&db_path).unwrap();

    let file = write_csv(&[
        "代码,日期,开盘,最高,最低,收盘,成交量,成交额",
        "1,20180801,10,10.5,9.8,10.2,1000,10200",
        "1,20180802,10.2,10.4,10.0,10.3,900,",
        "1,2018-08-03,abc,10.4,10.0,10.3,900,0",
        "XX,20180803,10,10,10,10,1,1",
    ])
    .unwrap();

    let summary = MarketImporter::new(&repo).import_bars(file.path()).unwrap();
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 2);

    let series = repo.load_series("000001", day(0), day(10)).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.bars[0].amount, 10200.0);
    assert_eq!(series.bars[1].amount, 0.0);
}

#[test]
fn test_missing_required_column_aborts() {
    let file = write_csv(&["code,date,open,high,low,volume", "000001,2018-08-01,1,1,1,1"]).unwrap();
    let result = read_bars(file.path());
    assert!(matches!(result, Err(ImportError::MissingColumn(c)) if c == "close"));
}

#[test]
fn test_reimport_overwrites_same_day() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let repo = MarketDataRepository::new(&db_path).unwrap();
    let importer = MarketImporter::new(&repo);

    let first = write_csv(&["code,date,open,high,low,close,volume", "600000,2018-08-01,1,1,1,1,1"]).unwrap();
    let second = write_csv(&["code,date,open,high,low,close,volume", "600000,2018-08-01,2,2,2,2,2"]).unwrap();
    importer.import_bars(first.path()).unwrap();
    importer.import_bars(second.path()).unwrap();

    let series = repo.load_series("600000", day(0), day(0)).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.bars[0].close, 2.0);
}
