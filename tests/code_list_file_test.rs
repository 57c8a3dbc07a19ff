// ==========================================
// 证券列表文件集成测试
// ==========================================
// 测试目标: Excel 证券列表 → getCodeList / read_stock_list
// 样例: tests/fixtures/datasets/stock_list.xlsx
// ==========================================

use std::path::PathBuf;
use userfunc::importer::read_stock_list;
use userfunc::my_function::CodeListSource;
use userfunc::user_func;

const STOCK_LIST_XLSX: &str = "tests/fixtures/datasets/stock_list.xlsx";

#[test]
fn test_read_stock_list_from_xlsx() {
    let (stocks, summary) = read_stock_list(STOCK_LIST_XLSX).expect("Excel 证券列表应可读取");

    // 6 行数据, 代码 ABC 无效被跳过
    assert_eq!(summary.total_rows, 6);
    assert_eq!(summary.skipped, 1);
    assert_eq!(stocks.len(), 5);

    assert_eq!(stocks[0].code, "000001");
    assert_eq!(stocks[0].name, "平安银行");
    assert_eq!(stocks[0].list_date, chrono::NaiveDate::from_ymd_opt(1991, 4, 3));
    // 数值单元格的代码
    assert_eq!(stocks[4].code, "600519");
}

#[test]
fn test_get_code_list_from_xlsx() {
    let source = CodeListSource::File(PathBuf::from(STOCK_LIST_XLSX));

    // 退市整理期与重复代码被过滤
    let codes = user_func::getCodeList(&source, 10).unwrap();
    assert_eq!(codes, vec!["000001", "300004", "600519"]);

    let codes = user_func::getCodeList(&source, 2).unwrap();
    assert_eq!(codes, vec!["000001", "300004"]);
}
