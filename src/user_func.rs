// ==========================================
// 选股辅助函数库 - 统一入口
// ==========================================
// 仅做重导出, 名称与原函数一致, 不包装不改名
// 清单与 manifest::REQUIRED_EXPORTS 保持一致
// ==========================================

pub use crate::my_function::getCodeList;
pub use crate::ch_counts::{CHCOUNTS, CHCOUNTS2};
pub use crate::ch_counts::CHCOUNTS3;
pub use crate::ch_counts::FOURWEEK;
pub use crate::shouban::shouban;
pub use crate::shouban::shoubanData;
pub use crate::shouban::shoubanType;

pub use crate::comm::ifupMA;
