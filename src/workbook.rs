//! Workbook Module
//!
//! 基于 calamine 的结果工作簿封装：按路径打开，按表名加载网格。
//! 正向转换（工作簿 → JSON 文档）的文件侧实现。

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Reader, Sheets};

use crate::error::EnerSheetError;
use crate::grid::{SheetGrid, SheetSource};

/// 结果工作簿
///
/// calamine 工作簿的薄封装。工作簿整体打开一次，随后各数据集
/// 按表名逐个加载网格；一次加载即一次完整读取，网格只读。
///
/// # 使用示例
///
/// ```rust,no_run
/// use enersheet::{ExcelWorkbook, SheetSource};
///
/// # fn main() -> Result<(), enersheet::EnerSheetError> {
/// let mut workbook = ExcelWorkbook::open("30PE_Results_ALL.xlsx")?;
/// let grid = workbook.grid("PE")?;
/// # Ok(())
/// # }
/// ```
pub struct ExcelWorkbook {
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl ExcelWorkbook {
    /// 按路径打开结果工作簿
    ///
    /// # 错误
    ///
    /// - `EnerSheetError::Io`: 文件不存在（NotFound，源文件缺失类故障）
    /// - `EnerSheetError::Parse`: 文件损坏或非 Excel 格式
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EnerSheetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EnerSheetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook not found: {}", path.display()),
            )));
        }

        let workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        Ok(Self {
            workbook,
            sheet_names,
        })
    }

    /// 工作簿中的全部表名
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// 判断工作簿中是否存在命名表
    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names.iter().any(|name| name == sheet)
    }
}

impl SheetSource for ExcelWorkbook {
    fn grid(&mut self, sheet: &str) -> Result<SheetGrid, EnerSheetError> {
        if !self.has_sheet(sheet) {
            return Err(EnerSheetError::MissingSheet {
                sheet: sheet.to_string(),
            });
        }

        let range = self.workbook.worksheet_range(sheet)?;
        Ok(SheetGrid::from_range(&range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_io_not_found() {
        let result = ExcelWorkbook::open("definitely_missing_results.xlsx");
        match result {
            Err(EnerSheetError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io NotFound error"),
        }
    }
}
