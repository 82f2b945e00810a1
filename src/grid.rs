//! Grid Module
//!
//! 将 calamine 读出的稀疏 Range 转换为稠密、绝对坐标的单元格网格。
//! 所有抽取器都建立在这个只读视图之上。

use std::collections::BTreeMap;

use calamine::{Data, Range};

use crate::error::EnerSheetError;
use crate::types::CellValue;

/// 越界读取时返回的共享空单元格
static EMPTY_CELL: CellValue = CellValue::Empty;

/// 单个工作表的稠密网格视图
///
/// 不可变，作用域限于一次抽取过程。行列均为 0 起始的绝对坐标：
/// calamine 的 `Range` 以首个非空单元格为原点，这里按 `range.start()`
/// 补齐前导空行空列，使固定行偏移版式（如传输矩阵的年份块表）成立。
///
/// 越界读取不会 panic，统一返回空单元格——块定位器在网格边缘
/// 扫描时依赖这一点。
pub struct SheetGrid {
    cells: Vec<Vec<CellValue>>,
    rows: usize,
    cols: usize,
}

impl SheetGrid {
    /// 从 calamine Range 构建网格
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            // 整表为空
            return Self {
                cells: Vec::new(),
                rows: 0,
                cols: 0,
            };
        };
        let (start_row, start_col) = (start_row as usize, start_col as usize);
        let rows = start_row + range.height();
        let cols = start_col + range.width();

        let mut cells = vec![vec![CellValue::Empty; cols]; rows];
        for (r, row) in range.rows().enumerate() {
            for (c, data) in row.iter().enumerate() {
                cells[start_row + r][start_col + c] = CellValue::from(data);
            }
        }

        Self { cells, rows, cols }
    }

    /// 从行数据直接构建网格（测试与内存数据源使用）
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let row_count = rows.len();
        Self {
            cells: rows,
            rows: row_count,
            cols,
        }
    }

    /// 行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 读取单元格；越界返回空单元格
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 判断单元格是否为空（越界视为空）
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_empty()
    }

    /// 读取数值单元格
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).as_number()
    }

    /// 读取实体键（去空白的非空标签）
    pub fn label(&self, row: usize, col: usize) -> Option<String> {
        self.cell(row, col).as_label()
    }

    /// 读取年份标记
    pub fn year(&self, row: usize, col: usize) -> Option<i32> {
        self.cell(row, col).as_year()
    }

    /// 在表头行中查找命名列，返回列索引
    ///
    /// 匹配前对表头去首尾空白。找不到返回 `None`，由调用方
    /// 决定是否升级为 `MissingColumn` 错误。
    pub fn column_index(&self, header_row: usize, name: &str) -> Option<usize> {
        (0..self.cols).find(|&col| {
            matches!(
                self.cell(header_row, col),
                CellValue::Text(s) if s.trim() == name
            )
        })
    }
}

/// 按名提供工作表网格的数据源
///
/// 正向转换的唯一外部依赖面：`ExcelWorkbook` 按此特征包装
/// calamine 工作簿，测试则可用内存中的表名 → 网格映射替代。
pub trait SheetSource {
    /// 加载命名工作表为网格
    ///
    /// # 错误
    ///
    /// 表不存在时返回 `EnerSheetError::MissingSheet`。
    fn grid(&mut self, sheet: &str) -> Result<SheetGrid, EnerSheetError>;
}

/// 内存数据源：表名 → 行数据。集成测试与上层单元测试使用。
impl SheetSource for BTreeMap<String, Vec<Vec<CellValue>>> {
    fn grid(&mut self, sheet: &str) -> Result<SheetGrid, EnerSheetError> {
        match self.get(sheet) {
            Some(rows) => Ok(SheetGrid::from_rows(rows.clone())),
            None => Err(EnerSheetError::MissingSheet {
                sheet: sheet.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> SheetGrid {
        SheetGrid::from_rows(vec![
            vec![
                CellValue::Text("Province".to_string()),
                CellValue::Text("Year".to_string()),
                CellValue::Text(" Coal ".to_string()),
            ],
            vec![
                CellValue::Text("ANHU".to_string()),
                CellValue::Number(2030.0),
                CellValue::Number(12.345),
            ],
            vec![
                CellValue::Text("BEIJ".to_string()),
                CellValue::Empty,
                CellValue::Number(7.0),
            ],
        ])
    }

    #[test]
    fn test_cell_access() {
        let grid = sample_grid();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.number(1, 2), Some(12.345));
        assert_eq!(grid.label(1, 0), Some("ANHU".to_string()));
        assert_eq!(grid.year(1, 1), Some(2030));
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let grid = sample_grid();
        // 防御式扫描依赖越界读取不 panic
        assert!(grid.is_empty(100, 0));
        assert!(grid.is_empty(0, 100));
        assert_eq!(grid.cell(100, 100), &CellValue::Empty);
        assert_eq!(grid.number(100, 100), None);
    }

    #[test]
    fn test_column_index_trims_headers() {
        let grid = sample_grid();
        assert_eq!(grid.column_index(0, "Province"), Some(0));
        assert_eq!(grid.column_index(0, "Coal"), Some(2));
        assert_eq!(grid.column_index(0, "Oil"), None);
    }

    #[test]
    fn test_empty_grid() {
        let grid = SheetGrid::from_rows(Vec::new());
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert!(grid.is_empty(0, 0));
    }

    #[test]
    fn test_ragged_rows_padded_by_accessor() {
        let grid = SheetGrid::from_rows(vec![
            vec![CellValue::Number(1.0)],
            vec![CellValue::Number(2.0), CellValue::Number(3.0)],
        ]);
        assert_eq!(grid.cols(), 2);
        // 短行的缺口按空单元格读取
        assert!(grid.is_empty(0, 1));
    }

    #[test]
    fn test_map_sheet_source() {
        let mut source: BTreeMap<String, Vec<Vec<CellValue>>> = BTreeMap::new();
        source.insert(
            "PE".to_string(),
            vec![vec![CellValue::Text("Province".to_string())]],
        );

        assert!(source.grid("PE").is_ok());
        match source.grid("Generation") {
            Err(EnerSheetError::MissingSheet { sheet }) => assert_eq!(sheet, "Generation"),
            _ => panic!("Expected MissingSheet"),
        }
    }
}
