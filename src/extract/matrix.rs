//! Transfer Matrix Extractor
//!
//! 省际电力传输矩阵的抽取：每个年份一个方阵块，块首行是受端
//! 省份名，数据行首列是送端省份名。空白、公式错误标记与无法
//! 解析的单元格一律取 0——传输量的语义是"无数据即无传输"，
//! 下游会对这些值求和。

use crate::document::round_to;
use crate::grid::SheetGrid;
use crate::layout::BlockLayout;
use crate::types::{CellValue, TransferMatrix};

/// 传输矩阵精度固定为 3 位小数
const MATRIX_PRECISION: u8 = 3;

/// 传输矩阵版式描述符
///
/// 块起始行由显式年份 → 起始行表给出（版式不自描述，
/// 新版式通过增补表项支持，不改代码）。
#[derive(Debug, Clone, Copy)]
pub struct MatrixLayout {
    /// 年份 → 块起始行
    pub year_blocks: &'static [(i32, usize)],

    /// 声明的实体数（方阵边长上限）
    pub entity_count: usize,
}

/// 抽取传输矩阵为 `年份 → 送端 → 受端 → 传输量`
///
/// 受端顺序取自块首行（列序），送端顺序取自各数据行首列（行序），
/// 各自截断到 min(声明实体数, 实际非空名数)。两个轴不要求是
/// 相同集合，也不做任何对称性假设：`matrix[year][A][B]` 恒取自
/// A 所在行与 B 所在列的交叉单元格。
pub fn extract_transfer_matrix(grid: &SheetGrid, layout: &MatrixLayout) -> TransferMatrix {
    let block_layout = BlockLayout {
        entity_rows: layout.entity_count,
        marker_col: 0,
        data_offset: 1,
    };
    let blocks = block_layout.explicit_blocks(grid, layout.year_blocks);

    let mut matrix = TransferMatrix::new();

    for block in blocks {
        // 受端：块首行第 1..=entity_count 列的非空名
        let receivers: Vec<String> = (1..=layout.entity_count)
            .filter_map(|col| grid.label(block.start_row, col))
            .collect();

        // 送端：数据行首列的非空名
        let senders: Vec<(usize, String)> = (block.data_start..block.data_end)
            .filter_map(|row| grid.label(row, 0).map(|name| (row, name)))
            .collect();

        let year_entry = matrix.entry(block.year.to_string()).or_default();
        for (row, sender) in senders {
            let receiver_entry = year_entry.entry(sender).or_default();
            for (j, receiver) in receivers.iter().enumerate() {
                let value = matrix_cell_value(grid.cell(row, 1 + j));
                receiver_entry.insert(receiver.clone(), value);
            }
        }
    }

    matrix
}

/// 单元格 → 传输量的回退策略
///
/// 数值按 3 位小数舍入；文本中含 `#`（公式错误标记）、空白文本、
/// 空单元格、错误值与其余无法解析的内容一律取 0。可解析为
/// 数值的文本按数值处理。
fn matrix_cell_value(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => round_to(*n, MATRIX_PRECISION),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.contains('#') {
                0.0
            } else {
                trimmed
                    .parse::<f64>()
                    .map(|n| round_to(n, MATRIX_PRECISION))
                    .unwrap_or(0.0)
            }
        }
        CellValue::Bool(_) | CellValue::Error(_) | CellValue::Empty => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    /// 2×2 非对称矩阵块
    fn asymmetric_grid() -> SheetGrid {
        SheetGrid::from_rows(vec![
            vec![num(2020.0), text("ANHU"), text("BEIJ")],
            vec![text("ANHU"), num(0.0), num(5.123456)],
            vec![text("BEIJ"), num(2.0), num(0.5)],
        ])
    }

    const LAYOUT: MatrixLayout = MatrixLayout {
        year_blocks: &[(2020, 0)],
        entity_count: 2,
    };

    /// 非对称夹具：确认行列方向没有被意外转置
    #[test]
    fn test_no_accidental_transposition() {
        let matrix = extract_transfer_matrix(&asymmetric_grid(), &LAYOUT);

        let year = &matrix["2020"];
        assert_eq!(year["ANHU"]["BEIJ"], 5.123);
        assert_eq!(year["BEIJ"]["ANHU"], 2.0);
        assert_ne!(year["ANHU"]["BEIJ"], year["BEIJ"]["ANHU"]);
    }

    #[test]
    fn test_diagonal_populated_like_any_cell() {
        let matrix = extract_transfer_matrix(&asymmetric_grid(), &LAYOUT);
        assert_eq!(matrix["2020"]["ANHU"]["ANHU"], 0.0);
        assert_eq!(matrix["2020"]["BEIJ"]["BEIJ"], 0.5);
    }

    /// 空白与错误标记单元格恒取 0，绝不为 null 也绝不报错
    #[test]
    fn test_blank_and_error_marker_cells_are_zero() {
        let grid = SheetGrid::from_rows(vec![
            vec![num(2020.0), text("ANHU"), text("BEIJ")],
            vec![text("ANHU"), CellValue::Empty, text("#DIV/0!")],
            vec![
                text("BEIJ"),
                CellValue::Error("#N/A".to_string()),
                text("  "),
            ],
        ]);

        let matrix = extract_transfer_matrix(&grid, &LAYOUT);
        let year = &matrix["2020"];
        assert_eq!(year["ANHU"]["ANHU"], 0.0);
        assert_eq!(year["ANHU"]["BEIJ"], 0.0);
        assert_eq!(year["BEIJ"]["ANHU"], 0.0);
        assert_eq!(year["BEIJ"]["BEIJ"], 0.0);
    }

    #[test]
    fn test_numeric_text_cell_is_parsed() {
        let grid = SheetGrid::from_rows(vec![
            vec![num(2020.0), text("ANHU")],
            vec![text("ANHU"), text(" 1.23456 ")],
        ]);
        let layout = MatrixLayout {
            year_blocks: &[(2020, 0)],
            entity_count: 1,
        };

        let matrix = extract_transfer_matrix(&grid, &layout);
        assert_eq!(matrix["2020"]["ANHU"]["ANHU"], 1.235);
    }

    /// 列数少于声明实体数时截断到实际非空名数
    #[test]
    fn test_truncation_to_populated_names() {
        let grid = SheetGrid::from_rows(vec![
            vec![num(2020.0), text("ANHU"), CellValue::Empty],
            vec![text("ANHU"), num(1.0), num(9.0)],
            vec![CellValue::Empty, num(8.0), num(9.0)],
        ]);

        let matrix = extract_transfer_matrix(&grid, &LAYOUT);
        let year = &matrix["2020"];
        assert_eq!(year.len(), 1); // 送端只有 ANHU
        assert_eq!(year["ANHU"].len(), 1); // 受端只有 ANHU
        assert_eq!(year["ANHU"]["ANHU"], 1.0);
    }

    #[test]
    fn test_multiple_year_blocks() {
        let grid = SheetGrid::from_rows(vec![
            vec![num(2020.0), text("ANHU")],
            vec![text("ANHU"), num(1.0)],
            vec![num(2030.0), text("ANHU")],
            vec![text("ANHU"), num(2.0)],
        ]);
        let layout = MatrixLayout {
            year_blocks: &[(2020, 0), (2030, 2)],
            entity_count: 1,
        };

        let matrix = extract_transfer_matrix(&grid, &layout);
        assert_eq!(matrix["2020"]["ANHU"]["ANHU"], 1.0);
        assert_eq!(matrix["2030"]["ANHU"]["ANHU"], 2.0);
    }
}
