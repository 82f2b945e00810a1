//! Layout Module
//!
//! 年份块定位器：在平铺的工作表中枚举"年份标记 + 固定高度实体行"
//! 的重复结构。版式不自描述，块的起始行由每个数据集的声明式
//! 描述符给出（显式年份 → 起始行表，或等距步长扫描）。

use crate::grid::SheetGrid;

/// 一个已定位的年份块
///
/// `data_start..data_end` 为该块的实体数据行区间（半开）。
/// 当声明的块超出网格边界时按可用行截断，而不是使整个
/// 抽取失败（部分数据容忍）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBlock {
    /// 块所属年份
    pub year: i32,

    /// 块起始行（年份标记所在行）
    pub start_row: usize,

    /// 实体数据首行
    pub data_start: usize,

    /// 实体数据尾后行（截断到网格行数）
    pub data_end: usize,
}

/// 年份块版式描述符
///
/// `entity_rows` 为每个年份块的实体行数（如 30 个省份），
/// `marker_col` 为年份标记所在列，`data_offset` 为数据行相对
/// 块起始行的偏移（传输矩阵的块首行是实体名表头，数据从
/// 起始行 +1 开始；氢能表的标记行本身就是数据行，偏移为 0）。
#[derive(Debug, Clone, Copy)]
pub struct BlockLayout {
    /// 每块实体行数
    pub entity_rows: usize,

    /// 年份标记列
    pub marker_col: usize,

    /// 数据行相对块起始行的偏移
    pub data_offset: usize,
}

impl BlockLayout {
    /// 按显式年份 → 起始行表定位块
    ///
    /// 块边界纯粹由表驱动：表头行 = 起始行，数据行 =
    /// `[start + data_offset, start + data_offset + entity_rows)`，
    /// 越界部分截断。
    pub fn explicit_blocks(&self, grid: &SheetGrid, table: &[(i32, usize)]) -> Vec<YearBlock> {
        table
            .iter()
            .filter_map(|&(year, start_row)| self.block_at(grid, year, start_row))
            .collect()
    }

    /// 按固定步长扫描年份标记定位块
    ///
    /// 从 `first_row` 起每 `stride` 行读取一次标记单元格；标记
    /// 缺失或不在允许年份集中的块被跳过。扫描到网格末尾为止。
    pub fn scan_markers(
        &self,
        grid: &SheetGrid,
        first_row: usize,
        stride: usize,
        allowed_years: &[i32],
    ) -> Vec<YearBlock> {
        let mut blocks = Vec::new();
        let mut start_row = first_row;

        while start_row < grid.rows() {
            if let Some(year) = grid.year(start_row, self.marker_col) {
                if allowed_years.contains(&year) {
                    if let Some(block) = self.block_at(grid, year, start_row) {
                        blocks.push(block);
                    }
                }
            }
            start_row += stride;
        }

        blocks
    }

    /// 计算单个块的边界；完全落在网格之外时返回 `None`
    fn block_at(&self, grid: &SheetGrid, year: i32, start_row: usize) -> Option<YearBlock> {
        if start_row >= grid.rows() {
            return None;
        }

        let data_start = start_row + self.data_offset;
        let data_end = (data_start + self.entity_rows).min(grid.rows());
        if data_start > data_end {
            return None;
        }

        Some(YearBlock {
            year,
            start_row,
            data_start,
            data_end,
        })
    }
}
