//! Entity Series Extractor
//!
//! 把"一行一个观测"的宽表与"年份块"结构的表转换为
//! `实体 → 字段 → 年份 → 数值` 文档。
//!
//! 宽表的年份列是稀疏的：许多表只在每个年份块的首行打印年份，
//! 其余行继承上方最近一次出现的年份（fill-down）。这里用显式的
//! 折叠游标实现，抽取因此是网格的纯函数。

use crate::api::DuplicatePolicy;
use crate::document::DocumentAssembler;
use crate::error::EnerSheetError;
use crate::grid::SheetGrid;
use crate::layout::BlockLayout;
use crate::types::EntityDocument;

/// 列引用：按表头名或按固定列索引
///
/// 部分表的年份列与实体列没有表头（参考导出中的 `Unnamed: 0/1`），
/// 只能按索引定位；数据字段列始终按表头名定位。
#[derive(Debug, Clone, Copy)]
pub enum ColumnRef {
    /// 按表头名（在表头行中查找，缺失为配置错误）
    Name(&'static str),

    /// 按固定列索引
    Index(usize),
}

impl ColumnRef {
    /// 解析为列索引
    ///
    /// # 错误
    ///
    /// 命名列不存在时返回 `MissingColumn`（快速失败，报出列名）。
    fn resolve(
        &self,
        grid: &SheetGrid,
        header_row: usize,
        sheet: &str,
    ) -> Result<usize, EnerSheetError> {
        match *self {
            ColumnRef::Index(idx) => Ok(idx),
            ColumnRef::Name(name) => {
                grid.column_index(header_row, name)
                    .ok_or_else(|| EnerSheetError::MissingColumn {
                        sheet: sheet.to_string(),
                        column: name.to_string(),
                    })
            }
        }
    }
}

/// 宽表（一行一个 实体×年份 观测）的版式描述符
#[derive(Debug, Clone, Copy)]
pub struct WideTableSpec {
    /// 表名（错误报告用）
    pub sheet: &'static str,

    /// 表头行
    pub header_row: usize,

    /// 年份列（稀疏，fill-down）
    pub year_col: ColumnRef,

    /// 实体列（每行必有）
    pub entity_col: ColumnRef,

    /// 数据字段列（表头名即输出字段名）
    pub fields: &'static [&'static str],

    /// 字段精度（小数位数）
    pub precision: u8,

    /// 允许年份集；集外年份的行被丢弃
    pub allowed_years: &'static [i32],
}

/// 年份块表（固定高度的块、块首行携带年份标记）的版式描述符
#[derive(Debug, Clone, Copy)]
pub struct BlockTableSpec {
    /// 表名（错误报告用）
    pub sheet: &'static str,

    /// 表头行（数据字段列按名解析于此）
    pub header_row: usize,

    /// 首个块的起始行
    pub first_block_row: usize,

    /// 相邻块起始行的间距
    pub stride: usize,

    /// 每块实体行数
    pub entity_rows: usize,

    /// 年份标记列
    pub marker_col: usize,

    /// 实体列
    pub entity_col: usize,

    /// 数据字段列
    pub fields: &'static [&'static str],

    /// 字段精度
    pub precision: u8,

    /// 允许年份集
    pub allowed_years: &'static [i32],
}

/// 抽取宽表为规范文档
///
/// # 算法
///
/// 1. 解析年份、实体与全部字段列（命名列缺失即快速失败）。
/// 2. 逐行扫描：年份列非空则更新游标，否则沿用上一行的游标。
/// 3. 每读到实体键即初始化其完整字段表（先于任何赋值）。
/// 4. 游标未定义（首个年份标记之前）或年份不在允许集中的行
///    不产生任何赋值。
/// 5. 字段单元格为数值时按精度舍入写入；非数值或空按缺失跳过。
pub fn extract_wide_table(
    grid: &SheetGrid,
    spec: &WideTableSpec,
    policy: DuplicatePolicy,
) -> Result<EntityDocument, EnerSheetError> {
    let year_col = spec.year_col.resolve(grid, spec.header_row, spec.sheet)?;
    let entity_col = spec.entity_col.resolve(grid, spec.header_row, spec.sheet)?;
    let field_cols = resolve_fields(grid, spec.header_row, spec.sheet, spec.fields)?;

    let mut assembler = DocumentAssembler::new(policy);
    let mut cursor: Option<i32> = None;

    for row in (spec.header_row + 1)..grid.rows() {
        if let Some(year) = grid.year(row, year_col) {
            cursor = Some(year);
        }

        let Some(entity) = grid.label(row, entity_col) else {
            continue;
        };
        assembler.ensure_entity(&entity, spec.fields.iter().copied());

        let Some(year) = cursor else {
            tracing::debug!(sheet = spec.sheet, row, "row before first year marker, dropped");
            continue;
        };
        if !spec.allowed_years.contains(&year) {
            tracing::debug!(sheet = spec.sheet, row, year, "year outside allowed set, dropped");
            continue;
        }

        for &(col, name) in &field_cols {
            if let Some(value) = grid.number(row, col) {
                assembler.assign(&entity, name, year, value, spec.precision)?;
            }
        }
    }

    Ok(assembler.finish())
}

/// 抽取年份块表为规范文档
///
/// 块由标记扫描定位（标记缺失或年份不在允许集中的块被跳过），
/// 块内逐行处理与宽表一致：实体键必有，字段按缺失回退。
pub fn extract_block_table(
    grid: &SheetGrid,
    spec: &BlockTableSpec,
    policy: DuplicatePolicy,
) -> Result<EntityDocument, EnerSheetError> {
    let field_cols = resolve_fields(grid, spec.header_row, spec.sheet, spec.fields)?;

    let layout = BlockLayout {
        entity_rows: spec.entity_rows,
        marker_col: spec.marker_col,
        data_offset: 0,
    };
    let blocks = layout.scan_markers(grid, spec.first_block_row, spec.stride, spec.allowed_years);

    let mut assembler = DocumentAssembler::new(policy);

    for block in blocks {
        for row in block.data_start..block.data_end {
            let Some(entity) = grid.label(row, spec.entity_col) else {
                continue;
            };
            assembler.ensure_entity(&entity, spec.fields.iter().copied());

            for &(col, name) in &field_cols {
                if let Some(value) = grid.number(row, col) {
                    assembler.assign(&entity, name, block.year, value, spec.precision)?;
                }
            }
        }
    }

    Ok(assembler.finish())
}

/// 把字段名列表解析为 (列索引, 字段名) 对
fn resolve_fields(
    grid: &SheetGrid,
    header_row: usize,
    sheet: &str,
    fields: &'static [&'static str],
) -> Result<Vec<(usize, &'static str)>, EnerSheetError> {
    fields
        .iter()
        .map(|&name| {
            grid.column_index(header_row, name)
                .map(|col| (col, name))
                .ok_or_else(|| EnerSheetError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: name.to_string(),
                })
        })
        .collect()
}
