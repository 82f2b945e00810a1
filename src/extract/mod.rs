//! Extractors Module
//!
//! 各类表版式到规范文档的抽取器。

pub mod matrix;
pub mod series;

pub use matrix::{extract_transfer_matrix, MatrixLayout};
pub use series::{extract_block_table, extract_wide_table, BlockTableSpec, ColumnRef, WideTableSpec};
