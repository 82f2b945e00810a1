//! Public API Types
//!
//! 定义公开 API 使用的枚举类型。

use crate::datasets::DatasetKind;

/// 重复行处理策略
///
/// 同一 (entity, field, year) 在源表中出现多次且数值不同时的
/// 处理方式。重复冲突通常意味着上游导出存在数据完整性问题。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DuplicatePolicy {
    /// 静默保留最后写入的值
    ///
    /// 与参考导出脚本的行为一致，仅用于兼容旧流程。
    Overwrite,

    /// 告警后保留最后写入的值（默认）
    ///
    /// 通过 `tracing::warn!` 记录实体、字段、年份与两个冲突值。
    #[default]
    Warn,

    /// 视为硬错误
    ///
    /// 冲突使该数据集以 `ConflictingDuplicate` 失败；
    /// 其余数据集不受影响。
    Strict,
}

/// 数据集选择方式
///
/// 指定一次转换要处理哪些数据集。
///
/// # 使用示例
///
/// ```rust,no_run
/// use enersheet::{ConverterBuilder, DatasetKind, DatasetSelector};
///
/// # fn main() -> Result<(), enersheet::EnerSheetError> {
/// // 只转换一次能源与排放两个数据集
/// let converter = ConverterBuilder::new()
///     .with_datasets(DatasetSelector::Only(vec![
///         DatasetKind::PrimaryEnergy,
///         DatasetKind::Emissions,
///     ]))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DatasetSelector {
    /// 全部数据集（默认）
    #[default]
    All,

    /// 仅指定的数据集，按给定顺序处理
    Only(Vec<DatasetKind>),
}

impl DatasetSelector {
    /// 展开为实际要处理的数据集列表
    pub fn resolve(&self) -> Vec<DatasetKind> {
        match self {
            DatasetSelector::All => DatasetKind::ALL.to_vec(),
            DatasetSelector::Only(kinds) => kinds.clone(),
        }
    }
}
