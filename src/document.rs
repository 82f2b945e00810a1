//! Document Module
//!
//! 规范文档的装配：把抽取出的实体序列合并进
//! `实体 → 字段 → 年份 → 数值` 形态，统一施加字段精度舍入，
//! 并按配置的重复策略处理冲突行。

use crate::api::DuplicatePolicy;
use crate::error::EnerSheetError;
use crate::types::{EntityDocument, YearSeries};

/// 按固定小数位数舍入（远离零的四舍五入）
///
/// 精度是字段级固定值：1、2 或 3 位小数，随数据集描述符给出。
pub fn round_to(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    (value * factor).round() / factor
}

/// 规范文档装配器
///
/// 一次抽取构建一个文档。赋值路径集中在 `assign`，便于统一
/// 执行舍入、允许年份过滤之外的最后一道检查：重复 (entity,
/// field, year) 且值不同时按策略告警、覆盖或报错。
///
/// 实体的字段表在首次触达时即以全部已知字段初始化为空序列，
/// 下游消费者因此总能按字段名解析，即使该实体某字段全程无数据。
pub struct DocumentAssembler {
    doc: EntityDocument,
    policy: DuplicatePolicy,
}

impl DocumentAssembler {
    /// 以指定重复策略新建装配器
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            doc: EntityDocument::new(),
            policy,
        }
    }

    /// 确保实体存在，并把全部已知字段初始化为空序列
    ///
    /// 必须在任何赋值之前调用（抽取器在读到实体行时即调用）。
    pub fn ensure_entity<'a, I>(&mut self, entity: &str, fields: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let field_map = self.doc.entry(entity.to_string()).or_default();
        for field in fields {
            field_map.entry(field.to_string()).or_insert_with(YearSeries::new);
        }
    }

    /// 写入一个 (entity, field, year) 数值
    ///
    /// 数值先按 `precision` 舍入再比较、写入。已有不同值时：
    ///
    /// - `Overwrite`: 静默以新值覆盖（参考实现行为）
    /// - `Warn`: `tracing::warn!` 后覆盖（默认）
    /// - `Strict`: 返回 `ConflictingDuplicate`，整个数据集失败
    ///
    /// 相同值的重复行不视为冲突。
    pub fn assign(
        &mut self,
        entity: &str,
        field: &str,
        year: i32,
        value: f64,
        precision: u8,
    ) -> Result<(), EnerSheetError> {
        let rounded = round_to(value, precision);
        let series = self
            .doc
            .entry(entity.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(YearSeries::new);

        let key = year.to_string();
        if let Some(&existing) = series.get(&key) {
            if existing != rounded {
                match self.policy {
                    DuplicatePolicy::Overwrite => {}
                    DuplicatePolicy::Warn => {
                        tracing::warn!(
                            entity,
                            field,
                            year,
                            existing,
                            incoming = rounded,
                            "duplicate row with conflicting value, keeping last write"
                        );
                    }
                    DuplicatePolicy::Strict => {
                        return Err(EnerSheetError::ConflictingDuplicate {
                            entity: entity.to_string(),
                            field: field.to_string(),
                            year,
                            existing,
                            incoming: rounded,
                        });
                    }
                }
            }
        }

        series.insert(key, rounded);
        Ok(())
    }

    /// 取出装配完成的文档
    pub fn finish(self) -> EntityDocument {
        self.doc
    }
}
