//! Builder Module
//!
//! 提供 Fluent Builder API，分步构建 `Converter` 实例；
//! `Converter` 是正向转换（结果工作簿 → 各数据集 JSON 文档）的
//! 门面，并承担逐数据集的故障隔离。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::api::{DatasetSelector, DuplicatePolicy};
use crate::datasets::{DatasetDocument, DatasetKind};
use crate::error::EnerSheetError;
use crate::grid::SheetSource;
use crate::workbook::ExcelWorkbook;

/// 转换配置
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// 重复行处理策略
    pub duplicate_policy: DuplicatePolicy,

    /// 数据集选择
    pub datasets: DatasetSelector,
}

/// `Converter` 的 Fluent Builder
///
/// 所有配置项都有默认值，只需覆盖关心的项。
///
/// # 使用示例
///
/// ```rust,no_run
/// use enersheet::{ConverterBuilder, DuplicatePolicy};
///
/// # fn main() -> Result<(), enersheet::EnerSheetError> {
/// let converter = ConverterBuilder::new()
///     .with_duplicate_policy(DuplicatePolicy::Strict)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// 以默认配置新建 Builder
    ///
    /// # 默认配置
    ///
    /// - 重复策略：告警后保留最后写入（`Warn`）
    /// - 数据集：全部
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定重复行处理策略
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// 指定要处理的数据集
    pub fn with_datasets(mut self, selector: DatasetSelector) -> Self {
        self.config.datasets = selector;
        self
    }

    /// 校验配置并生成 `Converter`
    ///
    /// # 错误
    ///
    /// - `EnerSheetError::Config`: 数据集选择列表为空或含重复项
    pub fn build(self) -> Result<Converter, EnerSheetError> {
        if let DatasetSelector::Only(kinds) = &self.config.datasets {
            if kinds.is_empty() {
                return Err(EnerSheetError::Config(
                    "dataset selection must not be empty".to_string(),
                ));
            }
            for (i, kind) in kinds.iter().enumerate() {
                if kinds[..i].contains(kind) {
                    return Err(EnerSheetError::Config(format!(
                        "dataset '{}' selected more than once",
                        kind.name()
                    )));
                }
            }
        }

        Ok(Converter {
            config: self.config,
        })
    }
}

/// 正向转换门面
///
/// # 处理流程
///
/// 1. 打开结果工作簿（整体打开一次，打不开则整个转换失败）。
/// 2. 严格顺序逐个处理选定的数据集：加载网格 → 抽取 → 写出文档。
/// 3. 每个数据集有独立的错误边界：失败记入报告并继续下一个，
///    一张损坏的表不会中止其余数据集的抽取。
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// 转换整个结果工作簿，输出各数据集的 JSON 文档
    ///
    /// # 参数
    ///
    /// * `workbook_path` - 结果工作簿路径
    /// * `out_dir` - 输出目录（不存在则创建），文档按数据集固定文件名写入
    ///
    /// # 返回值
    ///
    /// `Ok(ConversionReport)`，其中记录每个数据集的成功路径或失败原因。
    /// 仅当工作簿本身不可读或输出目录不可创建时返回 `Err`。
    pub fn convert_results<P, Q>(
        &self,
        workbook_path: P,
        out_dir: Q,
    ) -> Result<ConversionReport, EnerSheetError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;
        let mut workbook = ExcelWorkbook::open(workbook_path)?;

        let mut report = ConversionReport::default();
        for kind in self.config.datasets.resolve() {
            match self.run_dataset(&mut workbook, kind, out_dir) {
                Ok(path) => {
                    tracing::info!(dataset = kind.name(), path = %path.display(), "dataset written");
                    report.written.push((kind, path));
                }
                Err(error) => {
                    tracing::error!(dataset = kind.name(), %error, "dataset failed, continuing");
                    report.failed.push((kind, error));
                }
            }
        }

        Ok(report)
    }

    /// 从任意数据源抽取单个数据集的规范文档
    ///
    /// 文件之外的数据源（如测试中的内存表）也可使用。
    pub fn extract_dataset<S: SheetSource>(
        &self,
        source: &mut S,
        kind: DatasetKind,
    ) -> Result<DatasetDocument, EnerSheetError> {
        kind.extract(source, self.config.duplicate_policy)
    }

    /// 单个数据集的错误边界：抽取并写出
    fn run_dataset(
        &self,
        workbook: &mut ExcelWorkbook,
        kind: DatasetKind,
        out_dir: &Path,
    ) -> Result<PathBuf, EnerSheetError> {
        let document = kind.extract(workbook, self.config.duplicate_policy)?;
        let path = out_dir.join(kind.output_file());
        write_pretty_json(&path, &document)?;
        Ok(path)
    }
}

/// 把文档以 4 空格缩进的 JSON 写入文件
///
/// 缩进宽度与下游消费的既有文档一致。写完即冲刷，任何退出
/// 路径上文件都已关闭。
pub(crate) fn write_pretty_json<T: Serialize>(
    path: &Path,
    document: &T,
) -> Result<(), EnerSheetError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    document.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

/// 一次转换的结果报告
///
/// 成功与失败按数据集逐项记录；失败项带底层原因，供调用方
/// 打印或上抛。
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// 成功写出的数据集与文档路径
    pub written: Vec<(DatasetKind, PathBuf)>,

    /// 失败的数据集与原因
    pub failed: Vec<(DatasetKind, EnerSheetError)>,
}

impl ConversionReport {
    /// 是否全部数据集都成功
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let converter = ConverterBuilder::new().build().unwrap();
        assert_eq!(converter.config.duplicate_policy, DuplicatePolicy::Warn);
        assert_eq!(converter.config.datasets, DatasetSelector::All);
    }

    #[test]
    fn test_build_rejects_empty_selection() {
        let result = ConverterBuilder::new()
            .with_datasets(DatasetSelector::Only(Vec::new()))
            .build();
        assert!(matches!(result, Err(EnerSheetError::Config(_))));
    }

    #[test]
    fn test_build_rejects_duplicate_selection() {
        let result = ConverterBuilder::new()
            .with_datasets(DatasetSelector::Only(vec![
                DatasetKind::Emissions,
                DatasetKind::Emissions,
            ]))
            .build();
        match result {
            Err(EnerSheetError::Config(msg)) => assert!(msg.contains("emissions")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_convert_results_missing_workbook_is_fatal() {
        let converter = ConverterBuilder::new().build().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = converter.convert_results(dir.path().join("absent.xlsx"), dir.path());
        assert!(matches!(result, Err(EnerSheetError::Io(_))));
    }

    #[test]
    fn test_report_completeness() {
        let mut report = ConversionReport::default();
        assert!(report.is_complete());

        report.failed.push((
            DatasetKind::Emissions,
            EnerSheetError::MissingSheet {
                sheet: "FinalEmission".to_string(),
            },
        ));
        assert!(!report.is_complete());
    }
}
