//! Tabular Module
//!
//! 逆向路径：把国家汇总文档（嵌套键值 JSON）展平为表格并写出
//! 为一个多表工作簿。每个类别一张表：一行一个字段，一列一个
//! 年份；排放类别转置为"年份行、数值列"。表名与表头是下游
//! 报表的固定中文标题。

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Deserialize;

use crate::error::EnerSheetError;

/// 汇总序列：年份 → 数值或 null
pub type SummarySeries = BTreeMap<String, Option<f64>>;

/// 汇总类别：字段 → 年份序列
pub type SummaryCategory = BTreeMap<String, SummarySeries>;

/// 国家汇总文档
///
/// 顶层键 `NATION` 之下的类别集合。所有类别可选，缺席的类别
/// 在导出时跳过。
#[derive(Debug, Default, Deserialize)]
pub struct NationDocument {
    /// 资源上限
    #[serde(default)]
    pub resource: Option<SummaryCategory>,

    /// 发电结构
    #[serde(default)]
    pub elc_mix: Option<SummaryCategory>,

    /// 电力总装机
    #[serde(default)]
    pub cap: Option<SummaryCategory>,

    /// 电力新增装机
    #[serde(default)]
    pub newcap: Option<SummaryCategory>,

    /// 一次能源
    #[serde(default)]
    pub pe: Option<SummaryCategory>,

    /// 氢能供应
    #[serde(default)]
    pub h2n: Option<SummaryCategory>,

    /// 电力投资
    #[serde(default)]
    pub investment: Option<SummaryCategory>,

    /// 排放汇总（FE / SUPPLY / TOTAL 三个子序列）
    #[serde(default)]
    pub emissions: Option<EmissionsSummary>,
}

/// 排放汇总子文档
#[derive(Debug, Default, Deserialize)]
pub struct EmissionsSummary {
    /// 终端排放
    #[serde(rename = "FE", default)]
    pub fe: Option<SummarySeries>,

    /// 供应排放
    #[serde(rename = "SUPPLY", default)]
    pub supply: Option<SummarySeries>,

    /// 总排放
    #[serde(rename = "TOTAL", default)]
    pub total: Option<SummarySeries>,
}

/// 文件顶层包装：`{"NATION": {...}}`
#[derive(Debug, Default, Deserialize)]
struct NationFile {
    #[serde(rename = "NATION", default)]
    nation: NationDocument,
}

/// 展平后的一张表
///
/// 首行是表头：`label_header` 后接各数据列名；其后一行一条
/// 记录，`None` 单元格留空。类别表的数据列是升序年份；排放
/// 转置表只有一个数值列，记录行是年份。
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    /// 首列表头（字段类别名，如 `资源类型`）
    pub label_header: String,

    /// 数据列名
    pub columns: Vec<String>,

    /// 记录行：(标签, 按列取值)
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

impl SeriesTable {
    /// 把一个类别展平为"字段行 × 年份列"的表
    ///
    /// 年份列取全部字段年份键的并集，升序；字段在某年缺值则
    /// 该单元格为空。
    pub fn from_category(label_header: &str, category: &SummaryCategory) -> Self {
        let years: BTreeSet<&String> = category.values().flat_map(|series| series.keys()).collect();
        let columns: Vec<String> = years.iter().map(|year| (*year).clone()).collect();

        let rows = category
            .iter()
            .map(|(field, series)| {
                let values = columns
                    .iter()
                    .map(|year| series.get(year).copied().flatten())
                    .collect();
                (field.clone(), values)
            })
            .collect();

        Self {
            label_header: label_header.to_string(),
            columns,
            rows,
        }
    }

    /// 把单个序列转置为"年份行、数值列"的表（排放表的目标朝向）
    pub fn transposed(label_header: &str, value_header: &str, series: &SummarySeries) -> Self {
        Self {
            label_header: label_header.to_string(),
            columns: vec![value_header.to_string()],
            rows: series
                .iter()
                .map(|(year, value)| (year.clone(), vec![*value]))
                .collect(),
        }
    }

    /// 写入一个工作表
    fn write_to(&self, worksheet: &mut Worksheet) -> Result<(), EnerSheetError> {
        worksheet.write_string(0, 0, &self.label_header)?;
        for (idx, column) in self.columns.iter().enumerate() {
            worksheet.write_string(0, (idx + 1) as u16, column)?;
        }

        for (row_idx, (label, values)) in self.rows.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            worksheet.write_string(row, 0, label)?;
            for (col_idx, value) in values.iter().enumerate() {
                if let Some(value) = value {
                    worksheet.write_number(row, (col_idx + 1) as u16, *value)?;
                }
            }
        }

        Ok(())
    }
}

/// 类别表的 (表名, 首列表头)，与文档字段的固定顺序一一对应
const CATEGORY_SHEETS: &[(&str, &str)] = &[
    ("资源上限", "资源类型"),
    ("发电结构", "发电技术"),
    ("电力装机", "电力装机技术"),
    ("新增装机", "新增装机技术"),
    ("一次能源", "能源类型"),
    ("氢能供应", "氢能制备技术"),
    ("电力投资", "投资技术类型"),
];

/// 排放转置表：(子序列, 表名, 数值列表头)
const EMISSION_SHEETS: &[(&str, &str)] = &[
    ("终端排放", "终端排放量(亿吨)"),
    ("供应排放", "供应排放量(亿吨)"),
    ("总排放", "总排放量(亿吨)"),
];

impl NationDocument {
    /// 按固定顺序列出存在的类别
    fn present_categories(&self) -> Vec<(&'static str, &'static str, &SummaryCategory)> {
        let slots = [
            &self.resource,
            &self.elc_mix,
            &self.cap,
            &self.newcap,
            &self.pe,
            &self.h2n,
            &self.investment,
        ];
        slots
            .iter()
            .zip(CATEGORY_SHEETS)
            .filter_map(|(slot, &(sheet, label))| {
                slot.as_ref().map(|category| (sheet, label, category))
            })
            .collect()
    }

    /// 按固定顺序列出存在的排放子序列
    fn present_emissions(&self) -> Vec<(&'static str, &'static str, &SummarySeries)> {
        let Some(emissions) = &self.emissions else {
            return Vec::new();
        };
        [&emissions.fe, &emissions.supply, &emissions.total]
            .iter()
            .zip(EMISSION_SHEETS)
            .filter_map(|(slot, &(sheet, header))| {
                slot.as_ref().map(|series| (sheet, header, series))
            })
            .collect()
    }
}

/// 读入国家汇总文档
///
/// # 错误
///
/// - `EnerSheetError::Io`: 文件不存在或不可读
/// - `EnerSheetError::Json`: 不是合法 JSON 或形态不符
pub fn read_nation_document<P: AsRef<Path>>(path: P) -> Result<NationDocument, EnerSheetError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let parsed: NationFile = serde_json::from_reader(reader)?;
    Ok(parsed.nation)
}

/// 把国家汇总文档导出为多表工作簿
///
/// 每个存在的类别一张表；排放拆为三张转置表。一趟写完并保存。
pub fn write_nation_workbook<P: AsRef<Path>>(
    document: &NationDocument,
    path: P,
) -> Result<(), EnerSheetError> {
    let mut workbook = Workbook::new();

    for (sheet, label, category) in document.present_categories() {
        let table = SeriesTable::from_category(label, category);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet)?;
        table.write_to(worksheet)?;
        tracing::debug!(sheet, rows = table.rows.len(), "category sheet written");
    }

    for (sheet, header, series) in document.present_emissions() {
        let table = SeriesTable::transposed("年份", header, series);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet)?;
        table.write_to(worksheet)?;
        tracing::debug!(sheet, rows = table.rows.len(), "emission sheet written");
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

/// 读入汇总文档并导出工作簿（逆向路径的一站式入口）
pub fn export_nation_workbook<P, Q>(json_path: P, xlsx_path: Q) -> Result<(), EnerSheetError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let document = read_nation_document(json_path)?;
    write_nation_workbook(&document, xlsx_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(&str, Option<f64>)]) -> SummarySeries {
        pairs
            .iter()
            .map(|&(year, value)| (year.to_string(), value))
            .collect()
    }

    #[test]
    fn test_from_category_year_columns_sorted_union() {
        let mut category = SummaryCategory::new();
        category.insert(
            "coal".to_string(),
            series(&[("2030", Some(1.0)), ("2025", Some(2.0))]),
        );
        category.insert("wind".to_string(), series(&[("2035", Some(3.0))]));

        let table = SeriesTable::from_category("能源类型", &category);
        assert_eq!(table.columns, vec!["2025", "2030", "2035"]);
        assert_eq!(table.rows.len(), 2);

        // coal 行：2035 缺值留空
        let (label, values) = &table.rows[0];
        assert_eq!(label, "coal");
        assert_eq!(values, &vec![Some(2.0), Some(1.0), None]);

        let (label, values) = &table.rows[1];
        assert_eq!(label, "wind");
        assert_eq!(values, &vec![None, None, Some(3.0)]);
    }

    #[test]
    fn test_transposed_years_as_rows() {
        let table = SeriesTable::transposed(
            "年份",
            "总排放量(亿吨)",
            &series(&[("2025", Some(95.5)), ("2030", None)]),
        );

        assert_eq!(table.label_header, "年份");
        assert_eq!(table.columns, vec!["总排放量(亿吨)"]);
        assert_eq!(
            table.rows,
            vec![
                ("2025".to_string(), vec![Some(95.5)]),
                ("2030".to_string(), vec![None]),
            ]
        );
    }

    #[test]
    fn test_nation_document_from_json() {
        let raw = r#"{
            "NATION": {
                "pe": {"coal": {"2025": 1.5, "2030": null}},
                "emissions": {"FE": {"2025": 10.0}, "TOTAL": {"2025": 12.0}}
            }
        }"#;
        let parsed: NationFile = serde_json::from_str(raw).unwrap();
        let doc = parsed.nation;

        let pe = doc.pe.as_ref().expect("pe present");
        assert_eq!(pe["coal"]["2025"], Some(1.5));
        assert_eq!(pe["coal"]["2030"], None);
        assert!(doc.resource.is_none());

        // 排放缺 SUPPLY：仅导出存在的两张表
        assert_eq!(doc.present_emissions().len(), 2);
        assert_eq!(doc.present_categories().len(), 1);
    }

    #[test]
    fn test_missing_nation_key_yields_empty_document() {
        let parsed: NationFile = serde_json::from_str("{}").unwrap();
        assert!(parsed.nation.present_categories().is_empty());
        assert!(parsed.nation.present_emissions().is_empty());
    }

    // 往返律：类别 → 表 → 类别，数值不变
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// 表 → 类别的逆展平（仅测试用）
        fn category_from_table(table: &SeriesTable) -> SummaryCategory {
            let mut category = SummaryCategory::new();
            for (label, values) in &table.rows {
                let series = category.entry(label.clone()).or_default();
                for (year, value) in table.columns.iter().zip(values) {
                    if let Some(value) = value {
                        series.insert(year.clone(), Some(*value));
                    }
                }
            }
            category
        }

        fn arb_category() -> impl Strategy<Value = SummaryCategory> {
            let year = prop::sample::select(vec!["2025", "2030", "2035", "2040"]);
            let field = prop::sample::select(vec!["coal", "gas", "wind", "pv", "hydro"]);
            let series = prop::collection::btree_map(
                year.prop_map(|y| y.to_string()),
                (-1000.0f64..1000.0).prop_map(|v| {
                    // 与抽取端一致：先按固定精度舍入再入档
                    Some(crate::document::round_to(v, 3))
                }),
                1..4,
            );
            prop::collection::btree_map(field.prop_map(|f| f.to_string()), series, 1..5)
        }

        proptest! {
            #[test]
            fn test_category_table_round_trip(category in arb_category()) {
                let table = SeriesTable::from_category("字段", &category);
                let rebuilt = category_from_table(&table);
                prop_assert_eq!(rebuilt, category);
            }
        }
    }
}
