//! Types Module
//!
//! 定义整个 crate 共用的基础数据类型：单元格值模型与
//! 各数据集的规范文档（嵌套键值）形态别名。

use std::collections::BTreeMap;

use calamine::Data;

/// 单元格的值
///
/// 网格中每个单元格归一化为这五种形态之一。calamine 的日期 /
/// 时长等变体在本工具的固定版式中不会出现，读入时折叠为数值或文本。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数值（f64，整数列也按 f64 读入）
    Number(f64),

    /// 文本
    Text(String),

    /// 逻辑值
    Bool(bool),

    /// 公式错误值（如 #DIV/0!、#N/A）
    Error(String),

    /// 空单元格
    Empty,
}

impl CellValue {
    /// 判断是否为空单元格
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 以数值读取
    ///
    /// 仅 `Number` 变体返回 `Some`；非数值、非空的单元格按"缺失"
    /// 处理（序列字段的回退策略），不做字符串到数值的宽松转换。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 以实体键读取（去除首尾空白的非空字符串）
    ///
    /// 省份代码列在部分表中是数值单元格（如 `11`），按整数格式
    /// 渲染为键，与下游文档的键形态一致。
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            _ => None,
        }
    }

    /// 以年份读取
    ///
    /// 年份标记通常是数值单元格；文本形式的数字串也接受。
    pub fn as_year(&self) -> Option<i32> {
        match self {
            CellValue::Number(n) => Some(*n as i32),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i32>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i32))
            }
            _ => None,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        }
    }
}

/// 年份序列：年份（字符串键）→ 数值
///
/// 使用 `BTreeMap`：年份键定宽（四位数字），字典序即数值序，
/// 序列化结果天然有序、可复现。
pub type YearSeries = BTreeMap<String, f64>;

/// 字段序列集：字段名 → 年份序列
pub type FieldSeries = BTreeMap<String, YearSeries>;

/// 形态 A 规范文档：实体 → 字段 → 年份 → 数值
///
/// 一次能源、发电结构、装机、氢能、投资、资源潜力等
/// 按省多字段数据集共用此形态。
pub type EntityDocument = BTreeMap<String, FieldSeries>;

/// 可空年份序列：缺测年份保留显式 `null`（仅排放文档使用）
pub type NullableYearSeries = BTreeMap<String, Option<f64>>;

/// 排放文档：省份 → 指标（FE / SUPPLY / TOTAL）→ 年份 → 数值或 null
pub type EmissionsDocument = BTreeMap<String, BTreeMap<String, NullableYearSeries>>;

/// 形态 C 传输矩阵文档：年份 → 送端 → 受端 → 传输量
pub type TransferMatrix = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// 化石能源开采-调入-调出文档：省份 → 燃料 → 指标 → 数值（无年份维度）
pub type FossilTradeDocument = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

#[cfg(test)]
mod tests {
    use super::*;

    // CellValue 基本判定测试
    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(42.0).is_empty());
        assert!(!CellValue::Text("ANHU".to_string()).is_empty());
        assert!(!CellValue::Error("#DIV/0!".to_string()).is_empty());
    }

    #[test]
    fn test_as_number_only_for_numbers() {
        assert_eq!(CellValue::Number(12.5).as_number(), Some(12.5));
        // 非数值、非空单元格按缺失处理
        assert_eq!(CellValue::Text("12.5".to_string()).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Error("#N/A".to_string()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_as_label_trims_whitespace() {
        assert_eq!(
            CellValue::Text("  ANHU ".to_string()).as_label(),
            Some("ANHU".to_string())
        );
        assert_eq!(CellValue::Text("   ".to_string()).as_label(), None);
        assert_eq!(CellValue::Empty.as_label(), None);
    }

    #[test]
    fn test_as_label_renders_integer_codes() {
        // 省份代码列可能是数值单元格
        assert_eq!(CellValue::Number(11.0).as_label(), Some("11".to_string()));
        assert_eq!(CellValue::Number(2.5).as_label(), Some("2.5".to_string()));
    }

    #[test]
    fn test_as_year() {
        assert_eq!(CellValue::Number(2030.0).as_year(), Some(2030));
        assert_eq!(CellValue::Text("2030".to_string()).as_year(), Some(2030));
        assert_eq!(CellValue::Text("2030.0".to_string()).as_year(), Some(2030));
        assert_eq!(CellValue::Text("n/a".to_string()).as_year(), None);
        assert_eq!(CellValue::Empty.as_year(), None);
    }

    // calamine Data 转换测试
    #[test]
    fn test_from_calamine_data() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(CellValue::from(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            CellValue::from(&Data::String("BEIJ".to_string())),
            CellValue::Text("BEIJ".to_string())
        );
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_year_series_keys_sorted_numerically() {
        let mut series = YearSeries::new();
        series.insert("2060".to_string(), 1.0);
        series.insert("2025".to_string(), 2.0);
        series.insert("2040".to_string(), 3.0);

        let keys: Vec<&str> = series.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["2025", "2040", "2060"]);
    }
}
