//! Datasets Module
//!
//! 十个数据集的声明式版式描述符与抽取入口。表名、列名、精度、
//! 允许年份集与块起始行都是优化模型导出的固定约定，集中声明在
//! 这里：新版式通过增补描述符支持，不触碰抽取逻辑。

use std::collections::BTreeSet;

use serde::Serialize;

use crate::api::DuplicatePolicy;
use crate::document::round_to;
use crate::error::EnerSheetError;
use crate::extract::{
    extract_block_table, extract_transfer_matrix, extract_wide_table, BlockTableSpec, ColumnRef,
    MatrixLayout, WideTableSpec,
};
use crate::grid::{SheetGrid, SheetSource};
use crate::types::{
    EmissionsDocument, EntityDocument, FossilTradeDocument, NullableYearSeries, TransferMatrix,
};

/// 逐年数据集的允许年份：2020–2060，每 5 年
pub const YEARS_2020_2060: &[i32] = &[2020, 2025, 2030, 2035, 2040, 2045, 2050, 2055, 2060];

/// 排放与资源潜力的允许年份：2025–2060，每 5 年
pub const YEARS_2025_2060: &[i32] = &[2025, 2030, 2035, 2040, 2045, 2050, 2055, 2060];

/// 传输矩阵的年份 → 块起始行（33 = 表头行 + 30 省 + 2 空行）
const MATRIX_YEAR_ROWS: &[(i32, usize)] =
    &[(2020, 0), (2030, 33), (2040, 66), (2050, 99), (2060, 132)];

/// 传输矩阵与氢能表的省份数
const PROVINCE_COUNT: usize = 30;

const PE_FIELDS: &[&str] = &[
    "Coal", "Coal CCS", "Oil", "Oil CCS", "Gas", "Gas CCS", "Nuclear", "Hydro", "Biomass",
    "Biomass CCS", "Wind", "PV",
];

const ELC_FIELDS: &[&str] = &[
    "coal", "coal ccs", "oil", "gas", "gas ccs", "nuclear", "hydro", "biomass", "biomass ccs",
    "co-firing beccs", "wind", "pv",
];

const INV_FIELDS: &[&str] = &[
    "fossil", "fossil ccs", "nuclear", "hydro", "biomass", "biomass ccs", "wind", "pv",
];

const H2N_FIELDS: &[&str] = &["ELC", "solar", "onshore", "offshore"];

const PE_SPEC: WideTableSpec = WideTableSpec {
    sheet: "PE",
    header_row: 0,
    year_col: ColumnRef::Name("Year"),
    entity_col: ColumnRef::Name("Province"),
    fields: PE_FIELDS,
    precision: 1,
    allowed_years: YEARS_2020_2060,
};

const GENERATION_SPEC: WideTableSpec = WideTableSpec {
    sheet: "Generation",
    header_row: 0,
    year_col: ColumnRef::Index(0),
    entity_col: ColumnRef::Index(1),
    fields: ELC_FIELDS,
    precision: 1,
    allowed_years: YEARS_2020_2060,
};

const CAPACITY_SPEC: WideTableSpec = WideTableSpec {
    sheet: "Capacity",
    precision: 2,
    ..GENERATION_SPEC
};

const NEWCAP_SPEC: WideTableSpec = WideTableSpec {
    sheet: "CAP_new",
    precision: 2,
    ..GENERATION_SPEC
};

const INVESTMENT_SPEC: WideTableSpec = WideTableSpec {
    sheet: "Investment",
    fields: INV_FIELDS,
    precision: 3,
    ..GENERATION_SPEC
};

const H2N_SPEC: BlockTableSpec = BlockTableSpec {
    sheet: "H2N",
    header_row: 0,
    first_block_row: 1,
    stride: PROVINCE_COUNT,
    entity_rows: PROVINCE_COUNT,
    marker_col: 0,
    entity_col: 1,
    fields: H2N_FIELDS,
    precision: 2,
    allowed_years: YEARS_2020_2060,
};

const TRANSELC_LAYOUT: MatrixLayout = MatrixLayout {
    year_blocks: MATRIX_YEAR_ROWS,
    entity_count: PROVINCE_COUNT,
};

/// 排放数据集的三张表与输出指标键
const EMISSION_SHEETS: &[(&str, &str)] = &[
    ("FinalEmission", "FE"),
    ("SupplyEmission", "SUPPLY"),
    ("TotalEmission", "TOTAL"),
];

const EMISSIONS_PRECISION: u8 = 3;

/// 化石能源表：燃料 → (指标, 列名)
const FOSSIL_FUELS: &[(&str, &[(&str, &str)])] = &[
    (
        "coal",
        &[
            ("extraction", "coal-extract"),
            ("import", "coal-in"),
            ("export", "coal-out"),
        ],
    ),
    (
        "oil",
        &[
            ("extraction", "oil-extract"),
            ("import", "oil-in"),
            ("export", "oil-out"),
        ],
    ),
    (
        "gas",
        &[
            ("extraction", "gas-extract"),
            ("import", "gas-in"),
            ("export", "gas-out"),
        ],
    ),
];

const FOSSIL_PRECISION: u8 = 1;

/// 资源潜力字段：输出键 → 求和的源列与缩放系数
struct ResourceField {
    key: &'static str,
    columns: &'static [&'static str],
    scale: f64,
}

const RESOURCE_FIELDS: &[ResourceField] = &[
    // 煤炭潜力以千为单位折算
    ResourceField {
        key: "coal",
        columns: &["coal"],
        scale: 1e-3,
    },
    ResourceField {
        key: "oil",
        columns: &["oil"],
        scale: 1.0,
    },
    ResourceField {
        key: "gas",
        columns: &["gas"],
        scale: 1.0,
    },
    ResourceField {
        key: "nuclear",
        columns: &["nuclear"],
        scale: 1.0,
    },
    ResourceField {
        key: "biomass",
        columns: &["biomass"],
        scale: 1.0,
    },
    ResourceField {
        key: "hydro",
        columns: &["hydro"],
        scale: 1.0,
    },
    // 风电潜力 = 陆上 + 海上
    ResourceField {
        key: "wind",
        columns: &["onwind", "offwind"],
        scale: 1.0,
    },
    ResourceField {
        key: "solar",
        columns: &["pv"],
        scale: 1.0,
    },
];

const RESOURCE_PRECISION: u8 = 2;

/// 资源潜力表的有效实体行数，之后是说明文字行
const RESOURCE_ENTITY_ROWS: usize = 30;

/// 数据集种类
///
/// 每个数据集对应源工作簿中一组固定版式的表与一个输出文档。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// 一次能源消费（表 `PE` → `pe.json`）
    PrimaryEnergy,
    /// 发电结构（表 `Generation` → `elc_mix.json`）
    GenerationMix,
    /// 电力总装机（表 `Capacity` → `cap.json`）
    Capacity,
    /// 电力新增装机（表 `CAP_new` → `newcap.json`）
    NewCapacity,
    /// 氢能制备（表 `H2N` → `h2n.json`）
    HydrogenSupply,
    /// 电力投资（表 `Investment` → `inv.json`）
    Investment,
    /// 排放（表 `FinalEmission`/`SupplyEmission`/`TotalEmission` → `emissions.json`）
    Emissions,
    /// 省际电力传输矩阵（表 `TransElc` → `elc_matrix.json`）
    TransferMatrix,
    /// 煤油气开采-调入-调出（表 `Mine_ImExport` → `2020_pe_fossil.json`）
    FossilTrade,
    /// 资源潜力（表 `Resource` → `resource.json`）
    ResourcePotential,
}

impl DatasetKind {
    /// 全部数据集，驱动器的默认处理顺序
    pub const ALL: [DatasetKind; 10] = [
        DatasetKind::PrimaryEnergy,
        DatasetKind::GenerationMix,
        DatasetKind::Capacity,
        DatasetKind::NewCapacity,
        DatasetKind::HydrogenSupply,
        DatasetKind::Investment,
        DatasetKind::Emissions,
        DatasetKind::TransferMatrix,
        DatasetKind::FossilTrade,
        DatasetKind::ResourcePotential,
    ];

    /// 数据集名（日志与报告用）
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::PrimaryEnergy => "primary-energy",
            DatasetKind::GenerationMix => "generation-mix",
            DatasetKind::Capacity => "capacity",
            DatasetKind::NewCapacity => "new-capacity",
            DatasetKind::HydrogenSupply => "hydrogen-supply",
            DatasetKind::Investment => "investment",
            DatasetKind::Emissions => "emissions",
            DatasetKind::TransferMatrix => "transfer-matrix",
            DatasetKind::FossilTrade => "fossil-trade",
            DatasetKind::ResourcePotential => "resource-potential",
        }
    }

    /// 输出文档文件名（下游消费者按固定名读取）
    pub fn output_file(&self) -> &'static str {
        match self {
            DatasetKind::PrimaryEnergy => "pe.json",
            DatasetKind::GenerationMix => "elc_mix.json",
            DatasetKind::Capacity => "cap.json",
            DatasetKind::NewCapacity => "newcap.json",
            DatasetKind::HydrogenSupply => "h2n.json",
            DatasetKind::Investment => "inv.json",
            DatasetKind::Emissions => "emissions.json",
            DatasetKind::TransferMatrix => "elc_matrix.json",
            DatasetKind::FossilTrade => "2020_pe_fossil.json",
            DatasetKind::ResourcePotential => "resource.json",
        }
    }

    /// 从数据源抽取本数据集的规范文档
    pub(crate) fn extract<S: SheetSource>(
        &self,
        source: &mut S,
        policy: DuplicatePolicy,
    ) -> Result<DatasetDocument, EnerSheetError> {
        match self {
            DatasetKind::PrimaryEnergy => {
                let grid = source.grid(PE_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_wide_table(
                    &grid, &PE_SPEC, policy,
                )?))
            }
            DatasetKind::GenerationMix => {
                let grid = source.grid(GENERATION_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_wide_table(
                    &grid,
                    &GENERATION_SPEC,
                    policy,
                )?))
            }
            DatasetKind::Capacity => {
                let grid = source.grid(CAPACITY_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_wide_table(
                    &grid,
                    &CAPACITY_SPEC,
                    policy,
                )?))
            }
            DatasetKind::NewCapacity => {
                let grid = source.grid(NEWCAP_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_wide_table(
                    &grid,
                    &NEWCAP_SPEC,
                    policy,
                )?))
            }
            DatasetKind::HydrogenSupply => {
                let grid = source.grid(H2N_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_block_table(
                    &grid, &H2N_SPEC, policy,
                )?))
            }
            DatasetKind::Investment => {
                let grid = source.grid(INVESTMENT_SPEC.sheet)?;
                Ok(DatasetDocument::Entity(extract_wide_table(
                    &grid,
                    &INVESTMENT_SPEC,
                    policy,
                )?))
            }
            DatasetKind::Emissions => {
                Ok(DatasetDocument::Emissions(extract_emissions(source)?))
            }
            DatasetKind::TransferMatrix => {
                let grid = source.grid("TransElc")?;
                Ok(DatasetDocument::Matrix(extract_transfer_matrix(
                    &grid,
                    &TRANSELC_LAYOUT,
                )))
            }
            DatasetKind::FossilTrade => {
                let grid = source.grid("Mine_ImExport")?;
                Ok(DatasetDocument::Fossil(extract_fossil_trade(&grid)?))
            }
            DatasetKind::ResourcePotential => {
                let grid = source.grid("Resource")?;
                Ok(DatasetDocument::Entity(extract_resource_potential(&grid)?))
            }
        }
    }
}

/// 某个数据集抽取出的规范文档
///
/// 各数据集的顶层形态不同，序列化时不带标签，直接输出内层结构。
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DatasetDocument {
    /// 形态 A：实体 → 字段 → 年份 → 数值
    Entity(EntityDocument),
    /// 排放：省份 → 指标 → 年份 → 数值或 null
    Emissions(EmissionsDocument),
    /// 形态 C：年份 → 送端 → 受端 → 传输量
    Matrix(TransferMatrix),
    /// 化石能源：省份 → 燃料 → 指标 → 数值
    Fossil(FossilTradeDocument),
}

/// 抽取排放文档
///
/// 三张表共用"年份行 × 省份列"的版式。省份取三表列名的交集
/// （字典序），年份限制在 2025–2060；缺测值保留显式 null。
fn extract_emissions<S: SheetSource>(source: &mut S) -> Result<EmissionsDocument, EnerSheetError> {
    let mut sheets = Vec::with_capacity(EMISSION_SHEETS.len());
    for &(sheet, key) in EMISSION_SHEETS {
        let grid = source.grid(sheet)?;
        let provinces: BTreeSet<String> = (1..grid.cols())
            .filter_map(|col| grid.label(0, col))
            .collect();
        sheets.push((key, grid, provinces));
    }

    // 三表共有的省份
    let mut common: BTreeSet<String> = sheets[0].2.clone();
    for (_, _, provinces) in &sheets[1..] {
        common = common.intersection(provinces).cloned().collect();
    }

    let mut doc = EmissionsDocument::new();
    for province in &common {
        let indicator_map = doc.entry(province.clone()).or_default();
        for (key, grid, _) in &sheets {
            let Some(col) = grid.column_index(0, province) else {
                continue;
            };
            let mut series = NullableYearSeries::new();
            for row in 1..grid.rows() {
                let Some(year) = grid.year(row, 0) else {
                    continue;
                };
                if !YEARS_2025_2060.contains(&year) {
                    continue;
                }
                let value = grid
                    .number(row, col)
                    .map(|v| round_to(v, EMISSIONS_PRECISION));
                series.insert(year.to_string(), value);
            }
            indicator_map.insert((*key).to_string(), series);
        }
    }

    Ok(doc)
}

/// 抽取化石能源开采-调入-调出文档
///
/// 一行一个省份；九个数值列按 (燃料, 指标) 归组。列缺失为
/// 配置错误；单个数值缺失按缺失跳过。
fn extract_fossil_trade(grid: &SheetGrid) -> Result<FossilTradeDocument, EnerSheetError> {
    // 先整体解析列，任何缺列立即失败
    let mut columns = Vec::new();
    for &(fuel, indicators) in FOSSIL_FUELS {
        for &(indicator, column) in indicators {
            let col = grid
                .column_index(0, column)
                .ok_or_else(|| EnerSheetError::MissingColumn {
                    sheet: "Mine_ImExport".to_string(),
                    column: column.to_string(),
                })?;
            columns.push((fuel, indicator, col));
        }
    }

    let mut doc = FossilTradeDocument::new();
    for row in 1..grid.rows() {
        let Some(province) = grid.label(row, 0) else {
            continue;
        };
        let fuel_map = doc.entry(province).or_default();
        for &(fuel, indicator, col) in &columns {
            if let Some(value) = grid.number(row, col) {
                fuel_map
                    .entry(fuel.to_string())
                    .or_default()
                    .insert(indicator.to_string(), round_to(value, FOSSIL_PRECISION));
            }
        }
    }

    Ok(doc)
}

/// 抽取资源潜力文档
///
/// 一行一个省份代码，数值对全部允许年份复制（潜力视为常量）。
/// 仅前 30 个数据行有效，其后是表内说明文字。
fn extract_resource_potential(grid: &SheetGrid) -> Result<EntityDocument, EnerSheetError> {
    let mut columns = Vec::new();
    for field in RESOURCE_FIELDS {
        let mut cols = Vec::with_capacity(field.columns.len());
        for &column in field.columns {
            let col = grid
                .column_index(0, column)
                .ok_or_else(|| EnerSheetError::MissingColumn {
                    sheet: "Resource".to_string(),
                    column: column.to_string(),
                })?;
            cols.push(col);
        }
        columns.push((field, cols));
    }

    let mut doc = EntityDocument::new();
    let last_row = grid.rows().min(1 + RESOURCE_ENTITY_ROWS);
    for row in 1..last_row {
        let Some(province) = grid.label(row, 0) else {
            continue;
        };
        let field_map = doc.entry(province).or_default();
        for (field, cols) in &columns {
            // 多列求和（如风电 = 陆上 + 海上）；任一列缺失则整个字段缺失
            let mut total = 0.0;
            let mut complete = true;
            for &col in cols {
                match grid.number(row, col) {
                    Some(v) => total += v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }

            let series = field_map.entry(field.key.to_string()).or_default();
            if complete {
                let value = round_to(total * field.scale, RESOURCE_PRECISION);
                for &year in YEARS_2025_2060 {
                    series.insert(year.to_string(), value);
                }
            }
        }
    }

    Ok(doc)
}
