//! Synthetic Parameters Module
//!
//! 为尚无实测数据的经济部门生成占位参数表：47 个固定部门，
//! 每个部门三个指标（能源强度、电气化率、氢气化率）的 2025–2060
//! 年份序列，数值落在按部门类别手工调定的区间内。
//!
//! 随机源由调用方显式传入，测试可用固定种子复现输出。

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::document::round_to;

/// 参数年份：2025–2060，每 5 年
const PARAM_YEARS: [i32; 8] = [2025, 2030, 2035, 2040, 2045, 2050, 2055, 2060];

/// 部门类别
///
/// 决定各指标的取值区间。类别由显式的部门表枚举给出，
/// 不做名称子串匹配，部门改名不会引起静默误分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorCategory {
    /// 居民部门（能源强度单位为 吨标煤/户）
    Residential,

    /// 农林牧渔及其初加工
    AgriForestry,

    /// 采矿、油气开采与金属冶炼
    MiningSmelting,

    /// 其余行业（默认区间）
    General,
}

/// 部门定义：编号、名称、类别
struct SectorDef {
    id: u8,
    name: &'static str,
    category: SectorCategory,
}

/// 47 个部门的显式分类表
const SECTORS: &[SectorDef] = &[
    SectorDef { id: 1, name: "1农、林、牧、渔业", category: SectorCategory::AgriForestry },
    SectorDef { id: 2, name: "2煤炭开采和洗选业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 3, name: "3石油和天然气开采业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 4, name: "4黑色金属矿采选业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 5, name: "5有色金属矿采选业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 6, name: "6非金属矿采选业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 7, name: "7其他采矿业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 8, name: "8农副食品加工业", category: SectorCategory::AgriForestry },
    SectorDef { id: 9, name: "9食品制造业", category: SectorCategory::General },
    SectorDef { id: 10, name: "10酒.饮料和精制茶制造业", category: SectorCategory::General },
    SectorDef { id: 11, name: "11烟草制品业", category: SectorCategory::General },
    SectorDef { id: 12, name: "12纺织业", category: SectorCategory::General },
    SectorDef { id: 13, name: "13纺织服装.服饰业", category: SectorCategory::General },
    SectorDef { id: 14, name: "14皮革.毛皮.羽毛及其制品和制鞋业", category: SectorCategory::General },
    SectorDef { id: 15, name: "15木材加工和木.竹.藤.棕.草制品业", category: SectorCategory::General },
    SectorDef { id: 16, name: "16家具制造业", category: SectorCategory::General },
    SectorDef { id: 17, name: "17造纸和纸制品业", category: SectorCategory::General },
    SectorDef { id: 18, name: "18印刷和记录媒介复制业", category: SectorCategory::General },
    SectorDef { id: 19, name: "19文教.工美.体育和娱乐用品制造业", category: SectorCategory::General },
    SectorDef { id: 20, name: "20石油.煤炭及其他燃料加工业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 21, name: "21化学原料和化学制品制造业", category: SectorCategory::General },
    SectorDef { id: 22, name: "22医药制造业", category: SectorCategory::General },
    SectorDef { id: 23, name: "23化学纤维制造业", category: SectorCategory::General },
    SectorDef { id: 24, name: "24橡胶和塑料制品业", category: SectorCategory::General },
    SectorDef { id: 25, name: "25非金属矿物制品业", category: SectorCategory::General },
    SectorDef { id: 26, name: "26黑色金属冶炼和压延加工业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 27, name: "27有色金属冶炼和压延加工业", category: SectorCategory::MiningSmelting },
    SectorDef { id: 28, name: "28金属制品业", category: SectorCategory::General },
    SectorDef { id: 29, name: "29通用设备制造业", category: SectorCategory::General },
    SectorDef { id: 30, name: "30专用设备制造业", category: SectorCategory::General },
    SectorDef { id: 31, name: "31汽车制造业", category: SectorCategory::General },
    SectorDef { id: 32, name: "32铁路.船舶.航空航天和其他运输设备制造业", category: SectorCategory::General },
    SectorDef { id: 33, name: "33电气机械和器材制造业", category: SectorCategory::General },
    SectorDef { id: 34, name: "34计算机.通信和其他电子设备制造业", category: SectorCategory::General },
    SectorDef { id: 35, name: "35仪器仪表制造业", category: SectorCategory::General },
    SectorDef { id: 36, name: "36其他制造业", category: SectorCategory::General },
    SectorDef { id: 37, name: "37废弃资利用业", category: SectorCategory::General },
    SectorDef { id: 38, name: "38金属制品.机械和设备修理业", category: SectorCategory::General },
    SectorDef { id: 39, name: "39电力.热力生产和供应业", category: SectorCategory::General },
    SectorDef { id: 40, name: "40燃气生产和供应业", category: SectorCategory::General },
    SectorDef { id: 41, name: "41水的生产和供应业", category: SectorCategory::General },
    SectorDef { id: 42, name: "42建筑业", category: SectorCategory::General },
    SectorDef { id: 43, name: "43交通运输、仓储和邮政业", category: SectorCategory::General },
    SectorDef { id: 44, name: "44批发和零售业、住宿和餐饮业", category: SectorCategory::General },
    SectorDef { id: 45, name: "45其他行业", category: SectorCategory::General },
    SectorDef { id: 46, name: "46城镇居民", category: SectorCategory::Residential },
    SectorDef { id: 47, name: "47乡村居民", category: SectorCategory::Residential },
];

/// 一个类别的取值区间表（每指标 8 个年份的 (下限, 上限)）
struct CategoryProfile {
    intensity_unit: &'static str,
    intensity: [(f64, f64); 8],
    electrification: [(f64, f64); 8],
    hydrogen: [(f64, f64); 8],
}

const RESIDENTIAL_PROFILE: CategoryProfile = CategoryProfile {
    intensity_unit: "吨标煤/户",
    intensity: [
        (0.8, 1.3),
        (0.7, 1.2),
        (0.6, 1.1),
        (0.5, 1.0),
        (0.4, 0.9),
        (0.3, 0.8),
        (0.25, 0.7),
        (0.2, 0.6),
    ],
    electrification: [
        (30.0, 40.0),
        (35.0, 45.0),
        (40.0, 50.0),
        (45.0, 55.0),
        (50.0, 60.0),
        (55.0, 65.0),
        (60.0, 70.0),
        (65.0, 75.0),
    ],
    hydrogen: [
        (0.0, 0.5),
        (0.5, 1.0),
        (1.0, 1.5),
        (1.5, 2.0),
        (2.0, 2.5),
        (2.5, 3.0),
        (3.0, 3.5),
        (3.5, 4.0),
    ],
};

const AGRI_PROFILE: CategoryProfile = CategoryProfile {
    intensity_unit: "吨标煤/万元",
    intensity: [
        (0.3, 0.4),
        (0.25, 0.35),
        (0.22, 0.32),
        (0.2, 0.3),
        (0.18, 0.28),
        (0.15, 0.25),
        (0.13, 0.23),
        (0.1, 0.2),
    ],
    electrification: [
        (25.0, 35.0),
        (30.0, 40.0),
        (35.0, 45.0),
        (40.0, 50.0),
        (45.0, 55.0),
        (50.0, 60.0),
        (55.0, 65.0),
        (60.0, 70.0),
    ],
    hydrogen: [
        (0.0, 0.5),
        (0.5, 1.5),
        (1.5, 2.5),
        (2.5, 3.5),
        (3.5, 4.5),
        (4.5, 5.5),
        (5.5, 6.5),
        (6.5, 7.5),
    ],
};

const MINING_PROFILE: CategoryProfile = CategoryProfile {
    intensity_unit: "吨标煤/万元",
    intensity: [
        (0.6, 0.7),
        (0.55, 0.65),
        (0.5, 0.6),
        (0.45, 0.55),
        (0.4, 0.5),
        (0.35, 0.45),
        (0.3, 0.4),
        (0.25, 0.35),
    ],
    electrification: [
        (20.0, 30.0),
        (25.0, 35.0),
        (30.0, 40.0),
        (35.0, 45.0),
        (40.0, 50.0),
        (45.0, 55.0),
        (50.0, 60.0),
        (55.0, 65.0),
    ],
    hydrogen: [
        (0.0, 1.0),
        (1.0, 3.0),
        (3.0, 5.0),
        (5.0, 7.0),
        (7.0, 9.0),
        (9.0, 11.0),
        (11.0, 13.0),
        (13.0, 16.0),
    ],
};

const GENERAL_PROFILE: CategoryProfile = CategoryProfile {
    intensity_unit: "吨标煤/万元",
    intensity: [
        (0.3, 0.5),
        (0.28, 0.45),
        (0.26, 0.4),
        (0.24, 0.35),
        (0.22, 0.3),
        (0.2, 0.28),
        (0.18, 0.26),
        (0.16, 0.24),
    ],
    electrification: [
        (25.0, 35.0),
        (30.0, 40.0),
        (35.0, 45.0),
        (40.0, 50.0),
        (45.0, 55.0),
        (50.0, 60.0),
        (55.0, 65.0),
        (60.0, 70.0),
    ],
    hydrogen: [
        (0.0, 0.5),
        (0.5, 1.5),
        (1.5, 2.5),
        (2.5, 3.5),
        (3.5, 4.5),
        (4.5, 5.5),
        (5.5, 6.5),
        (6.5, 7.5),
    ],
};

impl SectorCategory {
    fn profile(self) -> &'static CategoryProfile {
        match self {
            SectorCategory::Residential => &RESIDENTIAL_PROFILE,
            SectorCategory::AgriForestry => &AGRI_PROFILE,
            SectorCategory::MiningSmelting => &MINING_PROFILE,
            SectorCategory::General => &GENERAL_PROFILE,
        }
    }
}

/// 一个指标的占位序列
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSeries {
    /// 指标名（能源强度 / 电气化率 / 氢气化率）
    pub indicator: String,

    /// 计量单位
    pub unit: String,

    /// 年份 → 数值
    pub values: BTreeMap<String, f64>,
}

/// 一个部门的参数表
#[derive(Debug, Clone, Serialize)]
pub struct SectorParameters {
    /// 部门全名
    pub title: String,

    /// 三个指标序列
    pub data: Vec<ParameterSeries>,
}

/// 形态 B 文档：`sector{id}-para` → 部门参数表
pub type SectorParameterDocument = BTreeMap<String, SectorParameters>;

/// 生成全部 47 个部门的占位参数表
///
/// 随机源显式传入：同一 rng 状态产出同一文档。
pub fn generate_sector_parameters<R: Rng>(rng: &mut R) -> SectorParameterDocument {
    let mut doc = SectorParameterDocument::new();

    for sector in SECTORS {
        let profile = sector.category.profile();
        let data = vec![
            sample_series(rng, "能源强度", profile.intensity_unit, &profile.intensity, 2),
            sample_series(rng, "电气化率", "%", &profile.electrification, 1),
            sample_series(rng, "氢气化率", "%", &profile.hydrogen, 1),
        ];

        doc.insert(
            format!("sector{}-para", sector.id),
            SectorParameters {
                title: sector.name.to_string(),
                data,
            },
        );
    }

    doc
}

/// 以固定种子生成（可复现）
pub fn generate_with_seed(seed: u64) -> SectorParameterDocument {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_sector_parameters(&mut rng)
}

/// 在区间表内逐年采样一个指标序列
fn sample_series<R: Rng>(
    rng: &mut R,
    indicator: &str,
    unit: &str,
    ranges: &[(f64, f64); 8],
    precision: u8,
) -> ParameterSeries {
    let values = PARAM_YEARS
        .iter()
        .zip(ranges)
        .map(|(&year, &(lo, hi))| (year.to_string(), round_to(rng.gen_range(lo..=hi), precision)))
        .collect();

    ParameterSeries {
        indicator: indicator.to_string(),
        unit: unit.to_string(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sectors_present() {
        let doc = generate_with_seed(7);
        assert_eq!(doc.len(), 47);
        assert!(doc.contains_key("sector1-para"));
        assert!(doc.contains_key("sector47-para"));

        let sector = &doc["sector46-para"];
        assert_eq!(sector.title, "46城镇居民");
        assert_eq!(sector.data.len(), 3);
    }

    #[test]
    fn test_indicator_units_follow_category() {
        let doc = generate_with_seed(7);

        // 居民部门用 吨标煤/户
        assert_eq!(doc["sector47-para"].data[0].unit, "吨标煤/户");
        // 其余部门用 吨标煤/万元
        assert_eq!(doc["sector2-para"].data[0].unit, "吨标煤/万元");
        // 比率指标恒为 %
        assert_eq!(doc["sector2-para"].data[1].unit, "%");
        assert_eq!(doc["sector2-para"].data[2].unit, "%");
    }

    #[test]
    fn test_values_within_category_ranges() {
        let doc = generate_with_seed(42);

        // 采矿冶炼类 2025 年能源强度区间 [0.6, 0.7]
        let mining = &doc["sector3-para"];
        let intensity_2025 = mining.data[0].values["2025"];
        assert!((0.6..=0.7).contains(&intensity_2025));

        // 氢气化率 2060 年区间 [13, 16]
        let hydrogen_2060 = mining.data[2].values["2060"];
        assert!((13.0..=16.0).contains(&hydrogen_2060));
    }

    #[test]
    fn test_every_series_covers_all_years() {
        let doc = generate_with_seed(1);
        for sector in doc.values() {
            for series in &sector.data {
                assert_eq!(series.values.len(), PARAM_YEARS.len());
                for year in PARAM_YEARS {
                    assert!(series.values.contains_key(&year.to_string()));
                }
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        assert_eq!(
            serde_json::to_string(&generate_with_seed(99)).unwrap(),
            serde_json::to_string(&generate_with_seed(99)).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = serde_json::to_string(&generate_with_seed(1)).unwrap();
        let b = serde_json::to_string(&generate_with_seed(2)).unwrap();
        assert_ne!(a, b);
    }
}
