//! Error Types Module
//!
//! 定义整个 crate 共用的结构化错误类型。
//! 使用 `thiserror` 实现错误的自动转换与消息格式化。

use thiserror::Error;

/// enersheet crate 统一错误类型
///
/// 覆盖结果工作簿的读取、各数据集的抽取、文档合并以及
/// JSON / XLSX 持久化过程中可能出现的所有错误。
///
/// # 错误分类
///
/// - `Io`: 输入文件缺失或读写失败（对应"源文件不存在"类故障）
/// - `Parse`: calamine 解析工作簿失败（文件损坏、格式不受支持）
/// - `MissingSheet` / `MissingColumn`: 固定版式中要求的表或列不存在
/// - `Json` / `Excel`: 文档持久化失败
/// - `Config`: Builder 配置校验失败
/// - `ConflictingDuplicate`: 严格模式下的重复冲突行
///
/// # 使用示例
///
/// ```rust,no_run
/// use enersheet::EnerSheetError;
/// use std::fs::File;
///
/// fn open_results(path: &str) -> Result<(), EnerSheetError> {
///     let _file = File::open(path)?; // Io 错误自动转换
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum EnerSheetError {
    /// I/O 操作失败
    ///
    /// 源工作簿或国家汇总文档不存在、输出目录不可写等。
    /// 通过 `#[from]` 从 `std::io::Error` 自动转换。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamine 解析工作簿失败
    ///
    /// 文件损坏、非 Excel 格式等。通过 `#[from]` 自动转换。
    #[error("Failed to parse Excel workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// JSON 文档读写失败
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XLSX 输出失败（rust_xlsxwriter）
    #[error("Failed to write Excel workbook: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// 工作簿中不存在要求的表
    ///
    /// 每个数据集的表名是固定字符串（如 `PE`、`TransElc`），
    /// 缺表即视为输入格式错误，该数据集被跳过。
    #[error("Sheet '{sheet}' not found in workbook")]
    MissingSheet {
        /// 缺失的表名
        sheet: String,
    },

    /// 表中不存在要求的命名列
    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn {
        /// 所在表名
        sheet: String,
        /// 缺失的列名
        column: String,
    },

    /// Builder 配置校验失败
    ///
    /// 例如数据集选择列表为空。在 `ConverterBuilder::build()` 时返回。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 严格模式下检测到冲突的重复行
    ///
    /// 同一 (entity, field, year) 被赋予不同的数值，说明上游导出
    /// 存在数据完整性问题。仅在 `DuplicatePolicy::Strict` 下产生。
    #[error(
        "Conflicting duplicate for entity '{entity}', field '{field}', year {year}: \
         {existing} vs {incoming}"
    )]
    ConflictingDuplicate {
        /// 实体键（省份 / 部门 / 技术）
        entity: String,
        /// 字段名
        field: String,
        /// 年份
        year: i32,
        /// 已写入的值
        existing: f64,
        /// 冲突的新值
        incoming: f64,
    },
}
