//! enersheet - Excel result-sheet to nested JSON converter for energy-system planning workflows
//!
//! This crate converts the result workbook exported by an energy-system
//! optimization model into the canonical nested JSON documents consumed by
//! downstream visualization tools, and back: a national summary document can
//! be re-rendered as a multi-sheet workbook. It also synthesizes placeholder
//! parameter tables for economic sectors that have no measured data yet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use enersheet::ConverterBuilder;
//!
//! fn main() -> Result<(), enersheet::EnerSheetError> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Convert every dataset of the result workbook into JSON documents.
//!     // One corrupt sheet only fails its own dataset; the rest are written.
//!     let report = converter.convert_results("30PE_Results_ALL.xlsx", "out")?;
//!     for (kind, error) in &report.failed {
//!         eprintln!("{} failed: {}", kind.name(), error);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use enersheet::{ConverterBuilder, DatasetKind, DatasetSelector, DuplicatePolicy};
//!
//! fn main() -> Result<(), enersheet::EnerSheetError> {
//!     // Strict duplicate detection, selected datasets only
//!     let converter = ConverterBuilder::new()
//!         .with_duplicate_policy(DuplicatePolicy::Strict)
//!         .with_datasets(DatasetSelector::Only(vec![
//!             DatasetKind::PrimaryEnergy,
//!             DatasetKind::TransferMatrix,
//!         ]))
//!         .build()?;
//!
//!     converter.convert_results("30PE_Results_ALL.xlsx", "out")?;
//!     Ok(())
//! }
//! ```
//!
//! # Inverse Direction
//!
//! ```rust,no_run
//! # fn main() -> Result<(), enersheet::EnerSheetError> {
//! // National summary JSON -> one workbook with a sheet per category
//! enersheet::export_nation_workbook("nation.json", "nation_results.xlsx")?;
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod datasets;
mod document;
mod error;
mod extract;
mod grid;
mod layout;
mod synth;
mod tabular;
mod types;
mod workbook;

// 公开 API
pub use api::{DatasetSelector, DuplicatePolicy};
pub use builder::{ConversionReport, Converter, ConverterBuilder};
pub use datasets::{DatasetDocument, DatasetKind, YEARS_2020_2060, YEARS_2025_2060};
pub use error::EnerSheetError;
pub use grid::{SheetGrid, SheetSource};
pub use synth::{
    generate_sector_parameters, generate_with_seed, ParameterSeries, SectorCategory,
    SectorParameterDocument, SectorParameters,
};
pub use tabular::{
    export_nation_workbook, read_nation_document, write_nation_workbook, EmissionsSummary,
    NationDocument, SeriesTable, SummaryCategory, SummarySeries,
};
pub use types::{
    CellValue, EmissionsDocument, EntityDocument, FieldSeries, FossilTradeDocument,
    NullableYearSeries, TransferMatrix, YearSeries,
};
pub use workbook::ExcelWorkbook;
