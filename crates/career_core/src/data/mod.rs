//! Reference data
//!
//! Everything read from the game directory:
//! - layout: where each file lives
//! - records: on-disk record shapes
//! - loaders: one loader per reference file
//! - pipeline: path checks, loader ordering and the aggregated report
//! - settings: user settings and the style table
//! - scale_conversion: power ranking -> internal club rating

pub mod layout;
pub mod loaders;
pub mod pipeline;
pub mod records;
pub mod scale_conversion;
pub mod settings;


pub use layout::{DataLayout, RequiredPath, DATA_DIR_ENV};
pub use pipeline::{
    ingest, ingest_quiet, IngestionReport, Ingested, NoProgress, ProgressSink, ReportEntry, Step,
};
pub use records::{ClubRecord, LeagueRecord, NationRecord, PositionRecord, RatingValue, TraitRecord};
pub use scale_conversion::ScaleConverter;
pub use settings::{Setting, Settings, StyleTable};
