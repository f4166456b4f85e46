//! pinlabel - net labels for KiCad legacy schematics from an MCU pinout export
//!
//! Given a symbol library, a schematic that places the symbol, and a CubeMX
//! pinout table, this crate places one `Text Label` next to every pin that has
//! a signal assigned and appends the labels to a schematic.
//!
//! # Quick Start
//!
//! ```no_run
//! use pinlabel::{AnnotateRequest, LabelOptions, PinLabelCore};
//! use std::path::PathBuf;
//!
//! let request = AnnotateRequest {
//!     library: PathBuf::from("board-cache.lib"),
//!     component: "STM32F401CCUx".to_string(),
//!     pinout: PathBuf::from("pinout.csv"),
//!     schematic: PathBuf::from("board.sch"),
//!     output: PathBuf::from("board-labelled.sch"),
//!     instance: None,
//! };
//!
//! let summary = PinLabelCore::annotate(&request, &LabelOptions::default()).unwrap();
//! for label in &summary.labels {
//!     println!("{} at {}, {}", label.text, label.x, label.y);
//! }
//! ```
//!
//! # Pipeline
//!
//! - **Library parser**: pin offsets and directions of one symbol definition
//! - **Schematic locator**: absolute anchor of the placed symbol
//! - **Pinout reader**: rows of `Name`, `Signal`, `Position`
//! - **Label mapper**: joins rows to pins and emits label records

pub mod core;
pub mod error;
pub mod labels;
pub mod parser;

// Re-export main types
pub use crate::core::{
    AnnotateRequest, AnnotateSummary, LabelOptions, PinLabelCore, WriteMode,
    DEFAULT_LABEL_OFFSET,
};
pub use error::PinLabelError;
pub use labels::{AppendFileSink, AtomicFileSink, LabelMapper, LabelRecord, LabelRotation, LabelSink};
pub use parser::{
    LibraryParser, PinGeometry, PinSide, PinoutReader, PinoutRecord, Placement, SchematicLocator,
    Symbol, ALT_FUNCTION_SEPARATOR,
};

/// Load the pins of `component` from a library file (convenience wrapper).
pub fn parse_symbol(path: &std::path::Path, component: &str) -> Result<Symbol, PinLabelError> {
    LibraryParser::load(path, component)
}

/// Locate a component instance in a schematic file (convenience wrapper).
pub fn locate_component(
    path: &std::path::Path,
    instance: &str,
) -> Result<Placement, PinLabelError> {
    SchematicLocator::load(path, instance)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnnotateRequest, AnnotateSummary, LabelOptions, LabelRecord, PinLabelCore, PinLabelError,
        WriteMode,
    };
}
