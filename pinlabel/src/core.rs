//! Pipeline shared by the CLI and library users.
//! Library pins and component placement are resolved first, then every
//! pinout row is joined against them in file order.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::PinLabelError;
use crate::labels::mapper::{LabelMapper, LabelRecord};
use crate::labels::sink::{AppendFileSink, AtomicFileSink, LabelSink};
use crate::parser::library::{LibraryParser, Symbol};
use crate::parser::pinout::{PinoutReader, PinoutRecord, ALT_FUNCTION_SEPARATOR};
use crate::parser::schematic::{Placement, SchematicLocator};

/// Default distance between a pin end and its label, in schematic units.
pub const DEFAULT_LABEL_OFFSET: i64 = 50;

/// How labels reach the output schematic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Append each label as soon as it is resolved.
    #[default]
    Append,
    /// Write all labels at once after every row resolved.
    Atomic,
}

/// Options for an annotate run.
#[derive(Clone, Debug)]
pub struct LabelOptions {
    pub offset: i64,
    pub separator: char,
    pub write_mode: WriteMode,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            offset: DEFAULT_LABEL_OFFSET,
            separator: ALT_FUNCTION_SEPARATOR,
            write_mode: WriteMode::Append,
        }
    }
}

/// Input and output files of an annotate run.
#[derive(Clone, Debug)]
pub struct AnnotateRequest {
    pub library: PathBuf,
    /// Matched as a substring of the library `DEF` line.
    pub component: String,
    pub pinout: PathBuf,
    pub schematic: PathBuf,
    pub output: PathBuf,
    /// Substring searched for in the schematic; defaults to `component`.
    pub instance: Option<String>,
}

impl AnnotateRequest {
    pub fn instance_name(&self) -> &str {
        self.instance.as_deref().unwrap_or(self.component.as_str())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotateSummary {
    pub component: String,
    pub anchor: Placement,
    pub labels: Vec<LabelRecord>,
    /// Rows without a signal.
    pub skipped: usize,
}

/// Core annotate API used by the CLI.
pub struct PinLabelCore;

impl PinLabelCore {
    /// Resolve every label and write it to `request.output` according to
    /// `options.write_mode`.
    pub fn annotate(
        request: &AnnotateRequest,
        options: &LabelOptions,
    ) -> Result<AnnotateSummary, PinLabelError> {
        match options.write_mode {
            WriteMode::Append => {
                let mut sink = AppendFileSink::new(&request.output);
                Self::annotate_into(request, options, &mut sink)
            }
            WriteMode::Atomic => {
                let mut sink = AtomicFileSink::new(&request.output);
                Self::annotate_into(request, options, &mut sink)
            }
        }
    }

    /// Resolve every label and hand it to `sink`. `request.output` is not
    /// touched unless the sink writes there.
    pub fn annotate_into(
        request: &AnnotateRequest,
        options: &LabelOptions,
        sink: &mut dyn LabelSink,
    ) -> Result<AnnotateSummary, PinLabelError> {
        let symbol = LibraryParser::load(&request.library, &request.component)?;
        let anchor = SchematicLocator::load(&request.schematic, request.instance_name())?;
        tracing::info!("Found component at {}, {}", anchor.anchor_x, anchor.anchor_y);

        let records = PinoutReader::open(&request.pinout)?.records();
        let summary = Self::map_records(&symbol, anchor, records, options, sink)?;
        sink.finish()?;

        Ok(summary)
    }

    /// Join pinout rows against `symbol`, stopping at the first failing row.
    pub fn map_records<I>(
        symbol: &Symbol,
        anchor: Placement,
        records: I,
        options: &LabelOptions,
        sink: &mut dyn LabelSink,
    ) -> Result<AnnotateSummary, PinLabelError>
    where
        I: IntoIterator<Item = Result<PinoutRecord, csv::Error>>,
    {
        let mapper = LabelMapper::new(symbol, anchor, options);
        let mut labels = Vec::new();
        let mut skipped = 0;

        for record in records {
            let record = record?;
            if record.is_unused() {
                tracing::debug!("Skipping unused pin {}", record.pin_name);
                skipped += 1;
                continue;
            }

            tracing::info!(
                "> {}: '{}' (pin {})",
                record.pin_name,
                record.signal_name,
                record.position_label
            );
            let label = mapper.place(&record)?;
            tracing::info!(
                "Mapped {} to {} at {}, {}",
                record.signal_name,
                record.plain_name(options.separator),
                label.x,
                label.y
            );

            sink.emit(&label)?;
            labels.push(label);
        }

        Ok(AnnotateSummary {
            component: symbol.name().to_string(),
            anchor,
            labels,
            skipped,
        })
    }
}
