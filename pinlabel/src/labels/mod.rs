pub mod mapper;
pub mod sink;

pub use mapper::{LabelMapper, LabelRecord, LabelRotation};
pub use sink::{AppendFileSink, AtomicFileSink, LabelSink};
