//! Support logging pipeline
//!
//! Receives log events, renders them as HTML table rows, and appends them to
//! a rolling file with size/day rotation and bounded retention of archives.

mod html;
mod policy;
mod record;
mod router;
mod sink;

pub use html::HtmlFormatter;
pub use policy::{RollingPolicy, RotationState};
pub use record::{LogLevel, LogRecord};
pub use router::{init_file_logging, LogFileInfo, LogRouter};
pub use sink::{Diagnostics, RecordSink, RollingFileSink, SinkError, TracingDiagnostics};
