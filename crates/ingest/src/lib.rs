//! The tsvwatch ingestion pipeline.
//!
//! # Architecture
//!
//! - `scheduler`: ticks and runs one cycle at a time
//! - `cycle`: processed set, scan, parse, render, persist
//! - `tracker`: the processed set read from the store
//! - `scanner`: new `.tsv` files in the watched directory
//! - `parser` / `validator`: TSV rows into a [`tsvwatch_core::Document`]
//! - `render`: text and PDF reports

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cycle;
pub mod parser;
pub mod render;
pub mod scanner;
pub mod scheduler;
pub mod tracker;
pub mod validator;

pub use cycle::{CycleConfig, CycleError, CycleReport, IngestionCycle};
pub use parser::{FileError, FileParser, HEADER_LINES};
pub use render::{PdfReportRenderer, RenderError, ReportRenderer, TextReportRenderer};
pub use scanner::{Candidate, ScanError, ScanOutcome, scan};
pub use scheduler::{
    ChannelTicker, CycleTask, IntervalTicker, Scheduler, SchedulerState, TickSender, Ticker,
};
pub use tracker::ProcessedSetTracker;
pub use validator::{RowError, RowValidator};
