//! Run orchestration for benchbrief: the one linear pipeline.

pub mod pipeline;

pub use pipeline::{RunReport, dry_run, run, run_with_credentials};
