mod app_error;
mod batch_ops;
mod statetime_app;

pub use app_error::AppError;
pub use batch_ops::{run_batch, BatchSummary};
pub use statetime_app::{CoverageMode, StateTimeApp, StateTimeOperation, StrategyKind};
