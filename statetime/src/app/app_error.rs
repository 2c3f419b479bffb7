use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::attribution::AttributionError;
use crate::classify::ClassifyError;
use crate::index::IndexError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    InternalError(String),
    #[error(transparent)]
    IndexError {
        #[from]
        source: IndexError,
    },
    #[error(transparent)]
    ClassifyError {
        #[from]
        source: ClassifyError,
    },
    #[error(transparent)]
    AttributionError {
        #[from]
        source: AttributionError,
    },
    #[error(transparent)]
    AnalyticsError {
        #[from]
        source: AnalyticsError,
    },
}
