use statetime_core::geometry::polyline::DecodeError;
use statetime_core::model::route::RouteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("failure decoding route shape: {source}")]
    ShapeDecodeError {
        #[from]
        source: DecodeError,
    },
    #[error(transparent)]
    RouteError {
        #[from]
        source: RouteError,
    },
    #[error("failure writing trip table '{0}': {1}")]
    TableWriteError(String, String),
}
