use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("failure reading route document '{0}': {1}")]
    ReadError(String, std::io::Error),
    #[error("failure decoding route document JSON: {source}")]
    DeserializeError {
        #[from]
        source: serde_json::Error,
    },
    #[error("route document '{0}' has no legs")]
    NoLegs(String),
    #[error("route document '{0}' first leg has no shape")]
    NoShape(String),
    #[error("route document '{0}' first leg has no maneuvers")]
    NoManeuvers(String),
}
