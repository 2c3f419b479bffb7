use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("failure reading attribution table '{0}': {1}")]
    ReadError(String, String),
    #[error("failure writing analytics table '{0}': {1}")]
    WriteError(String, String),
}
