use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("failure building index coverage: {0}")]
    BuildError(String),
    #[error("coordinate cannot be mapped to a grid cell: {0}")]
    InvalidCoordinate(String),
    #[error("failure loading persisted index table '{0}': {1}")]
    LoadError(String, String),
    #[error("failure persisting index table '{0}': {1}")]
    PersistError(String, String),
}
