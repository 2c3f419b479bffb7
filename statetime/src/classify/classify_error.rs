use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("failure creating geocoder HTTP client: {source}")]
    ClientError {
        #[from]
        source: reqwest::Error,
    },
}
