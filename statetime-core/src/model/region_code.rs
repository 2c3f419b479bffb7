use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// a short string identifying a state, province, or territory in the form
/// `CC:Name` (for example `US:Colorado`), or the sentinel [`RegionCode::UNKNOWN`]
/// for points that could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub const UNKNOWN: &'static str = "UNK";

    pub fn new<S: Into<String>>(code: S) -> RegionCode {
        RegionCode(code.into())
    }

    pub fn unknown() -> RegionCode {
        RegionCode(String::from(Self::UNKNOWN))
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionCode {
    fn from(value: &str) -> Self {
        RegionCode(value.to_string())
    }
}

impl Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
