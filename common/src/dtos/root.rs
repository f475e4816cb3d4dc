use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDto<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub message: &'a str,
}

/// Body of every error response and of the CORS preflight acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailDto {
    pub detail: String,
}

impl DetailDto {
    pub fn new(detail: impl Into<String>) -> Self {
        DetailDto { detail: detail.into() }
    }
}
