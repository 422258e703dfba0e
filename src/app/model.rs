use serde::Serialize;

use crate::response::ResponseHead;

#[derive(Debug, Clone, Serialize)]
pub struct Head {
    pub version: String,
    pub status: u16,
    pub reason: String,
    pub fields: Vec<(String, String)>,
}

impl From<&ResponseHead> for Head {
    fn from(head: &ResponseHead) -> Self {
        Self {
            version: head.version.to_string(),
            status: head.status.code(),
            reason: head.status.reason().to_string(),
            fields: head
                .headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}
