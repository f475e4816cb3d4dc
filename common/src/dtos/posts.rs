use serde::{Deserialize, Serialize};

use crate::models::PostModel;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        MessageDto { message: message.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostWriteDto {
    pub message: String,
    pub post: PostModel,
}
