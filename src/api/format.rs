use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Failure body: `{"error": true, "message": ..., "code": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
    pub code: String,
    #[serde(default)]
    pub field_errors: Option<HashMap<String, String>>,
}
