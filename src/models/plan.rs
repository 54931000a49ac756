// Plan documents: opaque JSON graph blobs owned by one user

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Graph document as stored; the server never interprets it.
    pub data: String,
    pub created_at: i64,
    pub updated_at: i64,
}
