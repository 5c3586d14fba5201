use serde::{Deserialize, Serialize};

/// One registrant. Written once at registration and never updated or deleted;
/// the current-user slot and the directory copy are independent snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Uppercased at entry time; no other normalization is applied.
    pub vehicle_number: String,
    pub department: String,
    pub semester: String,
    /// Epoch milliseconds.
    pub registered_at: i64,
}
