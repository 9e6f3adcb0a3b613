//! Flache Export-Struktur von `Robot::serialize()`.
//!
//! Read-only Snapshot für Anzeige/Export. Es gibt keinen Rückweg in einen
//! lebenden `Robot`.

use glam::{Quat, Vec3};
use indexmap::IndexMap;
use serde::Serialize;

/// `{ rootPart?: ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedRobot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_part: Option<SerializedPart>,
}

/// `{ modelName, translation, rotation, color?, slots: { name: ... } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPart {
    pub model_name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Nur belegte Slots
    pub slots: IndexMap<String, SerializedPart>,
}
