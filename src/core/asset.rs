//! Asset-Katalog: unveränderliche Bauteil-Definitionen mit Slots.

use super::ModelError;
use anyhow::Context;
use glam::{EulerRot, Quat, Vec3};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Statische Definition eines Slots (Andockpunkt) an einem Asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    /// Slot-Typ, bestimmt welche Assets hineinpassen
    #[serde(rename = "type")]
    pub slot_type: String,
    /// Position relativ zum Bauteil
    #[serde(default)]
    pub translation: Vec3,
    /// Orientierung relativ zum Bauteil
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    /// Raster für Rotationen eingesetzter Bauteile (Radiant, optional)
    #[serde(default)]
    pub rotation_snap: Option<f32>,
    /// Raster für Verschiebungen eingesetzter Bauteile (Welteinheiten, optional)
    #[serde(default)]
    pub translation_snap: Option<f32>,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl SlotDefinition {
    /// Erstellt einen Slot ohne Versatz und ohne Raster.
    pub fn new(slot_type: impl Into<String>) -> Self {
        Self {
            slot_type: slot_type.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            rotation_snap: None,
            translation_snap: None,
        }
    }

    /// Setzt die statische Slot-Position.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Setzt die statische Slot-Orientierung.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Setzt die Raster für eingesetzte Bauteile.
    pub fn with_snap(mut self, translation_snap: Option<f32>, rotation_snap: Option<f32>) -> Self {
        self.translation_snap = translation_snap;
        self.rotation_snap = rotation_snap;
        self
    }

    /// Rastet eine Position komponentenweise auf `translation_snap` ein.
    pub fn snap_translation(&self, translation: Vec3) -> Vec3 {
        match self.translation_snap {
            Some(step) if step > 0.0 => (translation / step).round() * step,
            _ => translation,
        }
    }

    /// Rastet eine Rotation auf Vielfache von `rotation_snap` je Euler-Achse (XYZ) ein.
    pub fn snap_rotation(&self, rotation: Quat) -> Quat {
        match self.rotation_snap {
            Some(step) if step > 0.0 => {
                let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
                let snap = |angle: f32| (angle / step).round() * step;
                Quat::from_euler(EulerRot::XYZ, snap(x), snap(y), snap(z)).normalize()
            }
            _ => rotation,
        }
    }
}

/// Optionale Parameter eines Assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetParameters {
    /// Wählbare Farben (Hex, z.B. `#ff8800`)
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Unveränderlicher Katalogeintrag eines platzierbaren Bauteils.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Eindeutiger Schlüssel `<robotFamily>/<partId>` (aus dem Katalog-Schlüssel)
    #[serde(skip)]
    pub name: String,
    /// Darf ohne Elternteil eingesetzt werden
    #[serde(default)]
    pub root: bool,
    /// Pfad zum Katalog-Icon (nur für die UI)
    #[serde(default)]
    pub icon: Option<String>,
    /// Slot-Typ, in den dieses Asset passt (bedeutungslos bei `root`)
    #[serde(default)]
    pub slot_type: Option<String>,
    /// Slots in Katalog-Reihenfolge
    #[serde(default)]
    pub slots: IndexMap<String, SlotDefinition>,
    /// Optionale Parameter (Farbauswahl)
    #[serde(default)]
    pub parameters: Option<AssetParameters>,
}

impl Asset {
    /// Erstellt ein Wurzel-Asset ohne Slots.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: true,
            icon: None,
            slot_type: None,
            slots: IndexMap::new(),
            parameters: None,
        }
    }

    /// Erstellt ein Asset, das in Slots vom Typ `slot_type` passt.
    pub fn attachable(name: impl Into<String>, slot_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: false,
            icon: None,
            slot_type: Some(slot_type.into()),
            slots: IndexMap::new(),
            parameters: None,
        }
    }

    /// Fügt einen Slot hinzu (Builder).
    pub fn with_slot(mut self, name: impl Into<String>, slot: SlotDefinition) -> Self {
        self.slots.insert(name.into(), slot);
        self
    }

    /// Setzt die wählbaren Farben (Builder).
    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.parameters = Some(AssetParameters {
            colors: colors.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Roboter-Familie (Teil vor dem `/`).
    pub fn family(&self) -> &str {
        self.name.split_once('/').map_or("", |(family, _)| family)
    }

    /// Bauteil-ID innerhalb der Familie (Teil nach dem `/`).
    pub fn part_id(&self) -> &str {
        self.name
            .split_once('/')
            .map_or(self.name.as_str(), |(_, id)| id)
    }

    /// Gibt `true` zurück, wenn das Asset in einen Slot vom Typ `slot_type` passt.
    pub fn fits_slot_type(&self, slot_type: &str) -> bool {
        !self.root && self.slot_type.as_deref() == Some(slot_type)
    }

    /// Wählbare Farben (leer, wenn keine Parameter definiert sind).
    pub fn color_choices(&self) -> &[String] {
        self.parameters
            .as_ref()
            .map(|params| params.colors.as_slice())
            .unwrap_or_default()
    }
}

/// Beim Start einmalig geladener Katalog aller Assets.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: IndexMap<String, Arc<Asset>>,
}

impl AssetCatalog {
    /// Erstellt einen leeren Katalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Baut einen Katalog aus bereits konstruierten Assets.
    pub fn from_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let mut catalog = Self::new();
        for asset in assets {
            catalog.insert(asset);
        }
        catalog
    }

    /// Parst einen JSON-Katalog (`{ "<family>/<id>": { ... } }`).
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let raw: IndexMap<String, Asset> =
            serde_json::from_str(json).context("Asset-Katalog ist kein gültiges JSON")?;

        let mut catalog = Self::new();
        for (name, mut asset) in raw {
            if !asset.root && asset.slot_type.is_none() {
                log::warn!("Asset '{}' ist weder Wurzel noch hat es einen Slot-Typ", name);
            }
            asset.name = name;
            catalog.insert(asset);
        }

        log::info!("Asset-Katalog geladen: {} Einträge", catalog.len());
        Ok(catalog)
    }

    /// Lädt einen JSON-Katalog von der Platte.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Asset-Katalog nicht lesbar: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    fn insert(&mut self, asset: Asset) {
        self.assets.insert(asset.name.clone(), Arc::new(asset));
    }

    /// Sucht ein Asset nach Namen.
    pub fn get(&self, name: &str) -> Option<&Arc<Asset>> {
        self.assets.get(name)
    }

    /// Wie [`get`](Self::get), aber mit `UnknownAsset` als Fehler.
    pub fn resolve(&self, name: &str) -> Result<&Arc<Asset>, ModelError> {
        self.get(name)
            .ok_or_else(|| ModelError::UnknownAsset(name.to_string()))
    }

    /// Iteriert über alle Assets in Katalog-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.assets.values()
    }

    /// Anzahl der Einträge.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Gibt `true` zurück, wenn der Katalog leer ist.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Namen der Assets, die aktuell per Drag eingesetzt werden dürfen.
    ///
    /// Wurzel-Assets nur solange kein Wurzelbauteil existiert, alle anderen nur,
    /// wenn ihr Slot-Typ unter `available_slot_types` ist.
    pub fn draggable_assets(
        &self,
        has_root_part: bool,
        available_slot_types: &IndexSet<String>,
    ) -> IndexSet<String> {
        self.assets
            .values()
            .filter(|asset| {
                if asset.root {
                    !has_root_part
                } else {
                    asset
                        .slot_type
                        .as_ref()
                        .is_some_and(|t| available_slot_types.contains(t))
                }
            })
            .map(|asset| asset.name.clone())
            .collect()
    }
}
