use anyhow::{Context, Result};
use derive_more::Display;
use glam::UVec2;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// The kind of data stored by an attachment.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Display, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentLabel {
    #[display("height")]
    Height,
    #[display("discharge")]
    Discharge,
    #[display("normal")]
    Normal,
}

/// Configures an attachment of the terrain.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AttachmentConfig {
    pub label: AttachmentLabel,
    /// The file storing the attachment, relative to the terrain directory.
    pub file: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub dimension: UVec2,
    /// The vertical scale applied to the height samples when populating the grid.
    pub height_scale: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub attachments: Vec<AttachmentConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dimension: UVec2::ZERO,
            height_scale: 80.0,
            min_height: 0.0,
            max_height: 0.0,
            attachments: Vec::new(),
        }
    }
}

impl TerrainConfig {
    /// Adds the attachment, replacing a previous one with the same label.
    pub fn add_attachment(&mut self, label: AttachmentLabel, file: impl Into<String>) {
        let attachment = AttachmentConfig {
            label,
            file: file.into(),
        };

        match self.attachments.iter_mut().find(|a| a.label == label) {
            Some(existing) => *existing = attachment,
            None => self.attachments.push(attachment),
        }
    }

    /// Removes the attachment with the label, if present.
    pub fn remove_attachment(&mut self, label: AttachmentLabel) -> Option<AttachmentConfig> {
        let position = self.attachments.iter().position(|a| a.label == label)?;
        Some(self.attachments.remove(position))
    }

    pub fn attachment(&self, label: AttachmentLabel) -> Option<&AttachmentConfig> {
        self.attachments.iter().find(|a| a.label == label)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let encoded = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        ron::from_str(&encoded).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let encoded = ron::ser::to_string_pretty(self, PrettyConfig::default())?;

        fs::write(path, encoded).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.tc.ron");

        let mut config = TerrainConfig {
            dimension: UVec2::new(512, 256),
            min_height: -3.0,
            max_height: 80.0,
            ..Default::default()
        };
        config.add_attachment(AttachmentLabel::Height, "height.bin");
        config.add_attachment(AttachmentLabel::Normal, "normal.bin");
        config.add_attachment(AttachmentLabel::Height, "height_scaled.bin");

        config.save_file(&path).unwrap();
        let loaded = TerrainConfig::load_file(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.attachments.len(), 2);
        assert_eq!(
            loaded.attachment(AttachmentLabel::Height).unwrap().file,
            "height_scaled.bin"
        );
        assert!(loaded.attachment(AttachmentLabel::Discharge).is_none());
    }

    #[test]
    fn remove_attachment() {
        let mut config = TerrainConfig::default();
        config.add_attachment(AttachmentLabel::Height, "height.bin");
        config.add_attachment(AttachmentLabel::Discharge, "discharge.bin");

        let removed = config.remove_attachment(AttachmentLabel::Discharge).unwrap();
        assert_eq!(removed.file, "discharge.bin");
        assert!(config.remove_attachment(AttachmentLabel::Discharge).is_none());
        assert_eq!(config.attachments.len(), 1);
    }

    #[test]
    fn malformed_file_fails_to_load() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.tc.ron");
        fs::write(&path, "(dimension: oops").unwrap();

        assert!(TerrainConfig::load_file(&path).is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: TerrainConfig = ron::from_str("(dimension: (4, 4))").unwrap();

        assert_eq!(config.dimension, UVec2::new(4, 4));
        assert_eq!(config.height_scale, 80.0);
        assert!(config.attachments.is_empty());
    }

    #[test]
    fn label_display() {
        assert_eq!(AttachmentLabel::Discharge.to_string(), "discharge");
    }
}
