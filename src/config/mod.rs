use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, AssetKind, Placement};
use crate::error::{AssetError, Result};
use crate::logging::METRICS_TARGET;
use crate::registry::DedupScope;
use crate::render::RendererSettings;

/// Declaration applied to every new registry, e.g. a site-wide bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preload {
    pub kind: AssetKind,
    /// Kept nullable so a `null` in a config file is reported when the
    /// registry is created.
    pub content: Option<String>,
    #[serde(default)]
    pub placement: Placement,
}

impl Preload {
    pub fn new(kind: AssetKind, content: impl Into<String>, placement: Placement) -> Self {
        Self {
            kind,
            content: Some(content.into()),
            placement,
        }
    }

    pub fn to_asset(&self) -> Result<Asset> {
        Asset::try_new(self.kind, self.content.clone())
    }
}

/// Application-wide settings for an [`AssetManager`](crate::AssetManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dedup_scope: DedupScope,
    /// Appended after every unit of rendered markup.
    pub line_separator: String,
    /// Issue the trailing bundle renderer call even with no bundle pending.
    pub flush_empty_bundles: bool,
    pub preload: Vec<Preload>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dedup_scope: DedupScope::default(),
            line_separator: "\n".to_string(),
            flush_empty_bundles: true,
            preload: Vec::new(),
            metrics_target: METRICS_TARGET.to_string(),
        }
    }
}

impl AssetConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.metrics_target.trim().is_empty() {
            return Err(AssetError::Config("metrics_target must not be empty".into()));
        }
        Ok(())
    }

    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload.push(preload);
        self
    }

    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            line_separator: self.line_separator.clone(),
            flush_empty_bundles: self.flush_empty_bundles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = AssetConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AssetConfig::default());
        assert_eq!(config.dedup_scope, DedupScope::Registry);
    }

    #[test]
    fn parses_scope_and_preloads() {
        let config = AssetConfig::from_json_str(
            r#"{
                "dedup_scope": "page_list",
                "line_separator": "\r\n",
                "preload": [
                    { "kind": "style_bundle", "content": "~/css/site", "placement": "layout" },
                    { "kind": "script", "content": "<script>x</script>" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.dedup_scope, DedupScope::PageList);
        assert_eq!(config.renderer_settings().line_separator, "\r\n");
        assert!(config.flush_empty_bundles);
        assert_eq!(
            config.preload[0],
            Preload::new(AssetKind::StyleBundle, "~/css/site", Placement::Layout)
        );
        assert_eq!(config.preload[1].placement, Placement::Page);
    }

    #[test]
    fn null_preload_content_fails_on_conversion() {
        let config =
            AssetConfig::from_json_str(r#"{ "preload": [{ "kind": "script", "content": null }] }"#)
                .unwrap();
        let err = config.preload[0].to_asset().unwrap_err();
        assert!(matches!(err, AssetError::InvalidArgument("content")));
    }

    #[test]
    fn blank_metrics_target_is_rejected() {
        let err = AssetConfig::from_json_str(r#"{ "metrics_target": " " }"#).unwrap_err();
        assert!(matches!(err, AssetError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.json");
        fs::write(&path, r#"{ "flush_empty_bundles": false }"#).unwrap();

        let config = AssetConfig::from_path(&path).unwrap();
        assert!(!config.flush_empty_bundles);
    }

    #[test]
    fn unknown_kind_is_a_json_error() {
        let err = AssetConfig::from_json_str(r#"{ "preload": [{ "kind": "font", "content": "x" }] }"#)
            .unwrap_err();
        assert!(matches!(err, AssetError::Json(_)));
    }
}
