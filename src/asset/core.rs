use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, Result};

/// What an asset's content represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Literal `<script>` markup.
    Script,
    /// Literal `<style>` / `<link>` markup.
    Style,
    /// Name of a script bundle resolved by the host.
    ScriptBundle,
    /// Name of a style bundle resolved by the host.
    StyleBundle,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Script,
        AssetKind::Style,
        AssetKind::ScriptBundle,
        AssetKind::StyleBundle,
    ];

    pub const fn category(self) -> AssetCategory {
        match self {
            AssetKind::Script | AssetKind::ScriptBundle => AssetCategory::Script,
            AssetKind::Style | AssetKind::StyleBundle => AssetCategory::Style,
        }
    }

    pub const fn is_bundle(self) -> bool {
        matches!(self, AssetKind::ScriptBundle | AssetKind::StyleBundle)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Style => "style",
            AssetKind::ScriptBundle => "script_bundle",
            AssetKind::StyleBundle => "style_bundle",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output region an asset is rendered into. Each category pairs one inline
/// kind with one bundle kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Script,
    Style,
}

impl AssetCategory {
    pub const fn inline_kind(self) -> AssetKind {
        match self {
            AssetCategory::Script => AssetKind::Script,
            AssetCategory::Style => AssetKind::Style,
        }
    }

    pub const fn bundle_kind(self) -> AssetKind {
        match self {
            AssetCategory::Script => AssetKind::ScriptBundle,
            AssetCategory::Style => AssetKind::StyleBundle,
        }
    }

    /// The kinds drained by one render pass of this category.
    pub const fn kinds(self) -> AssetKinds {
        AssetKinds::of(self.bundle_kind()).with(self.inline_kind())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Script => "script",
            AssetCategory::Style => "style",
        }
    }
}

/// Small set of [`AssetKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AssetKinds(u8);

impl AssetKinds {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub const fn of(kind: AssetKind) -> Self {
        Self(kind.bit())
    }

    pub const fn with(self, kind: AssetKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: AssetKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = AssetKind> {
        AssetKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl From<AssetKind> for AssetKinds {
    fn from(kind: AssetKind) -> Self {
        Self::of(kind)
    }
}

impl FromIterator<AssetKind> for AssetKinds {
    fn from_iter<I: IntoIterator<Item = AssetKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Which pending list a declaration joins. Layout assets render first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Layout,
    #[default]
    Page,
}

impl Placement {
    pub const fn for_layout(for_layout: bool) -> Self {
        if for_layout {
            Placement::Layout
        } else {
            Placement::Page
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Placement::Layout => "layout",
            Placement::Page => "page",
        }
    }
}

/// Identity of an asset for deduplication: digest of kind and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(blake3::Hash);

impl AssetId {
    pub fn of(kind: AssetKind, content: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[kind as u8]);
        hasher.update(content.as_bytes());
        Self(hasher.finalize())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.0.to_hex();
        f.write_str(&hex.as_str()[..12])
    }
}

/// One declared script or style: literal markup or a bundle name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    content: String,
    kind: AssetKind,
}

impl Asset {
    pub fn new(kind: AssetKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }

    /// Build from a value that may be missing, e.g. a nullable field handed
    /// over by a template engine or a config file.
    pub fn try_new(kind: AssetKind, content: Option<String>) -> Result<Self> {
        let content = content.ok_or(AssetError::InvalidArgument("content"))?;
        Ok(Self::new(kind, content))
    }

    pub fn script(markup: impl Into<String>) -> Self {
        Self::new(AssetKind::Script, markup)
    }

    pub fn style(markup: impl Into<String>) -> Self {
        Self::new(AssetKind::Style, markup)
    }

    pub fn script_bundle(name: impl Into<String>) -> Self {
        Self::new(AssetKind::ScriptBundle, name)
    }

    pub fn style_bundle(name: impl Into<String>) -> Self {
        Self::new(AssetKind::StyleBundle, name)
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn id(&self) -> AssetId {
        AssetId::of(self.kind, &self.content)
    }
}
