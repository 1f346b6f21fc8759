use crate::asset::{Asset, AssetCategory, AssetKind};
use crate::error::{AssetError, Result};
use crate::registry::AssetRegistry;

use super::bundle::BundleRenderer;

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Appended after every emitted unit.
    pub line_separator: String,
    /// Call the bundle renderer at the end of a pass even when no bundle is
    /// waiting.
    pub flush_empty_bundles: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_string(),
            flush_empty_bundles: true,
        }
    }
}

/// Markup and counters of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPass {
    pub markup: String,
    pub inline: usize,
    pub bundles: usize,
    pub bundle_calls: usize,
}

/// Groups consecutive bundle declarations into as few bundle renderer calls
/// as possible while keeping inline markup at its declared position.
#[derive(Debug, Clone, Default)]
pub struct AssetRenderer {
    settings: RendererSettings,
}

impl AssetRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Drain the pending assets of `category` from `registry` and render them.
    pub fn render(
        &self,
        registry: &mut AssetRegistry,
        category: AssetCategory,
        bundles: &dyn BundleRenderer,
    ) -> Result<RenderPass> {
        let assets = registry.take_renderable(category.kinds());
        self.compose(category, assets, bundles)
    }

    /// Render an already ordered asset sequence. Every asset must be the inline
    /// or bundle kind of `category`.
    pub fn compose<I>(
        &self,
        category: AssetCategory,
        assets: I,
        bundles: &dyn BundleRenderer,
    ) -> Result<RenderPass>
    where
        I: IntoIterator<Item = Asset>,
    {
        let inline_kind = category.inline_kind();
        let bundle_kind = category.bundle_kind();

        let mut pass = RenderPass::default();
        let mut pending: Vec<String> = Vec::new();

        for asset in assets {
            match asset.kind() {
                kind if kind == inline_kind => {
                    if !pending.is_empty() {
                        self.flush(&mut pass, &mut pending, bundles);
                    }
                    pass.inline += 1;
                    self.push_unit(&mut pass, asset.content());
                }
                kind if kind == bundle_kind => {
                    pass.bundles += 1;
                    pending.push(asset.into_content());
                }
                kind => return Err(invalid_state(kind, category)),
            }
        }

        if self.settings.flush_empty_bundles || !pending.is_empty() {
            self.flush(&mut pass, &mut pending, bundles);
        }

        Ok(pass)
    }

    fn flush(&self, pass: &mut RenderPass, pending: &mut Vec<String>, bundles: &dyn BundleRenderer) {
        let markup = bundles.render(pending);
        pass.bundle_calls += 1;
        self.push_unit(pass, &markup);
        pending.clear();
    }

    fn push_unit(&self, pass: &mut RenderPass, unit: &str) {
        pass.markup.push_str(unit);
        pass.markup.push_str(&self.settings.line_separator);
    }
}

fn invalid_state(kind: AssetKind, category: AssetCategory) -> AssetError {
    AssetError::InvalidState { kind, category }
}
