//! Application-level entry points. One [`AssetManager`] serves every request;
//! the per-request registry lives in the [`RequestContext`] handed to each
//! call.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::asset::{Asset, AssetCategory, Placement};
use crate::config::AssetConfig;
use crate::error::Result;
use crate::logging::{LogLevel, Logger, REGISTRY_TARGET, RENDER_TARGET, event_with_fields, json_kv};
use crate::metrics::AssetMetrics;
use crate::registry::AssetRegistry;
use crate::render::{AssetRenderer, BundleRenderer, RenderPass, TagBundleRenderer};
use crate::request::{RequestContext, RequestId};

pub struct AssetManager {
    config: AssetConfig,
    renderer: AssetRenderer,
    scripts: Arc<dyn BundleRenderer>,
    styles: Arc<dyn BundleRenderer>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<AssetMetrics>>>,
}

impl AssetManager {
    pub fn new<S, C>(config: AssetConfig, scripts: S, styles: C) -> Self
    where
        S: BundleRenderer + 'static,
        C: BundleRenderer + 'static,
    {
        Self {
            renderer: AssetRenderer::new(config.renderer_settings()),
            config,
            scripts: Arc::new(scripts),
            styles: Arc::new(styles),
            logger: None,
            metrics: None,
        }
    }

    /// Manager using [`TagBundleRenderer`] for both categories.
    pub fn with_tag_renderers(config: AssetConfig) -> Self {
        Self::new(
            config,
            TagBundleRenderer::scripts(),
            TagBundleRenderer::styles(),
        )
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(AssetMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<AssetMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// The registry of this request, created on first access with the
    /// configured preloads already declared.
    pub fn registry<'c>(&self, ctx: &'c mut RequestContext) -> Result<&'c mut AssetRegistry> {
        let request_id = ctx.id();
        ctx.state_mut()
            .get_or_try_insert_with(|| self.build_registry(request_id))
    }

    pub fn require(&self, ctx: &mut RequestContext, asset: Asset, placement: Placement) -> Result<bool> {
        let request_id = ctx.id();
        let kind = asset.kind();
        let asset_id = asset.id();

        let accepted = self.registry(ctx)?.require(asset, placement);

        self.update_metrics(|metrics| metrics.record_declaration(accepted));
        self.emit(
            LogLevel::Debug,
            REGISTRY_TARGET,
            if accepted { "asset.accepted" } else { "asset.duplicate" },
            [
                json_kv("request", request_id.get()),
                json_kv("kind", kind.as_str()),
                json_kv("placement", placement.as_str()),
                json_kv("asset", asset_id.to_string()),
            ],
        );
        Ok(accepted)
    }

    pub fn require_script(&self, ctx: &mut RequestContext, markup: impl Into<String>) -> Result<()> {
        self.require(ctx, Asset::script(markup), Placement::Page)
            .map(drop)
    }

    pub fn require_script_for_layout(
        &self,
        ctx: &mut RequestContext,
        markup: impl Into<String>,
    ) -> Result<()> {
        self.require(ctx, Asset::script(markup), Placement::Layout)
            .map(drop)
    }

    pub fn require_style(&self, ctx: &mut RequestContext, markup: impl Into<String>) -> Result<()> {
        self.require(ctx, Asset::style(markup), Placement::Page)
            .map(drop)
    }

    pub fn require_style_for_layout(
        &self,
        ctx: &mut RequestContext,
        markup: impl Into<String>,
    ) -> Result<()> {
        self.require(ctx, Asset::style(markup), Placement::Layout)
            .map(drop)
    }

    pub fn require_script_bundles<I, S>(&self, ctx: &mut RequestContext, bundles: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all(ctx, bundles, Asset::script_bundle, Placement::Page)
    }

    pub fn require_script_bundles_for_layout<I, S>(
        &self,
        ctx: &mut RequestContext,
        bundles: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all(ctx, bundles, Asset::script_bundle, Placement::Layout)
    }

    pub fn require_style_bundles<I, S>(&self, ctx: &mut RequestContext, bundles: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all(ctx, bundles, Asset::style_bundle, Placement::Page)
    }

    pub fn require_style_bundles_for_layout<I, S>(
        &self,
        ctx: &mut RequestContext,
        bundles: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_all(ctx, bundles, Asset::style_bundle, Placement::Layout)
    }

    /// Markup for every style declared so far that has not been rendered yet.
    pub fn render_required_styles(&self, ctx: &mut RequestContext) -> Result<String> {
        self.render_category(ctx, AssetCategory::Style)
            .map(|pass| pass.markup)
    }

    /// Markup for every script declared so far that has not been rendered yet.
    pub fn render_required_scripts(&self, ctx: &mut RequestContext) -> Result<String> {
        self.render_category(ctx, AssetCategory::Script)
            .map(|pass| pass.markup)
    }

    pub fn render_category(&self, ctx: &mut RequestContext, category: AssetCategory) -> Result<RenderPass> {
        let request_id = ctx.id();
        let bundles: &dyn BundleRenderer = match category {
            AssetCategory::Script => self.scripts.as_ref(),
            AssetCategory::Style => self.styles.as_ref(),
        };

        let registry = self.registry(ctx)?;
        let pass = self
            .renderer
            .render(registry, category, bundles)
            .inspect_err(|err| {
                self.emit(
                    LogLevel::Error,
                    RENDER_TARGET,
                    "render.failed",
                    [
                        json_kv("request", request_id.get()),
                        json_kv("category", category.as_str()),
                        json_kv("error", err.to_string()),
                    ],
                );
            })?;

        self.update_metrics(|metrics| metrics.record_pass(category, &pass));
        self.emit(
            LogLevel::Debug,
            RENDER_TARGET,
            "render.pass",
            [
                json_kv("request", request_id.get()),
                json_kv("category", category.as_str()),
                json_kv("inline", pass.inline),
                json_kv("bundles", pass.bundles),
                json_kv("bundle_calls", pass.bundle_calls),
            ],
        );
        Ok(pass)
    }

    /// Log the current metrics snapshot, if both a logger and metrics are set.
    pub fn emit_metrics_snapshot(&self) {
        let (Some(logger), Some(metrics)) = (&self.logger, &self.metrics) else {
            return;
        };
        let snapshot = match metrics.lock() {
            Ok(guard) => guard.snapshot(),
            Err(_) => return,
        };
        let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
    }

    fn require_all<I, S, F>(
        &self,
        ctx: &mut RequestContext,
        bundles: I,
        make: F,
        placement: Placement,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(S) -> Asset,
    {
        for bundle in bundles {
            self.require(ctx, make(bundle), placement)?;
        }
        Ok(())
    }

    fn build_registry(&self, request_id: RequestId) -> Result<AssetRegistry> {
        let mut registry = AssetRegistry::with_scope(self.config.dedup_scope);
        for preload in &self.config.preload {
            registry.require(preload.to_asset()?, preload.placement);
        }

        self.update_metrics(AssetMetrics::record_request);
        self.emit(
            LogLevel::Debug,
            REGISTRY_TARGET,
            "registry.created",
            [
                json_kv("request", request_id.get()),
                json_kv("preloaded", registry.pending_len()),
            ],
        );
        Ok(registry)
    }

    fn update_metrics(&self, update: impl FnOnce(&mut AssetMetrics)) {
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, target, message, fields));
        }
    }
}
