use crate::asset::AssetCategory;
use crate::logging::{LogEvent, LogFields, LogLevel};
use crate::render::RenderPass;
use serde::Serialize;
use serde_json::json;

/// Counters shared by every request served by one [`AssetManager`](crate::AssetManager).
#[derive(Debug, Default, Clone)]
pub struct AssetMetrics {
    requests: u64,
    declared: u64,
    duplicates: u64,
    style_passes: u64,
    script_passes: u64,
    inline_rendered: u64,
    bundles_rendered: u64,
    bundle_calls: u64,
}

impl AssetMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&mut self) {
        self.requests = self.requests.saturating_add(1);
    }

    pub fn record_declaration(&mut self, accepted: bool) {
        if accepted {
            self.declared = self.declared.saturating_add(1);
        } else {
            self.duplicates = self.duplicates.saturating_add(1);
        }
    }

    pub fn record_pass(&mut self, category: AssetCategory, pass: &RenderPass) {
        match category {
            AssetCategory::Style => self.style_passes = self.style_passes.saturating_add(1),
            AssetCategory::Script => self.script_passes = self.script_passes.saturating_add(1),
        }
        self.inline_rendered = self.inline_rendered.saturating_add(pass.inline as u64);
        self.bundles_rendered = self.bundles_rendered.saturating_add(pass.bundles as u64);
        self.bundle_calls = self.bundle_calls.saturating_add(pass.bundle_calls as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            requests: self.requests,
            declared: self.declared,
            duplicates: self.duplicates,
            style_passes: self.style_passes,
            script_passes: self.script_passes,
            inline_rendered: self.inline_rendered,
            bundles_rendered: self.bundles_rendered,
            bundle_calls: self.bundle_calls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub requests: u64,
    pub declared: u64,
    pub duplicates: u64,
    pub style_passes: u64,
    pub script_passes: u64,
    pub inline_rendered: u64,
    pub bundles_rendered: u64,
    pub bundle_calls: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "asset_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("requests".to_string(), json!(self.requests));
        map.insert("declared".to_string(), json!(self.declared));
        map.insert("duplicates".to_string(), json!(self.duplicates));
        map.insert("style_passes".to_string(), json!(self.style_passes));
        map.insert("script_passes".to_string(), json!(self.script_passes));
        map.insert("inline_rendered".to_string(), json!(self.inline_rendered));
        map.insert("bundles_rendered".to_string(), json!(self.bundles_rendered));
        map.insert("bundle_calls".to_string(), json!(self.bundle_calls));
        map
    }
}
