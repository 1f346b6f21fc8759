//! Per-request script and style registration for server-rendered views.
//!
//! Views and partials declare the inline markup or named bundles they need
//! while a page renders; the layout then emits everything once, layout
//! declarations first, with consecutive bundles grouped into a single call
//! of the host's bundle renderer.

pub mod asset;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod request;

pub use asset::{Asset, AssetCategory, AssetId, AssetKind, AssetKinds, Placement};
pub use config::{AssetConfig, Preload};
pub use error::{AssetError, Result};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use manager::AssetManager;
pub use metrics::{AssetMetrics, MetricSnapshot};
pub use registry::{AssetRegistry, DedupScope, RenderableAssets};
pub use render::{AssetRenderer, BundleRenderer, RenderPass, RendererSettings, TagBundleRenderer};
pub use request::{RequestContext, RequestId, RequestState, RequestStateError};
