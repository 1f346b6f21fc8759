mod bundle;
mod core;

pub use self::bundle::{BundleRenderer, TagBundleRenderer};
pub use self::core::{AssetRenderer, RenderPass, RendererSettings};
