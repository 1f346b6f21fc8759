mod core;

pub use self::core::{AssetRegistry, DedupScope, RenderableAssets};
