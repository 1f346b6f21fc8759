mod core;

pub use self::core::{Asset, AssetCategory, AssetId, AssetKind, AssetKinds, Placement};
