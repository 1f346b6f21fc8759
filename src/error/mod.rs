mod types;

pub use types::{AssetError, Result};
