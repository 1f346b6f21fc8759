use crate::asset::AssetCategory;

/// Turns an ordered list of bundle names into markup. Implemented by the
/// host's bundling layer.
///
/// Must accept an empty slice: the grouped renderer always flushes once at the
/// end of a pass, even with nothing accumulated.
pub trait BundleRenderer: Send + Sync {
    fn render(&self, bundles: &[String]) -> String;
}

impl<F> BundleRenderer for F
where
    F: Fn(&[String]) -> String + Send + Sync,
{
    fn render(&self, bundles: &[String]) -> String {
        self(bundles)
    }
}

/// Emits one plain tag per bundle, treating the bundle name as a URL
/// relative to `prefix`.
#[derive(Debug, Clone)]
pub struct TagBundleRenderer {
    category: AssetCategory,
    prefix: String,
}

impl TagBundleRenderer {
    pub fn new(category: AssetCategory) -> Self {
        Self {
            category,
            prefix: String::new(),
        }
    }

    pub fn scripts() -> Self {
        Self::new(AssetCategory::Script)
    }

    pub fn styles() -> Self {
        Self::new(AssetCategory::Style)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn url(&self, bundle: &str) -> String {
        let path = bundle.strip_prefix("~/").unwrap_or(bundle);
        if self.prefix.is_empty() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl BundleRenderer for TagBundleRenderer {
    fn render(&self, bundles: &[String]) -> String {
        bundles
            .iter()
            .map(|bundle| {
                let url = escape_attr(&self.url(bundle));
                match self.category {
                    AssetCategory::Script => format!("<script src=\"{url}\"></script>"),
                    AssetCategory::Style => format!("<link href=\"{url}\" rel=\"stylesheet\"/>"),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
