use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, AssetId, AssetKind, AssetKinds, Placement};
use crate::error::{AssetError, Result};

/// Which earlier declarations a new one is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// Any earlier layout or page declaration.
    #[default]
    Registry,
    /// Only earlier page declarations, even when declaring for the layout.
    /// Identical layout declarations are therefore both kept.
    PageList,
}

/// Per-request store of declared assets, split into layout and page queues.
///
/// Identities of accepted declarations outlive the queues so an asset that
/// has already been rendered is never accepted again.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    layout: Vec<Asset>,
    page: Vec<Asset>,
    layout_ids: HashSet<AssetId>,
    page_ids: HashSet<AssetId>,
    scope: DedupScope,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(scope: DedupScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> DedupScope {
        self.scope
    }

    /// Queue `asset` unless an identical one was already declared. Returns
    /// whether the asset was accepted.
    pub fn require(&mut self, asset: Asset, placement: Placement) -> bool {
        let id = asset.id();
        if self.is_duplicate(&id) {
            return false;
        }

        match placement {
            Placement::Layout => {
                self.layout_ids.insert(id);
                self.layout.push(asset);
            }
            Placement::Page => {
                self.page_ids.insert(id);
                self.page.push(asset);
            }
        }
        true
    }

    /// Same as [`require`](Self::require) for callers holding a nullable asset.
    pub fn require_checked(&mut self, asset: Option<Asset>, placement: Placement) -> Result<bool> {
        let asset = asset.ok_or(AssetError::InvalidArgument("asset"))?;
        Ok(self.require(asset, placement))
    }

    /// Remove every pending asset whose kind is in `kinds`, layout queue first.
    pub fn take_renderable(&mut self, kinds: AssetKinds) -> RenderableAssets {
        let mut taken = Vec::new();
        drain_matching(&mut self.layout, kinds, &mut taken);
        let from_layout = taken.len();
        drain_matching(&mut self.page, kinds, &mut taken);

        RenderableAssets {
            from_layout,
            inner: taken.into_iter(),
        }
    }

    pub fn pending(&self, placement: Placement) -> impl Iterator<Item = &Asset> {
        match placement {
            Placement::Layout => self.layout.iter(),
            Placement::Page => self.page.iter(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.layout.len() + self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty() && self.page.is_empty()
    }

    /// Whether an asset with this kind and content was ever accepted,
    /// rendered or not.
    pub fn contains(&self, kind: AssetKind, content: &str) -> bool {
        let id = AssetId::of(kind, content);
        self.layout_ids.contains(&id) || self.page_ids.contains(&id)
    }

    fn is_duplicate(&self, id: &AssetId) -> bool {
        match self.scope {
            DedupScope::Registry => self.layout_ids.contains(id) || self.page_ids.contains(id),
            DedupScope::PageList => self.page_ids.contains(id),
        }
    }
}

fn drain_matching(queue: &mut Vec<Asset>, kinds: AssetKinds, out: &mut Vec<Asset>) {
    let (matched, kept): (Vec<_>, Vec<_>) = std::mem::take(queue)
        .into_iter()
        .partition(|asset| kinds.contains(asset.kind()));
    *queue = kept;
    out.extend(matched);
}

/// Assets removed by one [`AssetRegistry::take_renderable`] call, in render
/// order. Dropping it unconsumed discards the remaining assets.
#[derive(Debug)]
pub struct RenderableAssets {
    from_layout: usize,
    inner: std::vec::IntoIter<Asset>,
}

impl RenderableAssets {
    /// Number of assets that came from the layout queue when taken.
    pub fn from_layout(&self) -> usize {
        self.from_layout
    }
}

impl Iterator for RenderableAssets {
    type Item = Asset;

    fn next(&mut self) -> Option<Asset> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for RenderableAssets {}
