//! Masks: detachable capability middleware around node processing.
//!
//! A mask grants a power at specific nodes without changing the walker's
//! identity. Masks chain strictly LIFO: the first equipped mask is the
//! outermost wrapper, so equipping `[A, B]` runs
//! `A.pre -> B.pre -> node -> B.post -> A.post`.

mod builtin;

pub use builtin::{MetaFlagMask, correlation_mask, default_light_masks, forge_mask, judgment_mask, recall_mask};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::element::Element;
use crate::error::{BoxError, OrigamiError, Result};
use crate::graph::{ArtifactRef, Node, NodeContext};

/// One link in a mask chain
#[async_trait]
pub trait NodeProcessor: Send + Sync {
    async fn process(
        &self,
        cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> std::result::Result<ArtifactRef, BoxError>;
}

/// Capability modifier wrapping a node's processing
pub trait Mask: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Node names this mask may be equipped on
    fn valid_nodes(&self) -> &[String];

    /// Wrap `next`, returning the processor that runs this mask's logic around it
    fn wrap(&self, next: Arc<dyn NodeProcessor>) -> Arc<dyn NodeProcessor>;
}

/// Terminal link of a mask chain: the wrapped node itself
struct InnerProcessor {
    node: Arc<dyn Node>,
}

#[async_trait]
impl NodeProcessor for InnerProcessor {
    async fn process(
        &self,
        cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> std::result::Result<ArtifactRef, BoxError> {
        self.node.process(cancel, nc).await
    }
}

/// A node with one or more masks applied as middleware
#[derive(Clone)]
pub struct MaskedNode {
    inner: Arc<dyn Node>,
    masks: Vec<Arc<dyn Mask>>,
}

impl MaskedNode {
    /// The unmasked node
    pub fn inner(&self) -> &Arc<dyn Node> {
        &self.inner
    }

    /// Equipped masks, outermost first
    pub fn masks(&self) -> &[Arc<dyn Mask>] {
        &self.masks
    }

    pub fn mask_names(&self) -> Vec<&str> {
        self.masks.iter().map(|m| m.name()).collect()
    }

    fn chain(&self) -> Arc<dyn NodeProcessor> {
        let mut processor: Arc<dyn NodeProcessor> = Arc::new(InnerProcessor {
            node: self.inner.clone(),
        });
        for mask in self.masks.iter().rev() {
            processor = mask.wrap(processor);
        }
        processor
    }
}

impl fmt::Debug for MaskedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedNode")
            .field("node", &self.inner.name())
            .field("masks", &self.mask_names())
            .finish()
    }
}

#[async_trait]
impl Node for MaskedNode {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn element_affinity(&self) -> Option<Element> {
        self.inner.element_affinity()
    }

    async fn process(
        &self,
        cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> std::result::Result<ArtifactRef, BoxError> {
        self.chain().process(cancel, nc).await
    }

    fn as_masked(&self) -> Option<&MaskedNode> {
        Some(self)
    }
}

/// Equip `mask` on `node`.
///
/// Fails with `MaskNotValid` when the node's name is not among the mask's
/// valid nodes. Equipping onto an already-masked node appends to its chain.
pub fn equip_mask(node: Arc<dyn Node>, mask: Arc<dyn Mask>) -> Result<MaskedNode> {
    if !mask.valid_nodes().iter().any(|n| n == node.name()) {
        return Err(OrigamiError::MaskNotValid {
            mask: mask.name().to_string(),
            node: node.name().to_string(),
            valid: mask.valid_nodes().to_vec(),
        });
    }

    if let Some(masked) = node.as_masked() {
        let mut next = masked.clone();
        next.masks.push(mask);
        return Ok(next);
    }

    Ok(MaskedNode {
        inner: node,
        masks: vec![mask],
    })
}

/// Equip several masks in order; the first becomes the outermost wrapper
pub fn equip_masks(node: Arc<dyn Node>, masks: &[Arc<dyn Mask>]) -> Result<MaskedNode> {
    let existing = node.as_masked().cloned();
    let mut current = existing.unwrap_or_else(|| MaskedNode {
        inner: node,
        masks: Vec::new(),
    });
    for mask in masks {
        current = equip_mask(Arc::new(current), mask.clone())?;
    }
    Ok(current)
}

/// Available masks indexed by name
#[derive(Clone, Default)]
pub struct MaskRegistry {
    masks: HashMap<String, Arc<dyn Mask>>,
}

impl MaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mask: Arc<dyn Mask>) {
        self.masks.insert(mask.name().to_string(), mask);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Mask>> {
        self.masks.get(name).cloned()
    }

    /// Registered mask names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.masks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Masks that may be equipped on `node`, sorted by name
    pub fn for_node(&self, node: &str) -> Vec<Arc<dyn Mask>> {
        self.names()
            .iter()
            .filter_map(|name| self.masks.get(name))
            .filter(|m| m.valid_nodes().iter().any(|n| n == node))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
