//! Built-in masks for the Light investigation pipeline
//!
//! Each one sets a boolean flag in `NodeContext::meta` before delegating, so
//! the wrapped node can unlock its extra capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{Mask, MaskRegistry, NodeProcessor};
use crate::error::BoxError;
use crate::graph::{ArtifactRef, NodeContext};

/// Mask that sets a single meta flag to `true` before the rest of the chain runs
#[derive(Debug, Clone)]
pub struct MetaFlagMask {
    name: String,
    description: String,
    valid_nodes: Vec<String>,
    flag: String,
}

impl MetaFlagMask {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        valid_node: impl Into<String>,
        flag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            valid_nodes: vec![valid_node.into()],
            flag: flag.into(),
        }
    }

    /// Allow the mask on another node
    pub fn with_valid_node(mut self, node: impl Into<String>) -> Self {
        self.valid_nodes.push(node.into());
        self
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }
}

struct MetaFlagProcessor {
    flag: String,
    next: Arc<dyn NodeProcessor>,
}

#[async_trait]
impl NodeProcessor for MetaFlagProcessor {
    async fn process(
        &self,
        cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> Result<ArtifactRef, BoxError> {
        nc.meta_mut().insert(self.flag.clone(), Value::Bool(true));
        self.next.process(cancel, nc).await
    }
}

impl Mask for MetaFlagMask {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn valid_nodes(&self) -> &[String] {
        &self.valid_nodes
    }

    fn wrap(&self, next: Arc<dyn NodeProcessor>) -> Arc<dyn NodeProcessor> {
        Arc::new(MetaFlagProcessor {
            flag: self.flag.clone(),
            next,
        })
    }
}

/// Injects prior root-cause context; valid at `recall`
pub fn recall_mask() -> Arc<dyn Mask> {
    Arc::new(MetaFlagMask::new(
        "mask-of-recall",
        "Injects prior RCA database context",
        "recall",
        "prior_rca_available",
    ))
}

/// Injects workspace repository context; valid at `investigate`
pub fn forge_mask() -> Arc<dyn Mask> {
    Arc::new(MetaFlagMask::new(
        "mask-of-the-forge",
        "Injects workspace repo context",
        "investigate",
        "workspace_repos_available",
    ))
}

/// Enables cross-case pattern matching; valid at `correlate`
pub fn correlation_mask() -> Arc<dyn Mask> {
    Arc::new(MetaFlagMask::new(
        "mask-of-correlation",
        "Enables cross-case pattern matching",
        "correlate",
        "cross_case_matching",
    ))
}

/// Grants authority to approve, reject, or reassess; valid at `review`
pub fn judgment_mask() -> Arc<dyn Mask> {
    Arc::new(MetaFlagMask::new(
        "mask-of-judgment",
        "Grants authority to approve/reject/reassess",
        "review",
        "review_authority",
    ))
}

/// The four Light masks in a registry
pub fn default_light_masks() -> MaskRegistry {
    let mut registry = MaskRegistry::new();
    for mask in [recall_mask(), forge_mask(), correlation_mask(), judgment_mask()] {
        registry.register(mask);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_and_nodes() {
        let cases = [
            (recall_mask(), "mask-of-recall", "recall"),
            (forge_mask(), "mask-of-the-forge", "investigate"),
            (correlation_mask(), "mask-of-correlation", "correlate"),
            (judgment_mask(), "mask-of-judgment", "review"),
        ];
        for (mask, name, node) in cases {
            assert_eq!(mask.name(), name);
            assert_eq!(mask.valid_nodes(), &[node.to_string()]);
            assert!(!mask.description().is_empty());
        }
    }

    #[test]
    fn test_default_light_masks_registry() {
        let registry = default_light_masks();
        assert_eq!(
            registry.names(),
            vec![
                "mask-of-correlation",
                "mask-of-judgment",
                "mask-of-recall",
                "mask-of-the-forge"
            ]
        );
    }

    #[test]
    fn test_meta_flag_mask_extra_nodes() {
        let mask = MetaFlagMask::new("m", "d", "a", "flag").with_valid_node("b");
        assert_eq!(mask.valid_nodes(), &["a".to_string(), "b".to_string()]);
        assert_eq!(mask.flag(), "flag");
    }
}
