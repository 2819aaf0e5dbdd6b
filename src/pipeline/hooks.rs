//! After-hooks: side effects run once a node has produced its artifact

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::element::Element;
use crate::error::{BoxError, OrigamiError};
use crate::graph::{Artifact, ArtifactRef, Node, NodeContext};

/// A named side effect run after a node visit succeeds
#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, cancel: &CancellationToken, node: &str, artifact: &dyn Artifact) -> Result<(), BoxError>;
}

/// Adapts a plain closure into a [`Hook`]
pub struct HookFn<F> {
    name: String,
    func: F,
}

impl<F> HookFn<F>
where
    F: Fn(&str, &dyn Artifact) -> Result<(), BoxError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self { name: name.into(), func }
    }
}

#[async_trait]
impl<F> Hook for HookFn<F>
where
    F: Fn(&str, &dyn Artifact) -> Result<(), BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _cancel: &CancellationToken, node: &str, artifact: &dyn Artifact) -> Result<(), BoxError> {
        (self.func)(node, artifact)
    }
}

/// Hooks by name
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under its own name, replacing any previous entry
    pub fn register(&mut self, hook: Arc<dyn Hook>) -> &mut Self {
        self.hooks.insert(hook.name().to_string(), hook);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Hook>> {
        self.hooks.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// A node followed by its after-hooks.
///
/// Hooks run in declaration order and only when the inner node succeeds. The
/// first failing hook fails the visit with `HookFailed`.
pub struct HookedNode {
    inner: Arc<dyn Node>,
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookedNode {
    pub fn new(inner: Arc<dyn Node>, hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self { inner, hooks }
    }

    pub fn inner(&self) -> &Arc<dyn Node> {
        &self.inner
    }

    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }
}

#[async_trait]
impl Node for HookedNode {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn element_affinity(&self) -> Option<Element> {
        self.inner.element_affinity()
    }

    async fn process(&self, cancel: &CancellationToken, nc: &mut NodeContext<'_>) -> Result<ArtifactRef, BoxError> {
        let artifact = self.inner.process(cancel, nc).await?;
        for hook in &self.hooks {
            if let Err(source) = hook.run(cancel, self.inner.name(), artifact.as_ref()).await {
                return Err(Box::new(OrigamiError::HookFailed {
                    hook: hook.name().to_string(),
                    source,
                }));
            }
        }
        Ok(artifact)
    }
}
