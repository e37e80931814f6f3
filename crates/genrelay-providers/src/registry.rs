//! Adapter registry keyed by capability

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use genrelay_core::models::Capability;
use tokio::sync::RwLock;

use crate::adapter::ProviderAdapter;

/// Registry mapping each capability to the adapter serving it.
///
/// Thread-safe and async-compatible using tokio's RwLock. Multiple async
/// tasks can read adapters simultaneously without blocking, while write
/// operations (registration, which happens at startup) are serialized.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Arc<RwLock<HashMap<Capability, Arc<dyn ProviderAdapter>>>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            adapters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register an adapter for every capability it serves.
    ///
    /// A later registration for the same capability wins; startup wiring is
    /// expected to register each capability exactly once.
    pub async fn register(&self, adapter: Arc<dyn ProviderAdapter>) -> Result<()> {
        let mut adapters = self.adapters.write().await;

        for capability in adapter.capabilities() {
            adapters.insert(*capability, adapter.clone());
        }

        Ok(())
    }

    /// Get the adapter serving a capability
    pub async fn get(&self, capability: Capability) -> Result<Arc<dyn ProviderAdapter>> {
        let adapters = self.adapters.read().await;

        adapters
            .get(&capability)
            .cloned()
            .with_context(|| format!("No adapter registered for capability '{}'", capability))
    }

    /// Check if a capability has an adapter registered
    pub async fn contains(&self, capability: Capability) -> bool {
        let adapters = self.adapters.read().await;
        adapters.contains_key(&capability)
    }

    /// List the capabilities with a registered adapter
    pub async fn capabilities(&self) -> Vec<Capability> {
        let adapters = self.adapters.read().await;
        adapters.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ProviderAdapter, ProviderResult};
    use async_trait::async_trait;
    use genrelay_core::models::{GenerationRequest, ProviderOutput};

    // Mock adapter for testing
    #[derive(Debug)]
    struct MockAdapter {
        name: String,
        capabilities: &'static [Capability],
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn name(&self) -> &str {
            &self.name
        }

        fn capabilities(&self) -> &'static [Capability] {
            self.capabilities
        }

        async fn invoke(&self, _user_id: &str, _request: &GenerationRequest) -> ProviderResult {
            Ok(ProviderOutput::Text("mock".to_string()))
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = AdapterRegistry::new();
        let adapter = Arc::new(MockAdapter {
            name: "mock-text".to_string(),
            capabilities: &[Capability::Article, Capability::BlogTitle],
        });

        registry.register(adapter).await.unwrap();

        assert!(registry.contains(Capability::Article).await);
        assert!(registry.contains(Capability::BlogTitle).await);
        assert!(!registry.contains(Capability::ImageGeneration).await);

        let found = registry.get(Capability::Article).await.unwrap();
        assert_eq!(found.name(), "mock-text");
    }

    #[tokio::test]
    async fn test_get_missing_capability() {
        let registry = AdapterRegistry::new();
        let err = registry.get(Capability::ResumeReview).await.unwrap_err();
        assert!(err.to_string().contains("resume-review"));
    }

    #[tokio::test]
    async fn test_capabilities_listing() {
        let registry = AdapterRegistry::new();
        registry
            .register(Arc::new(MockAdapter {
                name: "mock-image".to_string(),
                capabilities: &[Capability::ImageGeneration],
            }))
            .await
            .unwrap();

        assert_eq!(registry.capabilities().await, vec![Capability::ImageGeneration]);
    }
}
