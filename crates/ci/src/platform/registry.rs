//! Platform Registry
//!
//! Provides a registry for CI platforms, allowing lookup by the name given on
//! the command line.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::CiPlatform;
use buildprint_core::{Error, Result};

/// Platforms by name, iterated in name order.
///
/// ```ignore
/// let mut registry = PlatformRegistry::new();
/// registry.register(BuildkitePlatform::new());
///
/// let platform = registry.resolve("buildkite")?;
/// ```
#[derive(Default)]
pub struct PlatformRegistry {
    platforms: BTreeMap<&'static str, Arc<dyn CiPlatform>>,
}

impl PlatformRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a platform under its `name()`, replacing any previous one
    pub fn register(&mut self, platform: impl CiPlatform + 'static) {
        self.platforms.insert(platform.name(), Arc::new(platform));
    }

    /// Look up a platform by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn CiPlatform>> {
        self.platforms.get(name).cloned()
    }

    /// Look up a platform by name, failing with the list of supported names.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPlatform`] if `name` is not registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn CiPlatform>> {
        self.get(name).ok_or_else(|| Error::UnsupportedPlatform {
            name: name.to_string(),
            supported: self.names().into_iter().map(String::from).collect(),
        })
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.platforms.keys().copied().collect()
    }

    /// Registered platforms in name order
    pub fn platforms(&self) -> impl Iterator<Item = &dyn CiPlatform> {
        self.platforms.values().map(|p| &**p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactStore;
    use crate::translate::StepDescriptor;
    use async_trait::async_trait;
    use std::path::Path;

    struct NullStore;

    #[async_trait]
    impl ArtifactStore for NullStore {
        fn reference(&self, path: &Path) -> String {
            path.display().to_string()
        }

        async fn upload(&self, path: &Path) -> Result<String> {
            Ok(self.reference(path))
        }

        fn download_command(&self, reference: &str) -> String {
            format!("true {reference}")
        }
    }

    struct TestPlatform {
        name: &'static str,
        store: NullStore,
    }

    impl TestPlatform {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                store: NullStore,
            }
        }
    }

    #[async_trait]
    impl CiPlatform for TestPlatform {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "Test platform"
        }

        fn artifacts(&self) -> &dyn ArtifactStore {
            &self.store
        }

        async fn submit(&self, _steps: &[StepDescriptor], _dry_run: bool) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_names_sorted() {
        let mut registry = PlatformRegistry::new();
        assert!(registry.names().is_empty());

        registry.register(TestPlatform::new("zeta"));
        registry.register(TestPlatform::new("alpha"));
        registry.register(TestPlatform::new("beta"));

        assert_eq!(registry.names(), vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_registry_replace() {
        let mut registry = PlatformRegistry::new();
        registry.register(TestPlatform::new("test"));
        registry.register(TestPlatform::new("test"));
        assert_eq!(registry.names(), vec!["test"]);
        assert!(registry.get("test").is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_registry_resolve_unknown() {
        let mut registry = PlatformRegistry::new();
        registry.register(TestPlatform::new("buildkite"));

        assert!(registry.resolve("buildkite").is_ok());
        let err = registry.resolve("jenkins").err().unwrap();
        match err {
            Error::UnsupportedPlatform { name, supported } => {
                assert_eq!(name, "jenkins");
                assert_eq!(supported, vec!["buildkite".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_registry_platforms_in_name_order() {
        let mut registry = PlatformRegistry::new();
        registry.register(TestPlatform::new("b"));
        registry.register(TestPlatform::new("a"));

        let listed: Vec<(&str, &str)> = registry
            .platforms()
            .map(|p| (p.name(), p.description()))
            .collect();
        assert_eq!(listed, vec![("a", "Test platform"), ("b", "Test platform")]);
    }
}
