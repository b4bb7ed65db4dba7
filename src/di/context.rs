//! The explicit composition root.

use crate::errors::Result;
use crate::res::library::ResourceLibrary;
use crate::res::loader::{FailurePolicy, LoaderDriver, ResourceLoader};

use super::container::Container;

/// Owns one [`Container`] and is passed explicitly into constructors and
/// factories that need wiring.
///
/// There is deliberately no process-wide instance: where a global registry
/// would be reset for test isolation, a fresh `Context` is constructed
/// instead and torn down by dropping it.
///
/// [`Container`]: ../container/struct.Container.html
#[derive(Default)]
pub struct Context {
    container: Container,
}

impl Context {
    /// Creates a context with an empty container.
    pub fn new() -> Self {
        Context {
            container: Container::new(),
        }
    }

    #[inline]
    pub fn container(&self) -> &Container {
        &self.container
    }

    #[inline]
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Builds a resource library wired with every `dyn ResourceLoader`
    /// registered in the container, named or not.
    ///
    /// Host adapters register their loaders at startup; this is the point
    /// where those registrations become the library's dispatch table.
    pub fn build_library(&self, policy: FailurePolicy) -> Result<ResourceLibrary> {
        let mut driver = LoaderDriver::new(policy);
        for loader in self.container.resolve_all::<dyn ResourceLoader>() {
            driver.register_shared(loader)?;
        }

        Ok(ResourceLibrary::new(driver))
    }
}
