//! Scheme and extension indexed loader dispatch.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use inlinable_string::InlinableString;

use crate::errors::{Error, Result};
use crate::utils::FastHashMap;

use super::location::Location;
use super::resource::{Resource, TextResource};

/// Materializes resources for one scheme and a fixed set of extensions.
///
/// Loaders are stateless across invocations and perform the actual fetch
/// against their backing store. The dispatch never retries; a loader that
/// wants retries performs them itself.
pub trait ResourceLoader: Send + Sync + 'static {
    /// The scheme this loader serves, e.g. `asset`.
    fn scheme(&self) -> &str;

    /// The extensions this loader serves within its scheme.
    fn extensions(&self) -> &[&'static str];

    /// Fetches the payload behind `location` and wraps it as a resource.
    fn load(&self, location: &Location) -> Result<Box<dyn Resource>>;
}

/// What the dispatch does when a loader ran and its fetch failed.
///
/// This is a deliberate configuration point. Pick one at construction; the
/// dispatch never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Surface the failure to the caller as [`Error::LoadFailure`].
    ///
    /// [`Error::LoadFailure`]: ../../errors/enum.Error.html
    Propagate,
    /// Log the failure and substitute an empty placeholder resource, so the
    /// caller keeps running.
    Placeholder,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct DispatchKey {
    scheme: InlinableString,
    extension: InlinableString,
}

impl DispatchKey {
    fn new(scheme: &str, extension: &str) -> Self {
        DispatchKey {
            scheme: scheme.into(),
            extension: extension.into(),
        }
    }
}

/// Parses identifiers and routes them to the loader registered for their
/// (scheme, extension) pair. Exactly one loader may serve a pair.
pub struct LoaderDriver {
    loaders: FastHashMap<DispatchKey, Arc<dyn ResourceLoader>>,
    policy: FailurePolicy,
}

impl LoaderDriver {
    /// Creates an empty driver with the given failure policy.
    pub fn new(policy: FailurePolicy) -> Self {
        LoaderDriver {
            loaders: FastHashMap::default(),
            policy,
        }
    }

    /// The configured failure policy.
    #[inline]
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Registers a loader under every extension it declares. A second loader
    /// for any of its (scheme, extension) pairs fails eagerly, leaving the
    /// driver untouched.
    pub fn register<L>(&mut self, loader: L) -> Result<()>
    where
        L: ResourceLoader,
    {
        self.register_shared(Arc::new(loader))
    }

    /// Registers an already shared loader.
    pub fn register_shared(&mut self, loader: Arc<dyn ResourceLoader>) -> Result<()> {
        for &extension in loader.extensions() {
            let key = DispatchKey::new(loader.scheme(), extension);
            if self.loaders.contains_key(&key) {
                return Err(Error::DuplicateLoader(
                    key.scheme.to_string(),
                    key.extension.to_string(),
                ));
            }
        }

        for &extension in loader.extensions() {
            let key = DispatchKey::new(loader.scheme(), extension);
            self.loaders.insert(key, loader.clone());
        }

        info!(
            "Registered loader for {}:*.{{{}}}.",
            loader.scheme(),
            loader.extensions().join(", ")
        );
        Ok(())
    }

    /// Whether a loader is registered for the (scheme, extension) pair.
    pub fn contains(&self, scheme: &str, extension: &str) -> bool {
        self.loaders.contains_key(&DispatchKey::new(scheme, extension))
    }

    /// Parses `ident`, selects its loader and materializes the resource.
    ///
    /// A missing loader is always [`Error::NotFound`]; failures of the
    /// loader itself follow the configured [`FailurePolicy`].
    ///
    /// [`Error::NotFound`]: ../../errors/enum.Error.html
    /// [`FailurePolicy`]: enum.FailurePolicy.html
    pub fn load(&self, ident: &str) -> Result<Box<dyn Resource>> {
        let location = Location::parse(ident)?;
        let key = DispatchKey::new(location.scheme(), location.extension());

        let loader = self
            .loaders
            .get(&key)
            .ok_or_else(|| Error::NotFound(ident.into()))?;

        match loader.load(&location) {
            Ok(mut resource) => {
                if resource.id() != ident {
                    resource.set_id(ident);
                }
                Ok(resource)
            }
            Err(err) => match self.policy {
                FailurePolicy::Propagate => Err(Error::LoadFailure(ident.into(), Box::new(err))),
                FailurePolicy::Placeholder => {
                    error!(
                        "Loading {} through the ({}, {}) loader failed: {}",
                        ident,
                        location.scheme(),
                        location.extension(),
                        err
                    );
                    Ok(Box::new(TextResource::placeholder(ident)))
                }
            },
        }
    }
}

/// Maps a host directory onto a scheme, loading UTF-8 files as text
/// resources. `file:notes/day1.txt` resolves to `<root>/notes/day1.txt`.
pub struct DirectoryLoader {
    scheme: InlinableString,
    extensions: &'static [&'static str],
    root: PathBuf,
}

impl DirectoryLoader {
    /// Creates a loader serving `scheme` from a host directory.
    pub fn new<S, P>(scheme: S, root: P, extensions: &'static [&'static str]) -> Result<Self>
    where
        S: Into<InlinableString>,
        P: Into<PathBuf>,
    {
        let root = root.into();
        let meta = fs::metadata(&root)?;
        if !meta.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )));
        }

        Ok(DirectoryLoader {
            scheme: scheme.into(),
            extensions,
            root,
        })
    }
}

impl ResourceLoader for DirectoryLoader {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn extensions(&self) -> &[&'static str] {
        self.extensions
    }

    fn load(&self, location: &Location) -> Result<Box<dyn Resource>> {
        let path = self
            .root
            .join(format!("{}.{}", location.path(), location.extension()));
        let text = fs::read_to_string(&path)?;
        Ok(Box::new(TextResource::text(location.as_str(), text)))
    }
}

/// An in-memory backing store keyed by full identifier. The loader
/// equivalent of a scratch filesystem, mostly useful for tests and tools.
pub struct MemoryLoader {
    scheme: InlinableString,
    extensions: &'static [&'static str],
    entries: FastHashMap<String, String>,
}

impl MemoryLoader {
    /// Creates an empty store serving `scheme`.
    pub fn new<S>(scheme: S, extensions: &'static [&'static str]) -> Self
    where
        S: Into<InlinableString>,
    {
        MemoryLoader {
            scheme: scheme.into(),
            extensions,
            entries: FastHashMap::default(),
        }
    }

    /// Adds or replaces the text behind a full identifier.
    pub fn insert<I, S>(&mut self, ident: I, text: S)
    where
        I: Into<String>,
        S: Into<String>,
    {
        self.entries.insert(ident.into(), text.into());
    }
}

impl ResourceLoader for MemoryLoader {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn extensions(&self) -> &[&'static str] {
        self.extensions
    }

    fn load(&self, location: &Location) -> Result<Box<dyn Resource>> {
        match self.entries.get(location.as_str()) {
            Some(text) => Ok(Box::new(TextResource::text(location.as_str(), text.clone()))),
            None => Err(Error::NotFound(location.as_str().into())),
        }
    }
}
