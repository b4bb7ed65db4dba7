//! The serializable, id-indexed resource registry.

use std::any;

use serde::de::DeserializeOwned;

use crate::errors::{Error, Result};
use crate::utils::FastHashMap;

use super::loader::LoaderDriver;
use super::resource::{Resource, TextResource};

/// Indexed registry of resources. Ids are unique within one library;
/// insertion order is irrelevant for lookup but retained so the persisted
/// form is stable.
///
/// The library owns every resource it materializes or that is added to it,
/// and disposes each owned resource exactly once: on overwrite, on explicit
/// [`dispose`], or when the library is dropped.
///
/// [`dispose`]: #method.dispose
pub struct ResourceLibrary {
    driver: LoaderDriver,
    resources: FastHashMap<String, Box<dyn Resource>>,
    order: Vec<String>,
    disposed: bool,
}

impl ResourceLibrary {
    /// Creates an empty library on top of the given loader dispatch.
    pub fn new(driver: LoaderDriver) -> Self {
        ResourceLibrary {
            driver,
            resources: FastHashMap::default(),
            order: Vec::new(),
            disposed: false,
        }
    }

    /// The underlying loader dispatch.
    #[inline]
    pub fn driver(&self) -> &LoaderDriver {
        &self.driver
    }

    /// Mutable access to the dispatch, for registering loaders after
    /// construction.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut LoaderDriver {
        &mut self.driver
    }

    /// Number of held resources.
    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Whether a resource is cached under `id`. Never triggers a load.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Inserts `resource` under `id`, transferring ownership to the library.
    ///
    /// An existing occupant is disposed before the newcomer becomes visible.
    /// If the occupant's release hook fails, the error propagates and the
    /// newcomer is dropped rather than inserted; the occupant's payload is
    /// released either way.
    pub fn add<I>(&mut self, id: I, mut resource: Box<dyn Resource>) -> Result<()>
    where
        I: Into<String>,
    {
        self.guard()?;

        let id = id.into();
        if resource.id() != id {
            resource.set_id(&id);
        }

        if let Some(mut previous) = self.resources.remove(&id) {
            previous.dispose()?;
        } else {
            self.order.push(id.clone());
        }

        self.resources.insert(id, resource);
        Ok(())
    }

    /// Typed lookup. On a miss the identifier goes through the loader
    /// dispatch and a success is cached, so materialization happens at most
    /// once per id.
    pub fn get<T>(&mut self, id: &str) -> Result<&T>
    where
        T: Resource,
    {
        self.get_dyn(id)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| Error::CastFailure(id.into(), any::type_name::<T>()))
    }

    /// Untyped lookup with the same load-on-miss behavior as [`get`].
    ///
    /// [`get`]: #method.get
    pub fn get_dyn(&mut self, id: &str) -> Result<&dyn Resource> {
        self.guard()?;

        if !self.resources.contains_key(id) {
            let resource = self.driver.load(id)?;
            self.order.push(id.into());
            self.resources.insert(id.into(), resource);
            trace!("Cached {} after first load.", id);
        }

        match self.resources.get(id) {
            Some(resource) => Ok(resource.as_ref()),
            None => Err(Error::NotFound(id.into())),
        }
    }

    /// Decodes the structured text payload of `id` into a typed value graph.
    ///
    /// The resource must carry a text view holding canonical JSON; anything
    /// else is a cast failure.
    pub fn get_serialized<T>(&mut self, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let resource = self.get_dyn(id)?;
        let text = resource
            .text()
            .ok_or_else(|| Error::CastFailure(id.into(), "textual payload"))?;

        serde_json::from_str(text).map_err(|err| {
            warn!("Decoding {} into {} failed: {}", id, any::type_name::<T>(), err);
            Error::CastFailure(id.into(), any::type_name::<T>())
        })
    }

    /// Lazy iteration over every held resource assignable to `T`, in
    /// insertion order. Never triggers a load, and can be restarted by
    /// calling it again.
    pub fn resources_of<T>(&self) -> Result<impl Iterator<Item = &T>>
    where
        T: Resource,
    {
        self.guard()?;
        Ok(self.order.iter().filter_map(move |id| {
            self.resources
                .get(id)
                .and_then(|resource| resource.as_any().downcast_ref::<T>())
        }))
    }

    /// Untyped iteration over every held resource, in insertion order.
    pub fn iter(&self) -> Result<impl Iterator<Item = &dyn Resource>> {
        self.guard()?;
        Ok(self
            .order
            .iter()
            .filter_map(move |id| self.resources.get(id).map(|resource| resource.as_ref())))
    }

    /// Serializes the library into its persisted form: one line per
    /// resource, `id => kind => payload`, where `kind` is `text` for
    /// resources carrying a text view and `ref` for opaque ones. Opaque
    /// resources persist as a reference to their own identifier and are
    /// re-materialized through the dispatch on deserialization.
    pub fn serialize(&self) -> Result<String> {
        self.guard()?;

        let mut doc = String::new();
        for id in &self.order {
            if let Some(resource) = self.resources.get(id) {
                match resource.text() {
                    Some(text) => {
                        doc.push_str(&format!("{} => text => {}\n", id, escape(text)));
                    }
                    None => {
                        doc.push_str(&format!("{} => ref => {}\n", id, id));
                    }
                }
            }
        }

        Ok(doc)
    }

    /// Reconstructs a library from a previously serialized document.
    ///
    /// Text entries are restored directly; `ref` entries go back through
    /// `driver`, honoring its failure policy.
    pub fn deserialize(doc: &str, driver: LoaderDriver) -> Result<Self> {
        let mut library = ResourceLibrary::new(driver);

        for (index, line) in doc.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(3, " => ");
            match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some("text"), Some(payload)) => {
                    library.add(id, Box::new(TextResource::text(id, unescape(payload))))?;
                }
                (Some(id), Some("ref"), Some(_)) => {
                    library.get_dyn(id)?;
                }
                _ => return Err(Error::MalformedDocument(index + 1)),
            }
        }

        Ok(library)
    }

    /// Disposes every owned resource exactly once, in insertion order, then
    /// clears the index. Idempotent; every operation afterwards fails with
    /// [`Error::DisposedAccess`]. The first release-hook failure is returned
    /// after the sweep finishes, so later resources are still released.
    ///
    /// [`Error::DisposedAccess`]: ../../errors/enum.Error.html
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let mut first_failure = None;
        for id in self.order.drain(..) {
            if let Some(mut resource) = self.resources.remove(&id) {
                if let Err(err) = resource.dispose() {
                    error!("Disposing {} failed: {}", id, err);
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }
        self.resources.clear();

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Whether [`dispose`] has run already.
    ///
    /// [`dispose`]: #method.dispose
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn guard(&self) -> Result<()> {
        if self.disposed {
            Err(Error::DisposedAccess("library".into()))
        } else {
            Ok(())
        }
    }
}

impl Drop for ResourceLibrary {
    fn drop(&mut self) {
        // Hook failures are already logged inside `dispose`.
        let _ = self.dispose();
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
