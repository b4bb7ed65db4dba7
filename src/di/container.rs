//! The capability(+name) keyed singleton registry.

use std::any::{self, Any, TypeId};
use std::sync::{Arc, Mutex};

use inlinable_string::InlinableString;

use crate::errors::{Error, Result};
use crate::utils::FastHashMap;

type BoxedInstance = Box<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce() -> BoxedInstance + Send>;

enum Registration {
    /// A pre-built instance, shared as-is.
    Instance(BoxedInstance),
    /// A binding constructed on first resolution and shared thereafter.
    Deferred(Mutex<DeferredSlot>),
}

struct DeferredSlot {
    factory: Option<Factory>,
    instance: Option<BoxedInstance>,
}

impl Registration {
    fn resolve<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match *self {
            Registration::Instance(ref boxed) => boxed.downcast_ref::<Arc<C>>().cloned(),
            Registration::Deferred(ref slot) => {
                let mut slot = slot.lock().unwrap();
                if slot.instance.is_none() {
                    if let Some(factory) = slot.factory.take() {
                        slot.instance = Some(factory());
                    }
                }

                slot.instance
                    .as_ref()
                    .and_then(|boxed| boxed.downcast_ref::<Arc<C>>())
                    .cloned()
            }
        }
    }
}

struct CapabilityEntry {
    /// Capability type name, kept for diagnostics.
    capability: &'static str,
    bindings: FastHashMap<Option<InlinableString>, Registration>,
}

/// Maps (capability, optional name) to a singleton registration.
///
/// Multiple distinct names may register different implementations of the
/// same capability, forming a polymorphic set. Conflicting registrations are
/// rejected eagerly, at registration time; resolving an unregistered
/// capability never yields a default value.
#[derive(Default)]
pub struct Container {
    registrations: FastHashMap<TypeId, CapabilityEntry>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Container {
            registrations: FastHashMap::default(),
        }
    }

    /// Registers a pre-built unnamed singleton for capability `C`.
    pub fn register<C>(&mut self, instance: Arc<C>) -> Result<()>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.bind::<C>(None, Registration::Instance(Box::new(instance)))
    }

    /// Registers a pre-built singleton for capability `C` under `name`.
    pub fn register_named<C>(&mut self, name: &str, instance: Arc<C>) -> Result<()>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.bind::<C>(
            Some(name.into()),
            Registration::Instance(Box::new(instance)),
        )
    }

    /// Registers an unnamed binding constructed on first resolution. The
    /// factory runs at most once; every resolution shares its result.
    pub fn register_with<C, F>(&mut self, factory: F) -> Result<()>
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce() -> Arc<C> + Send + 'static,
    {
        self.bind::<C>(None, Registration::Deferred(Mutex::new(defer(factory))))
    }

    /// Registers a named binding constructed on first resolution.
    pub fn register_named_with<C, F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        C: ?Sized + Send + Sync + 'static,
        F: FnOnce() -> Arc<C> + Send + 'static,
    {
        self.bind::<C>(
            Some(name.into()),
            Registration::Deferred(Mutex::new(defer(factory))),
        )
    }

    /// Resolves the single registration for `C`.
    ///
    /// Zero candidates fail with [`Error::UnresolvedCapability`], more than
    /// one with [`Error::AmbiguousRegistration`]; an unnamed resolve never
    /// picks among candidates by map order.
    ///
    /// [`Error::UnresolvedCapability`]: ../../errors/enum.Error.html
    /// [`Error::AmbiguousRegistration`]: ../../errors/enum.Error.html
    pub fn resolve<C>(&self) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let entry = self.entry::<C>()?;
        if entry.bindings.len() > 1 {
            return Err(Error::AmbiguousRegistration(entry.capability));
        }

        entry
            .bindings
            .values()
            .next()
            .and_then(|registration| registration.resolve::<C>())
            .ok_or(Error::UnresolvedCapability(entry.capability))
    }

    /// Resolves the registration for `C` under exactly `name`.
    pub fn resolve_named<C>(&self, name: &str) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let entry = self.entry::<C>()?;
        entry
            .bindings
            .get(&Some(InlinableString::from(name)))
            .and_then(|registration| registration.resolve::<C>())
            .ok_or(Error::UnresolvedCapability(entry.capability))
    }

    /// Lazy sequence over every registration for `C`, named or not.
    pub fn resolve_all<C>(&self) -> impl Iterator<Item = Arc<C>> + '_
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.registrations
            .get(&TypeId::of::<C>())
            .into_iter()
            .flat_map(|entry| entry.bindings.values())
            .filter_map(|registration| registration.resolve::<C>())
    }

    fn entry<C>(&self) -> Result<&CapabilityEntry>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.registrations
            .get(&TypeId::of::<C>())
            .filter(|entry| !entry.bindings.is_empty())
            .ok_or_else(|| Error::UnresolvedCapability(any::type_name::<C>()))
    }

    fn bind<C>(&mut self, name: Option<InlinableString>, registration: Registration) -> Result<()>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let entry = self
            .registrations
            .entry(TypeId::of::<C>())
            .or_insert_with(|| CapabilityEntry {
                capability: any::type_name::<C>(),
                bindings: FastHashMap::default(),
            });

        if entry.bindings.contains_key(&name) {
            return Err(Error::DuplicateRegistration(
                entry.capability,
                name.map(|n| n.to_string()),
            ));
        }

        trace!("Registered {} under {:?}.", entry.capability, name);
        entry.bindings.insert(name, registration);
        Ok(())
    }
}

fn defer<C, F>(factory: F) -> DeferredSlot
where
    C: ?Sized + Send + Sync + 'static,
    F: FnOnce() -> Arc<C> + Send + 'static,
{
    DeferredSlot {
        factory: Some(Box::new(move || Box::new(factory()) as BoxedInstance)),
        instance: None,
    }
}
