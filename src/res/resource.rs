//! Polymorphic wrapping of native payloads into the uniform resource
//! capability.

use std::any::{self, Any};
use std::fmt;

use inlinable_string::InlinableString;
use uuid::Uuid;

use crate::errors::{Error, Result};

/// An identifiable unit of content held by a library.
///
/// Implementations own their underlying payload exclusively and release it
/// exactly once, no matter how often `dispose` is invoked.
pub trait Resource: Any + Send {
    /// The identifier this resource is addressed by within one library.
    fn id(&self) -> &str;

    /// Rebinds the identifier. Libraries use this when caching a resource
    /// under the identifier it was requested by.
    fn set_id(&mut self, id: &str);

    /// The text view of this resource, if it carries one.
    fn text(&self) -> Option<&str>;

    /// Whether this resource wraps a text payload.
    fn is_text(&self) -> bool {
        self.text().is_some()
    }

    /// Releases the underlying payload. Idempotent: a second call is a no-op,
    /// never an error. Errors originate solely from release hooks and
    /// propagate unmodified.
    fn dispose(&mut self) -> Result<()>;

    /// Whether `dispose` has run already.
    fn is_disposed(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Display for dyn Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(text),
            None => write!(f, "[resource {}]", self.id()),
        }
    }
}

/// The payload of a [`NativeResource`], tagged at wrap time.
///
/// The wrapping site knows the concrete payload kind, so whether a resource
/// is text is a variant decision made once, not a runtime type check.
///
/// [`NativeResource`]: struct.NativeResource.html
#[derive(Debug)]
pub enum NativePayload<T> {
    /// A textual payload, exposed through [`Resource::text`].
    ///
    /// [`Resource::text`]: trait.Resource.html#tymethod.text
    Text(String),
    /// An opaque native handle.
    Opaque(T),
}

type ReleaseHook<T> = Box<dyn FnMut(NativePayload<T>) -> Result<()> + Send>;

/// Adapts one native payload of static type `T` into the [`Resource`]
/// capability.
///
/// [`Resource`]: trait.Resource.html
pub struct NativeResource<T = ()> {
    id: InlinableString,
    payload: Option<NativePayload<T>>,
    release: Option<ReleaseHook<T>>,
}

/// A [`NativeResource`] carrying nothing but text.
///
/// [`NativeResource`]: struct.NativeResource.html
pub type TextResource = NativeResource<()>;

impl<T: Send + 'static> NativeResource<T> {
    /// Wraps `payload` under the given id.
    pub fn new<I>(id: I, payload: NativePayload<T>) -> Self
    where
        I: Into<InlinableString>,
    {
        NativeResource {
            id: id.into(),
            payload: Some(payload),
            release: None,
        }
    }

    /// Wraps `payload` under a freshly generated id.
    pub fn with_generated_id(payload: NativePayload<T>) -> Self {
        Self::new(Uuid::new_v4().to_string(), payload)
    }

    /// Wraps an opaque native handle.
    pub fn opaque<I>(id: I, payload: T) -> Self
    where
        I: Into<InlinableString>,
    {
        Self::new(id, NativePayload::Opaque(payload))
    }

    /// Attaches a hook that receives the payload exactly once at disposal,
    /// for payloads tied to external handles. Hook failures propagate
    /// unmodified out of [`Resource::dispose`].
    ///
    /// [`Resource::dispose`]: trait.Resource.html#tymethod.dispose
    pub fn with_release<F>(mut self, hook: F) -> Self
    where
        F: FnMut(NativePayload<T>) -> Result<()> + Send + 'static,
    {
        self.release = Some(Box::new(hook));
        self
    }

    /// The static type of the wrapped payload.
    pub fn native_type(&self) -> &'static str {
        any::type_name::<T>()
    }

    /// Borrow of the owned payload.
    pub fn payload(&self) -> Result<&NativePayload<T>> {
        self.payload
            .as_ref()
            .ok_or_else(|| Error::DisposedAccess(self.id.to_string()))
    }

    /// The opaque native handle, when the payload is not text.
    pub fn native(&self) -> Result<Option<&T>> {
        match self.payload()? {
            NativePayload::Opaque(payload) => Ok(Some(payload)),
            NativePayload::Text(_) => Ok(None),
        }
    }
}

impl TextResource {
    /// Wraps a plain text payload.
    pub fn text<I, S>(id: I, text: S) -> Self
    where
        I: Into<InlinableString>,
        S: Into<String>,
    {
        NativeResource::new(id, NativePayload::Text(text.into()))
    }

    /// The degraded wrapper substituted for a failed load under
    /// [`FailurePolicy::Placeholder`].
    ///
    /// [`FailurePolicy::Placeholder`]: ../loader/enum.FailurePolicy.html
    pub fn placeholder<I>(id: I) -> Self
    where
        I: Into<InlinableString>,
    {
        Self::text(id, "")
    }
}

impl<T: Send + 'static> Resource for NativeResource<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.into();
    }

    fn text(&self) -> Option<&str> {
        match self.payload {
            Some(NativePayload::Text(ref text)) => Some(text),
            _ => None,
        }
    }

    fn dispose(&mut self) -> Result<()> {
        if let Some(payload) = self.payload.take() {
            if let Some(ref mut hook) = self.release {
                hook(payload)?;
            }
        }

        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.payload.is_none()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Send + 'static> fmt::Display for NativeResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(text),
            None => write!(f, "[resource {}]", self.id),
        }
    }
}

impl<T> Drop for NativeResource<T> {
    fn drop(&mut self) {
        // `dispose` re-done by hand since `Drop` cannot propagate hook errors.
        if let Some(payload) = self.payload.take() {
            if let Some(ref mut hook) = self.release {
                if let Err(err) = hook(payload) {
                    error!("Releasing resource {} failed: {}", self.id, err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn dispose_is_idempotent() {
        let mut resource = TextResource::text("asset:hero.prefab", "HERO");
        assert!(!resource.is_disposed());

        resource.dispose().unwrap();
        assert!(resource.is_disposed());
        assert_eq!(resource.text(), None);

        // Observably identical to the first call.
        resource.dispose().unwrap();
        assert!(resource.is_disposed());
    }

    #[test]
    fn release_hook_runs_exactly_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();

        let mut resource = NativeResource::opaque("gpu:mesh/quad.vbo", 42u32).with_release(
            move |payload| {
                match payload {
                    NativePayload::Opaque(42) => counter.fetch_add(1, Ordering::SeqCst),
                    _ => panic!("hook received the wrong payload"),
                };
                Ok(())
            },
        );

        resource.dispose().unwrap();
        resource.dispose().unwrap();
        drop(resource);

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hook_errors_propagate() {
        let mut resource = NativeResource::opaque("gpu:tex/hero.rgba", vec![0u8; 4])
            .with_release(|_| Err(Error::Release("device lost".into())));

        match resource.dispose() {
            Err(Error::Release(ref message)) => assert_eq!(message, "device lost"),
            other => panic!("unexpected result: {:?}", other),
        }

        // The payload is gone regardless; a second dispose is a no-op.
        assert!(resource.is_disposed());
        resource.dispose().unwrap();
    }

    #[test]
    fn display_is_text_or_token() {
        let text = TextResource::text("asset:hero.prefab", "HERO");
        assert_eq!(format!("{}", text), "HERO");

        let opaque = NativeResource::opaque("gpu:mesh/quad.vbo", 7u8);
        assert_eq!(format!("{}", opaque), "[resource gpu:mesh/quad.vbo]");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = TextResource::with_generated_id(NativePayload::Text("a".into()));
        let b = TextResource::with_generated_id(NativePayload::Text("b".into()));
        assert_ne!(a.id(), b.id());
    }
}
