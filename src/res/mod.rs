//! Resource addressing, loading and ownership.
//!
//! The resource system splits into three layers, leaves first:
//!
//! - [`NativeResource`] adapts one opaque native payload into the uniform
//!   [`Resource`] capability. Whether a resource is text is decided at wrap
//!   time through [`NativePayload`], by whoever knows the concrete payload
//!   kind.
//! - [`LoaderDriver`] parses identifiers of the form
//!   `<scheme>:<path>.<extension>` and routes them to the single
//!   [`ResourceLoader`] registered for the (scheme, extension) pair.
//! - [`ResourceLibrary`] is the indexed, serializable registry on top. A
//!   lookup miss delegates to the driver, and a successful load is cached
//!   and owned by the library from then on.
//!
//! Everything here is synchronous. A loader that blocks on its backing store
//! blocks the calling thread for the full duration; responsiveness, where
//! required, is the caller's to layer on.
//!
//! [`NativeResource`]: resource/struct.NativeResource.html
//! [`Resource`]: resource/trait.Resource.html
//! [`NativePayload`]: resource/enum.NativePayload.html
//! [`LoaderDriver`]: loader/struct.LoaderDriver.html
//! [`ResourceLoader`]: loader/trait.ResourceLoader.html
//! [`ResourceLibrary`]: library/struct.ResourceLibrary.html

pub mod library;
pub mod loader;
pub mod location;
pub mod resource;

pub use self::library::ResourceLibrary;
pub use self::loader::{
    DirectoryLoader, FailurePolicy, LoaderDriver, MemoryLoader, ResourceLoader,
};
pub use self::location::Location;
pub use self::resource::{NativePayload, NativeResource, Resource, TextResource};
