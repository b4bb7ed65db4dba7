//! A small, portable resource registry with pluggable loading, paired with a
//! capability-based dependency container.
//!
//! _Satchel_ lets consumer code address arbitrary native payloads and
//! collaborating services by string identifier or capability type, without
//! depending on concrete construction logic.
//!
//! # Resources
//!
//! A resource is an identifiable unit of content, either plain text or a
//! wrapped native object, addressable by a string id. Resources live inside a
//! [`ResourceLibrary`], which owns every resource it holds and disposes each
//! of them exactly once.
//!
//! Identifiers take the form `<scheme>:<path>.<extension>`, for example
//! `asset:Sprites/Hero.prefab`. When a library is asked for an id it does not
//! hold yet, the identifier is handed to the loader dispatch: the scheme
//! selects the loader family and the extension selects the specific
//! [`ResourceLoader`] within it. A successful load is cached and owned by the
//! library from then on.
//!
//! # Capabilities
//!
//! A capability is an abstract contract that multiple concrete
//! implementations can satisfy. The [`Container`] maps a capability type,
//! optionally refined by a name, to one shared instance. It is the wiring
//! layer for loaders and consumer services, and is consulted independently of
//! the library.
//!
//! There is no process-wide container. Wiring happens through an explicit
//! [`Context`] object passed into whoever needs it; test isolation is just a
//! fresh context.
//!
//! [`ResourceLibrary`]: res/library/struct.ResourceLibrary.html
//! [`ResourceLoader`]: res/loader/trait.ResourceLoader.html
//! [`Container`]: di/container/struct.Container.html
//! [`Context`]: di/context/struct.Context.html

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod errors;
pub mod utils;

pub mod di;
pub mod res;

pub mod prelude {
    pub use crate::di::{Container, Context};
    pub use crate::res::{
        DirectoryLoader, FailurePolicy, LoaderDriver, Location, MemoryLoader, NativePayload,
        NativeResource, Resource, ResourceLibrary, ResourceLoader, TextResource,
    };
}
