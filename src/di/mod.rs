//! Capability registration and resolution.
//!
//! A capability is an abstract contract, a trait object or concrete type,
//! that multiple implementations can satisfy. The [`Container`] maps a
//! capability, optionally refined by a name, to one shared instance; the
//! [`Context`] is the explicit composition root that owns a container and
//! gets passed into whoever needs wiring.
//!
//! [`Container`]: container/struct.Container.html
//! [`Context`]: context/struct.Context.html

pub mod container;
pub mod context;

pub use self::container::Container;
pub use self::context::Context;
