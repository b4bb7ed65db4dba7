//! Crate-wide error taxonomy.
//!
//! Registration-time errors (`DuplicateLoader`, `DuplicateRegistration`) are
//! raised eagerly at registration. Resolution-time and load-time errors
//! surface to the immediate caller; nothing in the crate retries internally.

use std::io;

#[derive(Debug, Fail)]
pub enum Error {
    /// No cached resource and no loader satisfies the identifier.
    #[fail(display = "Resource {} could not be found in this registry.", _0)]
    NotFound(String),

    /// The resource exists but is not assignable to the requested type.
    #[fail(display = "Resource {} is not assignable to {}.", _0, _1)]
    CastFailure(String, &'static str),

    /// An unnamed resolve found more than one candidate.
    #[fail(
        display = "Capability {} has more than one registration; resolve it by name.",
        _0
    )]
    AmbiguousRegistration(&'static str),

    /// A resolve found no candidate at all.
    #[fail(display = "Capability {} has no matching registration.", _0)]
    UnresolvedCapability(&'static str),

    /// A loader ran but the underlying fetch failed.
    #[fail(display = "Loading {} failed: {}", _0, _1)]
    LoadFailure(String, Box<Error>),

    /// Operation on an already-disposed wrapper or library.
    #[fail(display = "{} has been disposed already.", _0)]
    DisposedAccess(String),

    /// The identifier does not parse as `<scheme>:<path>.<extension>`.
    #[fail(display = "Identifier {} is malformed.", _0)]
    MalformedLocation(String),

    /// A persisted library document failed to parse.
    #[fail(display = "Persisted library document is malformed at line {}.", _0)]
    MalformedDocument(usize),

    /// A loader for this (scheme, extension) pair exists already.
    #[fail(display = "A loader for ({}, {}) has been registered already.", _0, _1)]
    DuplicateLoader(String, String),

    /// This (capability, name) pair is registered already.
    #[fail(display = "Capability {} is registered already under {:?}.", _0, _1)]
    DuplicateRegistration(&'static str, Option<String>),

    /// A release hook failed while tearing down an external handle.
    #[fail(display = "{}", _0)]
    Release(String),

    #[fail(display = "{}", _0)]
    Io(io::Error),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
