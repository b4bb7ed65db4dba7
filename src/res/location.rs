//! Parsed resource identifiers.

use std::fmt;

use crate::errors::{Error, Result};

/// A parsed identifier of the form `<scheme>:<path>.<extension>`, e.g.
/// `asset:Sprites/Hero.prefab`.
///
/// The scheme is everything before the first colon and selects the loader
/// family; the extension is everything after the last dot and selects the
/// specific loader within that family. The path in between is opaque to the
/// dispatch and may itself contain further colons and dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    ident: &'a str,
    colon: usize,
    dot: usize,
}

impl<'a> Location<'a> {
    /// Parses an identifier into its scheme, path and extension parts.
    pub fn parse(ident: &'a str) -> Result<Self> {
        let colon = ident
            .find(':')
            .ok_or_else(|| Error::MalformedLocation(ident.into()))?;
        let dot = ident
            .rfind('.')
            .ok_or_else(|| Error::MalformedLocation(ident.into()))?;

        // Scheme, path and extension must all be non-empty.
        if colon == 0 || dot <= colon + 1 || dot + 1 >= ident.len() {
            return Err(Error::MalformedLocation(ident.into()));
        }

        Ok(Location { ident, colon, dot })
    }

    /// The loader family, e.g. `asset`.
    #[inline]
    pub fn scheme(&self) -> &'a str {
        &self.ident[..self.colon]
    }

    /// The readable path between scheme and extension.
    #[inline]
    pub fn path(&self) -> &'a str {
        &self.ident[self.colon + 1..self.dot]
    }

    /// The extension, e.g. `prefab`.
    #[inline]
    pub fn extension(&self) -> &'a str {
        &self.ident[self.dot + 1..]
    }

    /// The full identifier as it was given.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.ident
    }
}

impl<'a> fmt::Display for Location<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.ident)
    }
}
