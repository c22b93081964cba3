//! Source identifiers backed by a global string interner.
//!
//! Every element handed to the annotation engine is tracked by a [`SourceId`].
//! Ids are copied freely between pipeline stages, worker threads and the
//! host document, so they are interned once and compared as symbols.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for source identifiers.
///
/// # Thread Safety
///
/// Access goes through a `Mutex`; the pipeline may resolve ids from
/// several rayon workers at once.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Prefix of the ids generated by [`SourceId::from_index`].
pub const ANONYMOUS_PREFIX: &str = "__";

/// Identifier of a source element in the host document.
///
/// # Examples
///
/// ```
/// use calliper_core::identifier::SourceId;
///
/// let plate = SourceId::new("plate");
/// assert_eq!(plate, "plate");
///
/// // Elements without an id are named after their selection index
/// let unnamed = SourceId::from_index(3);
/// assert_eq!(unnamed, "__3");
///
/// // Generated artifacts derive their ids from the source
/// assert_eq!(plate.derive("dimension"), "plate-dimension");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(DefaultSymbol);

impl SourceId {
    /// Creates a `SourceId` from the element's document id.
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Creates the identifier used for an element that carries no id of its own.
    ///
    /// # Arguments
    ///
    /// * `idx` - Position of the element in the selection.
    pub fn from_index(idx: usize) -> Self {
        let name = format!("{ANONYMOUS_PREFIX}{idx}");
        Self::new(&name)
    }

    /// Creates an identifier for an artifact generated from this source,
    /// joining both parts with `-`.
    pub fn derive(&self, suffix: &str) -> Self {
        let mut interner = interner();
        let base = interner
            .resolve(self.0)
            .expect("Source id should exist in interner");
        let derived = format!("{base}-{suffix}");
        Self(interner.get_or_intern(&derived))
    }

    /// Returns `true` when the id was synthesized by [`SourceId::from_index`].
    pub fn is_anonymous(&self) -> bool {
        self.to_string().starts_with(ANONYMOUS_PREFIX)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for SourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for SourceId {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for SourceId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
