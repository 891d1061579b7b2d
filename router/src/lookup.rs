//! Two-variant result returned at the price source boundary.

use crate::error::Unavailable;

/// A value from the price source, or the reason it is missing.
///
/// Absence is the only failure channel of the price source; callers
/// degrade on `NotAvailable` instead of propagating an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotAvailable(Unavailable),
}

impl<T> Lookup<T> {
    /// Discard the reason.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotAvailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&Unavailable> {
        match self {
            Lookup::Found(_) => None,
            Lookup::NotAvailable(reason) => Some(reason),
        }
    }
}

impl<T> From<Result<T, Unavailable>> for Lookup<T> {
    fn from(result: Result<T, Unavailable>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(reason) => Lookup::NotAvailable(reason),
        }
    }
}
