//! Currency and asset code types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CommonError, Result};

fn normalize(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CommonError::InvalidCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Fiat currency code (e.g. `CLP`), always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FiatCode(String);

impl FiatCode {
    /// Create a fiat code, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Parse a fiat code, rejecting blank or non-alphanumeric input.
    pub fn parse(code: &str) -> Result<Self> {
        normalize(code).map(Self)
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Lowercase form used by the venue's market addressing.
    pub fn to_venue(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn clp() -> Self {
        Self::new("CLP")
    }

    pub fn cop() -> Self {
        Self::new("COP")
    }

    pub fn pen() -> Self {
        Self::new("PEN")
    }
}

impl fmt::Display for FiatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FiatCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FiatCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<FiatCode> for String {
    fn from(code: FiatCode) -> Self {
        code.0
    }
}

/// Symbol of a non-fiat tradable asset (e.g. `BTC`), always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetCode(String);

impl AssetCode {
    /// Create an asset code, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Parse an asset code, rejecting blank or non-alphanumeric input.
    pub fn parse(code: &str) -> Result<Self> {
        normalize(code).map(Self)
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn to_venue(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<AssetCode> for String {
    fn from(code: AssetCode) -> Self {
        code.0
    }
}

/// The closed set of fiat currencies a deployment supports.
///
/// Iteration is in code order. The default set is `CLP`, `COP` and `PEN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatSet(BTreeSet<FiatCode>);

impl FiatSet {
    /// Build a set from codes; fails if no code is given.
    pub fn new<I, C>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<FiatCode>,
    {
        let set: BTreeSet<FiatCode> = codes.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(CommonError::EmptyFiatSet);
        }
        Ok(Self(set))
    }

    /// Parse a comma separated list such as `"clp, cop,pen"`.
    pub fn from_list(list: &str) -> Result<Self> {
        let codes = list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(FiatCode::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(codes)
    }

    /// Check membership of an already uppercase code.
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|f| f.code() == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FiatCode> {
        self.0.iter()
    }
}

impl Default for FiatSet {
    fn default() -> Self {
        Self([FiatCode::clp(), FiatCode::cop(), FiatCode::pen()].into_iter().collect())
    }
}

impl FromStr for FiatSet {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_list(s)
    }
}

impl fmt::Display for FiatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.0.iter().map(FiatCode::code).collect();
        write!(f, "{}", codes.join(","))
    }
}
