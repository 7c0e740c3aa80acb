//! Optimistic-concurrency wrappers for the remote ledger document.
//!
//! The remote content store assigns an opaque token (its content hash) to
//! every version of the ledger document. A write must present the token of
//! the version it is replacing; a stale token is rejected. [`WriteToken`]
//! makes the "refresh immediately before write" discipline a type-level
//! rule: it is single-use, not `Clone`, and only ledger stores hand one out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque version identifier assigned by the remote store on every
/// successful read or write.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentToken(String);

impl ContentToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentToken({})", self.0)
    }
}

/// A value read from the remote store together with the token identifying
/// the version that was read.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub token: ContentToken,
}

impl<T> Versioned<T> {
    pub fn new(value: T, token: ContentToken) -> Self {
        Self { value, token }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            value: f(self.value),
            token: self.token,
        }
    }
}

/// A freshly read token, fit for exactly one write.
///
/// Deliberately not `Clone` and consumed by value on push, so a token read
/// earlier in the session cannot be reused. Obtain one from
/// `LedgerStore::refresh_token` as the last step before a write. The window
/// between the refresh and the write is still a race (two writers can
/// interleave there); that limitation is accepted, not solved.
#[derive(Debug)]
pub struct WriteToken(ContentToken);

impl WriteToken {
    pub fn new(token: ContentToken) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> ContentToken {
        self.0
    }
}
