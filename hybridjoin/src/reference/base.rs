use std::sync::Arc;

use crate::error::JoinResult;
use crate::types::{ReferenceRecord, SecondaryKey, SecondaryRecord};

/// Keyed lookup from join key to reference record.
pub trait ReferenceIndex {
    /// Returns the reference record for `key`, or [`None`] when the key is absent.
    ///
    /// An absent key is not an error; it means the stream record has no match.
    fn lookup(&self, key: &str) -> Option<&ReferenceRecord>;

    /// Returns the number of distinct keys held by the index.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`crate::error::ErrorKind::UpstreamUnavailable`] when the index cannot serve
    /// lookups yet.
    fn ensure_ready(&self) -> JoinResult<()> {
        Ok(())
    }
}

/// Keyed lookup from secondary key to secondary record.
pub trait SecondaryIndex {
    /// Returns the secondary record for `key`, or [`None`] when the key is absent.
    fn lookup(&self, key: SecondaryKey) -> Option<&SecondaryRecord>;

    /// Fails with [`crate::error::ErrorKind::UpstreamUnavailable`] when the index cannot serve
    /// lookups yet.
    fn ensure_ready(&self) -> JoinResult<()> {
        Ok(())
    }
}

impl<T: ReferenceIndex + ?Sized> ReferenceIndex for &T {
    fn lookup(&self, key: &str) -> Option<&ReferenceRecord> {
        (**self).lookup(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        (**self).ensure_ready()
    }
}

impl<T: ReferenceIndex + ?Sized> ReferenceIndex for Arc<T> {
    fn lookup(&self, key: &str) -> Option<&ReferenceRecord> {
        (**self).lookup(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        (**self).ensure_ready()
    }
}

impl<T: SecondaryIndex + ?Sized> SecondaryIndex for &T {
    fn lookup(&self, key: SecondaryKey) -> Option<&SecondaryRecord> {
        (**self).lookup(key)
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        (**self).ensure_ready()
    }
}

impl<T: SecondaryIndex + ?Sized> SecondaryIndex for Arc<T> {
    fn lookup(&self, key: SecondaryKey) -> Option<&SecondaryRecord> {
        (**self).lookup(key)
    }

    fn ensure_ready(&self) -> JoinResult<()> {
        (**self).ensure_ready()
    }
}
