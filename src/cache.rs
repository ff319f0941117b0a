//! Optional memoization of loaded tables keyed by upload identity.
//!
//! Re-uploading identical bytes skips the parse. Nothing in the
//! aggregation pipeline reads from here.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::InstitutionConfig;
use crate::error::DashboardError;
use crate::loader::{SourceFormat, load_table};
use crate::table::ResultTable;

#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<(String, SourceFormat, String), Arc<ResultTable>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `bytes`, loading it on first sight.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(
        &mut self,
        bytes: &[u8],
        format: SourceFormat,
        config: &InstitutionConfig,
    ) -> Result<Arc<ResultTable>, DashboardError> {
        let key = (digest(bytes), format, config.sheet_name.clone());
        if let Some(table) = self.entries.get(&key) {
            debug!(digest = %key.0, "Load cache hit");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_table(bytes, format, config)?);
        debug!(digest = %key.0, "Load cache miss");
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
