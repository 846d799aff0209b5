//! Source selection.
//!
//! Destinations prefer a source with the same extension. When no source
//! shares the extension, the pick falls back to the whole source list, either
//! freely (reuse allowed) or through a [`SourcePool`] that hands out every
//! source once before starting over.

use std::collections::HashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use crate::model::SourceFile;

/// Sources grouped by lowercase extension, in validation order within a group.
#[derive(Debug, Clone, Default)]
pub struct ExtensionIndex {
    groups: HashMap<String, Vec<usize>>,
}

impl ExtensionIndex {
    pub fn build(sources: &[SourceFile]) -> Self {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, source) in sources.iter().enumerate() {
            groups.entry(source.extension.clone()).or_default().push(i);
        }
        ExtensionIndex { groups }
    }

    /// Indices of the sources with `extension`, empty if there are none.
    pub fn candidates(&self, extension: &str) -> &[usize] {
        self.groups.get(extension).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Fallback pool for no-reuse mode.
#[derive(Debug, Clone)]
pub struct SourcePool {
    total: usize,
    available: Vec<usize>,
}

impl SourcePool {
    pub fn new(total: usize) -> Self {
        SourcePool {
            total,
            available: (0..total).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Draw a source index, refilling the pool first if it is empty.
    ///
    /// Returns `None` only when the pool was created over zero sources.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.available.is_empty() {
            self.available = (0..self.total).collect();
        }
        let chosen = *self.available.choose(rng)?;
        if let Some(pos) = self.available.iter().position(|&i| i == chosen) {
            self.available.remove(pos);
        }
        Some(chosen)
    }
}

/// Picks a source index for each destination extension.
#[derive(Debug, Clone)]
pub struct SourceSelector {
    index: ExtensionIndex,
    source_count: usize,
    pool: Option<SourcePool>,
}

impl SourceSelector {
    pub fn new(sources: &[SourceFile], no_reuse: bool) -> Self {
        SourceSelector {
            index: ExtensionIndex::build(sources),
            source_count: sources.len(),
            pool: no_reuse.then(|| SourcePool::new(sources.len())),
        }
    }

    /// Choose a source index for a destination with `extension`.
    ///
    /// Returns `None` only if the selector was built over zero sources.
    pub fn choose<R: Rng + ?Sized>(&mut self, extension: &str, rng: &mut R) -> Option<usize> {
        if let Some(&chosen) = self.index.candidates(extension).choose(rng) {
            return Some(chosen);
        }
        match self.pool.as_mut() {
            Some(pool) => pool.draw(rng),
            None if self.source_count == 0 => None,
            None => Some(rng.gen_range(0..self.source_count)),
        }
    }
}
