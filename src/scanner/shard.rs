use std::ops::Range;

use crate::error::ConfigError;

/// This worker's share of the global target list.
///
/// Targets are split into `total` contiguous chunks of `ceil(len / total)`; worker
/// `index` (1-based) takes the chunk at that ordinal. Chunks never overlap and the
/// split is fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerShard {
    index: usize,
    total: usize,
}

impl WorkerShard {
    pub fn new(index: usize, total: usize) -> Result<Self, ConfigError> {
        if total == 0 || index == 0 || index > total {
            return Err(ConfigError::InvalidShard {
                worker: index,
                total,
            });
        }
        Ok(Self { index, total })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn range(&self, len: usize) -> Range<usize> {
        let per_worker = len.div_ceil(self.total);
        let start = ((self.index - 1) * per_worker).min(len);
        let end = (start + per_worker).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}
