//! Write batching
//!
//! Airtable accepts at most ten records per create, update or delete call.
//! Every mutating operation goes through a [`BatchPlanner`] so the split is
//! made in one place.

use crate::error::{Error, Result};

/// Maximum number of records Airtable accepts in one mutating request
pub const MAX_BATCH_SIZE: usize = 10;

/// Split a slice into ordered chunks of at most `size` items
///
/// The last chunk may be shorter. An empty slice yields no chunks.
/// A `size` of zero is treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

/// Splits record sequences into request-sized chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    size: usize,
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self {
            size: MAX_BATCH_SIZE,
        }
    }
}

impl BatchPlanner {
    /// Create a planner with a custom chunk size
    ///
    /// The size must be between 1 and [`MAX_BATCH_SIZE`].
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || size > MAX_BATCH_SIZE {
            return Err(Error::invalid_value(
                "batch_size",
                format!("must be between 1 and {MAX_BATCH_SIZE}, got {size}"),
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Split `items` into chunks of this planner's size
    pub fn plan<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        chunk(items, self.size)
    }
}
