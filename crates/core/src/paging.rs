//! Pagination primitives shared by services and the HTTP layer.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Pagination requested by a caller.
///
/// `Unpaged` asks the service for its full/default result set. A page window
/// only exists when both the page number and the page size are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageRequest {
    #[default]
    Unpaged,
    Paged {
        /// 1-based page index.
        page: NonZeroU32,
        size: NonZeroU32,
    },
}

impl PageRequest {
    pub fn paged(page: NonZeroU32, size: NonZeroU32) -> Self {
        Self::Paged { page, size }
    }

    /// Build a request from raw, possibly absent, query values.
    ///
    /// Anything that is not a positive `u32` for both values yields `Unpaged`.
    pub fn from_raw(page: Option<i64>, size: Option<i64>) -> Self {
        let positive = |v: Option<i64>| {
            v.and_then(|v| u32::try_from(v).ok())
                .and_then(NonZeroU32::new)
        };
        match (positive(page), positive(size)) {
            (Some(page), Some(size)) => Self::Paged { page, size },
            _ => Self::Unpaged,
        }
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, Self::Paged { .. })
    }

    /// Zero-based `(offset, limit)` window, `None` when unpaged.
    pub fn window(&self) -> Option<(usize, usize)> {
        match self {
            Self::Unpaged => None,
            Self::Paged { page, size } => {
                let size = size.get() as usize;
                let offset = (page.get() as usize - 1).saturating_mul(size);
                Some((offset, size))
            }
        }
    }
}

/// One page of results plus the full matching count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    /// Matching records independent of the page window.
    pub total: u64,
}

impl<T> PagedResult<T> {
    pub fn new(data: Vec<T>, total: u64) -> Self {
        debug_assert!(data.len() as u64 <= total, "page larger than total");
        Self { data, total }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }

    /// Slice an already filtered, ordered collection according to `request`.
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let data = match request.window() {
            None => items,
            Some((offset, limit)) => items.into_iter().skip(offset).take(limit).collect(),
        };
        Self { data, total }
    }
}
