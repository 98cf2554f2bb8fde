// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::num::NonZero;

/// Growth unit used when no other is configured, in bytes.
pub const DEFAULT_GROWTH_UNIT: NonZero<usize> = NonZero::new(1024).expect("1024 is non-zero");

/// Construction-time settings of a [`ByteBuf`][crate::ByteBuf].
///
/// Each buffer keeps its own copy of these settings. Creating a buffer with a different
/// growth unit never affects any other buffer.
///
/// # Example
///
/// ```
/// use std::num::NonZero;
///
/// use cursorbuf::{BufOptions, ByteBuf};
///
/// let options = BufOptions::new().with_growth_unit(NonZero::new(64).unwrap());
/// let buf = ByteBuf::with_options(options);
///
/// assert_eq!(buf.capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BufOptions {
    growth_unit: NonZero<usize>,
}

impl BufOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the granularity in which the buffer allocates capacity.
    ///
    /// Capacity is always a multiple of this value: initial allocation and every growth
    /// step round up to the next multiple.
    #[must_use]
    pub fn with_growth_unit(mut self, growth_unit: NonZero<usize>) -> Self {
        self.growth_unit = growth_unit;
        self
    }

    /// The granularity in which the buffer allocates capacity.
    #[must_use]
    pub fn growth_unit(&self) -> NonZero<usize> {
        self.growth_unit
    }

    /// Rounds `size` up to the nearest multiple of the growth unit that is not zero.
    pub(crate) fn round_up(&self, size: usize) -> usize {
        let unit = self.growth_unit.get();
        size.div_ceil(unit).max(1).saturating_mul(unit)
    }
}

impl Default for BufOptions {
    fn default() -> Self {
        Self {
            growth_unit: DEFAULT_GROWTH_UNIT,
        }
    }
}
