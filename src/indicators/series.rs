//! Indicator output aligned 1:1 with the price series it was computed from.

use serde::Serialize;

/// Rolling-window indicator values. Leading entries without enough history
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Builds a series of `len` entries where the first `undefined` are `None`
    /// and the rest are taken from `defined` in order.
    pub(crate) fn with_warmup(undefined: usize, defined: impl IntoIterator<Item = f64>) -> Self {
        let values = std::iter::repeat(None)
            .take(undefined)
            .chain(defined.into_iter().map(Some))
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the most recent position, if defined.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Values at the second-to-last and last positions.
    pub fn last_two(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self.values.as_slice() {
            [.., prev, curr] => Some((*prev, *curr)),
            _ => None,
        }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }
}
