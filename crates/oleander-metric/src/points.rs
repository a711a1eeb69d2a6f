//! Validated column-major point matrix.

use crate::error::MetricError;

/// Owned d×n data matrix, one point per column, stored column-major.
/// Guaranteed non-empty with all finite values.
///
/// The matrix is immutable after construction; clustering engines borrow it
/// for the duration of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    dim: usize,
    values: Vec<f64>,
}

impl PointSet {
    /// Create a point set from a flat column-major buffer.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::EmptyMatrix`] | `dim == 0` or `values` is empty |
    /// | [`MetricError::RaggedMatrix`] | `values.len()` is not a multiple of `dim` |
    /// | [`MetricError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(dim: usize, values: Vec<f64>) -> Result<Self, MetricError> {
        if dim == 0 || values.is_empty() {
            return Err(MetricError::EmptyMatrix);
        }
        if values.len() % dim != 0 {
            return Err(MetricError::RaggedMatrix {
                len: values.len(),
                dim,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(MetricError::NonFiniteValue {
                point: index / dim,
                coordinate: index % dim,
            });
        }
        Ok(Self { dim, values })
    }

    /// Create a point set from per-point coordinate vectors.
    ///
    /// All columns must share the length of the first column.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::EmptyMatrix`] | `columns` is empty or the first column is empty |
    /// | [`MetricError::RaggedMatrix`] | A column differs in length from the first |
    /// | [`MetricError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self, MetricError> {
        let dim = columns.first().map_or(0, Vec::len);
        if dim == 0 {
            return Err(MetricError::EmptyMatrix);
        }
        let mut values = Vec::with_capacity(dim * columns.len());
        for col in columns {
            if col.len() != dim {
                return Err(MetricError::RaggedMatrix {
                    len: col.len(),
                    dim,
                });
            }
            values.extend_from_slice(col);
        }
        Self::new(dim, values)
    }

    /// Return the coordinates of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_points()`.
    #[must_use]
    pub fn col(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Return the number of points (columns).
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return the dimensionality of each point.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }
}
