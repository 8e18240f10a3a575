//! Translates a variable's raw, linear per-record element buffer into a shaped
//! multi-dimensional value, honouring dimension variance and row-/column-major layout.

use crate::types::{CdfType, DataType};

/// The effective element container a [`Shaper`] will produce: a bare scalar when the logical
/// shape has exactly one element, otherwise a flat array in row-major order. Consumers (the
/// table-conversion layer) use this to decide column typing without re-deriving it from the
/// dimension sizes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    /// Exactly one logical element.
    Scalar(DataType),
    /// More than one logical element, laid out row-major.
    Array(DataType),
}

/// The result of shaping one record's raw elements.
#[derive(Debug, Clone)]
pub enum ShapedValue {
    /// A single value (the variable's logical shape collapses to one element).
    Scalar(CdfType),
    /// A row-major flat array of values.
    Array(Vec<CdfType>),
}

/// Maps a variable's raw per-record element buffer onto its logical, shaped form.
///
/// `dim_sizes`/`dim_varys` are the declared dimension extents and variance flags (for
/// z-variables, the VDR's own; for r-variables, the GDR-wide `rDimSizes` paired with the
/// VDR's `dimVarys`). A `false` entry in `dim_varys` collapses that axis: it contributes a
/// factor of 1 to the *raw* per-record item count (the axis isn't replicated per record) and
/// is dropped entirely from the *logical* shape.
#[derive(Debug, Clone)]
pub struct Shaper {
    data_type: DataType,
    dim_sizes: Vec<i32>,
    dim_varys: Vec<bool>,
    row_major: bool,
}

impl Shaper {
    /// Builds a shaper for one variable.
    pub fn new(data_type: DataType, dim_sizes: Vec<i32>, dim_varys: Vec<bool>, row_major: bool) -> Self {
        Shaper {
            data_type,
            dim_sizes,
            dim_varys,
            row_major,
        }
    }

    /// The declared dimension extents, unfiltered by variance.
    pub fn dim_sizes(&self) -> &[i32] {
        &self.dim_sizes
    }

    /// Number of raw elements stored per record: the product of extents of *varying*
    /// dimensions only. A variable with every dimension non-varying (or no dimensions at all)
    /// reports 1 - exactly one element is stored per record.
    pub fn raw_item_count(&self) -> usize {
        self.varying_extents().into_iter().product::<usize>().max(1)
    }

    /// The dimension extents that survive into the logical (shaped) view, in declared order.
    pub fn logical_dim_sizes(&self) -> Vec<i32> {
        self.dim_sizes
            .iter()
            .zip(&self.dim_varys)
            .filter(|(_, varys)| **varys)
            .map(|(size, _)| *size)
            .collect()
    }

    fn varying_extents(&self) -> Vec<usize> {
        self.logical_dim_sizes()
            .into_iter()
            .map(|s| s.max(0) as usize)
            .collect()
    }

    /// Number of logical elements a shaped record carries: identical to [`Self::raw_item_count`]
    /// since non-varying axes never contribute to either - kept as a distinct method because
    /// the two have different conceptual roles (raw storage footprint vs. logical shape).
    pub fn logical_item_count(&self) -> usize {
        self.raw_item_count()
    }

    /// The effective element container this shaper produces.
    pub fn shape_class(&self) -> ShapeClass {
        if self.logical_item_count() == 1 {
            ShapeClass::Scalar(self.data_type)
        } else {
            ShapeClass::Array(self.data_type)
        }
    }

    /// Shapes one record's raw, linearly-stored elements.
    ///
    /// `raw` must hold exactly [`Self::raw_item_count`] elements, in the on-disk major order
    /// (row-major if `row_major`, column-major otherwise). When `preserve_fixed_array` is
    /// true, the result is always [`ShapedValue::Array`] even for a single-element shape -
    /// this mirrors callers (e.g. a column built from fixed-size string variables) that need a
    /// stable container type across every variable they read, not just ones with more than one
    /// element.
    pub fn shape(&self, raw: &[CdfType], preserve_fixed_array: bool) -> ShapedValue {
        let ordered: Vec<CdfType> = if self.row_major || raw.len() <= 1 {
            raw.to_vec()
        } else {
            transpose_col_to_row(raw, &self.logical_dim_sizes())
        };

        if !preserve_fixed_array && ordered.len() == 1 {
            ShapedValue::Scalar(ordered.into_iter().next().expect("len == 1"))
        } else {
            ShapedValue::Array(ordered)
        }
    }
}

/// Reorders a column-major-stored buffer into row-major order for the given logical
/// dimension extents. Column-major means the *first* declared dimension varies fastest; the
/// CDF convention for row-major listing of dimensions (the usual C/array convention) has the
/// *last* dimension vary fastest, so this walks output positions in that order and looks up
/// the corresponding column-major source index.
fn transpose_col_to_row(raw: &[CdfType], dims: &[i32]) -> Vec<CdfType> {
    let dims: Vec<usize> = dims.iter().map(|d| d.max(0) as usize).collect();
    let n = dims.len();
    if n == 0 {
        return raw.to_vec();
    }
    let total: usize = dims.iter().product::<usize>().max(1);

    let mut col_strides = vec![1usize; n];
    for i in 1..n {
        col_strides[i] = col_strides[i - 1] * dims[i - 1];
    }

    let mut idx = vec![0usize; n];
    let mut out = Vec::with_capacity(total);
    for _ in 0..total {
        let src: usize = idx.iter().zip(&col_strides).map(|(i, s)| i * s).sum();
        out.push(raw[src].clone());
        for d in (0..n).rev() {
            idx[d] += 1;
            if idx[d] < dims[d] {
                break;
            }
            idx[d] = 0;
        }
    }
    out
}
