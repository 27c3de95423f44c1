//! The scattering matrix: an integer relation with a fixed column convention.
//!
//! Each statement carries one scattering matrix encoding an affine map from
//! its surrounding loop iterators, the SCoP parameters, and the constant 1
//! to a sequence of *output dimensions*. Columns, left to right:
//!
//! ```text
//! | e/i | output dims... | input (iterator) dims... | params... | const |
//! ```
//!
//! The e/i marker (equality vs. inequality) is modeled as [`RowKind`] rather
//! than a cell. Output dimensions alternate in meaning by parity:
//! - even dims (0, 2, 4, ...) are *scattering dimensions*, each fixed by one
//!   equality row to a constant encoding the statement's position at that
//!   nesting level;
//! - odd dims (1, 3, 5, ...) are *iterator dimensions*, each equal to one
//!   enclosing loop iterator.
//!
//! Cells are arbitrary-precision integers; the engine reads and writes them
//! but performs no arithmetic beyond addition and scaling.

use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

/// Whether a row constrains its affine expression to zero or to non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// The row's expression equals zero.
    Equality,
    /// The row's expression is greater than or equal to zero.
    Inequality,
}

/// One row of a scattering matrix: a row kind plus the coefficient cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterRow {
    /// Equality or inequality.
    pub kind: RowKind,
    cells: Vec<BigInt>,
}

impl ScatterRow {
    /// Create a zero-filled row of the given width.
    pub fn zeros(kind: RowKind, width: usize) -> Self {
        Self {
            kind,
            cells: vec![BigInt::zero(); width],
        }
    }

    /// Number of cells (output dims + input dims + params + constant).
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    fn cell(&self, col: usize) -> &BigInt {
        &self.cells[col]
    }

    fn cell_mut(&mut self, col: usize) -> &mut BigInt {
        &mut self.cells[col]
    }
}

/// An integer matrix encoding one statement's scattering relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatteringMatrix {
    n_output: usize,
    n_input: usize,
    n_param: usize,
    rows: Vec<ScatterRow>,
}

impl ScatteringMatrix {
    /// Create an empty matrix with the given dimension counts and no rows.
    pub fn new(n_output: usize, n_input: usize, n_param: usize) -> Self {
        Self {
            n_output,
            n_input,
            n_param,
            rows: Vec::new(),
        }
    }

    /// Build the canonical scattering a front-end produces for a statement at
    /// tree position `id` with `n_param` parameters.
    ///
    /// A statement addressed by `id` sits under `id.len() - 1` loops, so the
    /// matrix has `2 * id.len() - 1` output dimensions and one input column
    /// per surrounding iterator. Every even output dimension is fixed by a
    /// `-1` equality to the corresponding `id` component; every odd output
    /// dimension is tied by a `-1`/`+1` equality to one input iterator.
    ///
    /// # Panics
    ///
    /// Panics if `id` is empty; a statement always has at least a top-level
    /// sequence position.
    pub fn from_position(id: &[i64], n_param: usize) -> Self {
        assert!(!id.is_empty(), "a statement position has at least one level");
        let n_input = id.len() - 1;
        let n_output = 2 * id.len() - 1;
        let mut m = Self::new(n_output, n_input, n_param);
        let const_col = m.const_col();
        for (level, &value) in id.iter().enumerate() {
            let mut row = ScatterRow::zeros(RowKind::Equality, m.width());
            row.cells[2 * level] = BigInt::from(-1);
            row.cells[const_col] = BigInt::from(value);
            m.rows.push(row);
            if level < n_input {
                let mut row = ScatterRow::zeros(RowKind::Equality, m.width());
                row.cells[2 * level + 1] = BigInt::from(-1);
                row.cells[n_output + level] = BigInt::from(1);
                m.rows.push(row);
            }
        }
        m
    }

    /// Number of output dimensions.
    pub fn n_output_dims(&self) -> usize {
        self.n_output
    }

    /// Number of input (iterator) dimensions.
    pub fn n_input_dims(&self) -> usize {
        self.n_input
    }

    /// Number of parameter dimensions.
    pub fn n_params(&self) -> usize {
        self.n_param
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of every row: output dims + input dims + params + constant.
    pub fn width(&self) -> usize {
        self.n_output + self.n_input + self.n_param + 1
    }

    fn const_col(&self) -> usize {
        self.n_output + self.n_input + self.n_param
    }

    /// The kind of a row.
    pub fn row_kind(&self, row: usize) -> RowKind {
        self.rows[row].kind
    }

    /// Borrow a full row.
    pub fn row(&self, row: usize) -> &ScatterRow {
        &self.rows[row]
    }

    /// Append a row. The row width must match the matrix width.
    pub fn push_row(&mut self, row: ScatterRow) {
        debug_assert_eq!(row.width(), self.width());
        self.rows.push(row);
    }

    /// Coefficient of output dimension `dim` in `row`.
    pub fn out_coeff(&self, row: usize, dim: usize) -> &BigInt {
        self.rows[row].cell(dim)
    }

    /// Set the coefficient of output dimension `dim` in `row`.
    pub fn set_out_coeff(&mut self, row: usize, dim: usize, value: impl Into<BigInt>) {
        *self.rows[row].cell_mut(dim) = value.into();
    }

    /// Coefficient of input (iterator) dimension `dim` in `row`.
    pub fn in_coeff(&self, row: usize, dim: usize) -> &BigInt {
        self.rows[row].cell(self.n_output + dim)
    }

    /// Set the coefficient of input (iterator) dimension `dim` in `row`.
    pub fn set_in_coeff(&mut self, row: usize, dim: usize, value: impl Into<BigInt>) {
        let col = self.n_output + dim;
        *self.rows[row].cell_mut(col) = value.into();
    }

    /// The constant cell of `row`.
    pub fn constant(&self, row: usize) -> &BigInt {
        self.rows[row].cell(self.const_col())
    }

    /// Set the constant cell of `row`.
    pub fn set_constant(&mut self, row: usize, value: impl Into<BigInt>) {
        let col = self.const_col();
        *self.rows[row].cell_mut(col) = value.into();
    }

    /// Add `delta` to the constant cell of `row`.
    pub fn add_to_constant(&mut self, row: usize, delta: impl Into<BigInt>) {
        let col = self.const_col();
        *self.rows[row].cell_mut(col) += delta.into();
    }

    /// Find the row whose coefficient at output dimension `dim` is nonzero.
    ///
    /// Rows may appear in any order, so this scans top to bottom and returns
    /// the first hit. A well-formed scattering matrix has exactly one nonzero
    /// row per even output dimension; `None` means the matrix is malformed
    /// for the dimensions this engine manipulates.
    pub fn find_output_row(&self, dim: usize) -> Option<usize> {
        if dim >= self.n_output {
            return None;
        }
        self.rows.iter().position(|row| !row.cell(dim).is_zero())
    }

    /// Swap two output-dimension columns across every row.
    ///
    /// Every row is touched, not just the defining equality, so that every
    /// constraint referencing the two dimensions is carried along.
    pub fn swap_output_columns(&mut self, dim1: usize, dim2: usize) {
        for row in &mut self.rows {
            row.cells.swap(dim1, dim2);
        }
    }

    /// Insert `count` zero-filled output columns so that the first lands at
    /// output index `at`, shifting subsequent output dimensions right.
    pub fn insert_output_columns(&mut self, at: usize, count: usize) {
        debug_assert!(at <= self.n_output);
        for row in &mut self.rows {
            for _ in 0..count {
                row.cells.insert(at, BigInt::zero());
            }
        }
        self.n_output += count;
    }

    /// Insert rows so that the first lands at row index `at`.
    pub fn insert_rows(&mut self, at: usize, rows: Vec<ScatterRow>) {
        debug_assert!(at <= self.rows.len());
        for (offset, row) in rows.into_iter().enumerate() {
            debug_assert_eq!(row.width(), self.width());
            self.rows.insert(at + offset, row);
        }
    }
}

impl fmt::Display for ScatteringMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# scattering: {} out, {} in, {} param",
            self.n_output, self.n_input, self.n_param
        )?;
        for row in &self.rows {
            let marker = match row.kind {
                RowKind::Equality => 0,
                RowKind::Inequality => 1,
            };
            write!(f, "{marker:>4}")?;
            for cell in &row.cells {
                write!(f, " {cell:>4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
