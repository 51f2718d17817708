use ndarray::{Array2, ArrayView2, ArrayViewMut1};

use crate::error::{BprErr, Result};

/// The two dense factor matrices of the model.
///
/// * `user` - `users x (K + 1)`, K latent dimensions followed by a constant `1.0`.
/// * `item` - `items x (K + 1)`, K latent dimensions followed by the item bias.
///
/// Both matrices are always kept in standard (row-major, contiguous) layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorStore {
    user: Array2<f32>,
    item: Array2<f32>,
}

impl FactorStore {
    /// Creates a new all-zero `FactorStore`.
    ///
    /// # Arguments
    /// * `n_users` - The amount of user rows.
    /// * `n_items` - The amount of item rows.
    /// * `factors` - The amount of latent factors, K.
    pub fn zeros(n_users: usize, n_items: usize, factors: usize) -> Self {
        Self {
            user: Array2::zeros((n_users, factors + 1)),
            item: Array2::zeros((n_items, factors + 1)),
        }
    }

    /// Creates a new `FactorStore` from caller supplied matrices.
    ///
    /// Matrices in a non standard memory layout are copied into a row-major one.
    ///
    /// # Arguments
    /// * `user` - The user factors, `users x (K + 1)`.
    /// * `item` - The item factors, `items x (K + 1)`.
    ///
    /// # Returns
    /// The store or a `ShapeMismatch` if the column counts disagree or there's no latent column.
    pub fn from_arrays(user: Array2<f32>, item: Array2<f32>) -> Result<Self> {
        let cols = item.ncols();

        if cols < 2 {
            return Err(BprErr::ShapeMismatch {
                what: "item factors",
                got: item.dim(),
                expected: (item.nrows(), 2),
            });
        }

        if user.ncols() != cols {
            return Err(BprErr::ShapeMismatch {
                what: "user factors",
                got: user.dim(),
                expected: (user.nrows(), cols),
            });
        }

        Ok(Self {
            user: standard_layout(user),
            item: standard_layout(item),
        })
    }

    /// Returns the amount of latent factors, K.
    pub fn factors(&self) -> usize {
        self.item.ncols() - 1
    }

    /// Returns the row length, `K + 1`.
    pub fn cols(&self) -> usize {
        self.item.ncols()
    }

    pub fn n_users(&self) -> usize {
        self.user.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.item.nrows()
    }

    pub fn user_factors(&self) -> ArrayView2<'_, f32> {
        self.user.view()
    }

    pub fn item_factors(&self) -> ArrayView2<'_, f32> {
        self.item.view()
    }

    /// Consumes the store, returning the `(user, item)` matrices.
    pub fn into_arrays(self) -> (Array2<f32>, Array2<f32>) {
        (self.user, self.item)
    }

    /// Checks this store can be trained on an interaction index of the given shape.
    ///
    /// # Arguments
    /// * `n_users` - The amount of users of the interactions.
    /// * `n_items` - The amount of items of the interactions.
    /// * `factors` - The configured amount of latent factors.
    ///
    /// # Returns
    /// A `ShapeMismatch` naming the offending matrix.
    pub fn verify(&self, n_users: usize, n_items: usize, factors: usize) -> Result<()> {
        let expected = (n_users, factors + 1);
        if self.user.dim() != expected {
            return Err(BprErr::ShapeMismatch {
                what: "user factors",
                got: self.user.dim(),
                expected,
            });
        }

        let expected = (n_items, factors + 1);
        if self.item.dim() != expected {
            return Err(BprErr::ShapeMismatch {
                what: "item factors",
                got: self.item.dim(),
                expected,
            });
        }

        Ok(())
    }

    /// The model's affinity of `user` towards `item`, bias included.
    pub fn score(&self, user: usize, item: usize) -> f32 {
        self.user.row(user).dot(&self.item.row(item))
    }

    pub(crate) fn user_row_mut(&mut self, user: usize) -> ArrayViewMut1<'_, f32> {
        self.user.row_mut(user)
    }

    pub(crate) fn item_row_mut(&mut self, item: usize) -> ArrayViewMut1<'_, f32> {
        self.item.row_mut(item)
    }

    /// Returns the row-major `(user, item)` buffers.
    pub fn as_slices(&self) -> (&[f32], &[f32]) {
        // every constructor keeps both matrices in standard layout
        let user = self.user.as_slice().expect("user factors in standard layout");
        let item = self.item.as_slice().expect("item factors in standard layout");
        (user, item)
    }

    /// Returns the mutable row-major `(user, item)` buffers.
    pub fn as_slices_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        // every constructor keeps both matrices in standard layout
        let user = self.user.as_slice_mut().expect("user factors in standard layout");
        let item = self.item.as_slice_mut().expect("item factors in standard layout");
        (user, item)
    }
}

fn standard_layout(array: Array2<f32>) -> Array2<f32> {
    if array.is_standard_layout() {
        return array;
    }

    array.as_standard_layout().into_owned()
}
