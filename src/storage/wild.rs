use std::marker::PhantomData;

use super::FactorStore;

/// A view over a `FactorStore` that lets multiple threads update its rows without using locks.
///
/// It embraces race conditions, two workers may read-modify-write the same row simultaneously
/// and some of their partial updates may be lost. Training tolerates it.
pub struct WildFactors<'a> {
    user: *mut f32,
    item: *mut f32,
    n_users: usize,
    n_items: usize,
    cols: usize,
    _store: PhantomData<&'a mut FactorStore>,
}

// SAFETY: The view mutably borrows the store for its whole life, so nothing outside the
//         workers can observe or free the buffers while they're being updated.
unsafe impl Send for WildFactors<'_> {}
unsafe impl Sync for WildFactors<'_> {}

impl<'a> WildFactors<'a> {
    /// Creates a new `WildFactors` view.
    ///
    /// # Arguments
    /// * `store` - The factor matrices to share between the workers.
    pub fn new(store: &'a mut FactorStore) -> Self {
        let (n_users, n_items, cols) = (store.n_users(), store.n_items(), store.cols());
        let (user, item) = store.as_slices_mut();

        Self {
            user: user.as_mut_ptr(),
            item: item.as_mut_ptr(),
            n_users,
            n_items,
            cols,
            _store: PhantomData,
        }
    }

    /// Returns the row length, `K + 1`.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns a pointer to the first entry of a user row.
    ///
    /// # Panics
    /// If `user` is out of bounds.
    #[inline]
    pub fn user_row(&self, user: usize) -> *mut f32 {
        assert!(user < self.n_users, "user {user} out of bounds");

        // SAFETY: The row starts inside the buffer, we checked the bounds just above.
        unsafe { self.user.add(user * self.cols) }
    }

    /// Returns a pointer to the first entry of an item row.
    ///
    /// # Panics
    /// If `item` is out of bounds.
    #[inline]
    pub fn item_row(&self, item: usize) -> *mut f32 {
        assert!(item < self.n_items, "item {item} out of bounds");

        // SAFETY: The row starts inside the buffer, we checked the bounds just above.
        unsafe { self.item.add(item * self.cols) }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rows_point_into_the_store() {
        let user = array![[1., 2., 1.], [3., 4., 1.]];
        let item = array![[5., 6., 7.]];
        let mut store = FactorStore::from_arrays(user, item).unwrap();

        {
            let wild = WildFactors::new(&mut store);
            assert_eq!(wild.cols(), 3);

            // SAFETY: Single threaded, both rows are in bounds.
            unsafe {
                *wild.user_row(1) = -3.;
                *wild.item_row(0).add(2) = 0.;
            }
        }

        assert_eq!(store.user_factors()[[1, 0]], -3.);
        assert_eq!(store.item_factors()[[0, 2]], 0.);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_rows_panic() {
        let mut store = FactorStore::zeros(1, 1, 2);
        let wild = WildFactors::new(&mut store);
        wild.item_row(1);
    }
}
