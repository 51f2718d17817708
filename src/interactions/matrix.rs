use std::iter;

use crate::error::{BprErr, Result};

/// A sparse implicit feedback matrix in coordinate form.
///
/// Rows are items and columns are users, an entry different from the value type's
/// zero means the user liked the item. The magnitude of the entries is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix<T> {
    shape: (usize, usize),
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy + PartialEq + Default> InteractionMatrix<T> {
    /// Creates a new `InteractionMatrix` from coordinate triplets.
    ///
    /// # Arguments
    /// * `shape` - The `(items, users)` dimensions of the matrix.
    /// * `rows` - The item of every entry.
    /// * `cols` - The user of every entry.
    /// * `values` - The value of every entry.
    ///
    /// # Returns
    /// A new matrix or an input error if the triplets are ragged or out of bounds.
    pub fn from_triplets(
        shape: (usize, usize),
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        check_len("cols", cols.len(), rows.len())?;
        check_len("values", values.len(), rows.len())?;

        let (items, users) = shape;
        check_bounds("item", &rows, items)?;
        check_bounds("user", &cols, users)?;

        Ok(Self {
            shape,
            rows,
            cols,
            values,
        })
    }

    /// Creates a new `InteractionMatrix` from a compressed sparse row layout.
    ///
    /// # Arguments
    /// * `shape` - The `(items, users)` dimensions of the matrix.
    /// * `indptr` - The offsets of each item's entries, `items + 1` long.
    /// * `indices` - The user of every entry.
    /// * `values` - The value of every entry.
    ///
    /// # Returns
    /// A new matrix or an input error if the layout is malformed.
    pub fn from_csr(
        shape: (usize, usize),
        indptr: &[usize],
        indices: &[usize],
        values: &[T],
    ) -> Result<Self> {
        let (items, _) = shape;
        check_len("indptr", indptr.len(), items + 1)?;
        check_len("values", values.len(), indices.len())?;

        let nnz = indices.len();
        let mut rows = Vec::with_capacity(nnz);

        for (item, bounds) in indptr.windows(2).enumerate() {
            let (start, end) = (bounds[0], bounds[1]);

            if end < start || end > nnz {
                return Err(BprErr::InvalidIndex {
                    what: "indptr",
                    index: end,
                    bound: nnz,
                });
            }

            rows.extend(iter::repeat_n(item, end - start));
        }

        check_len("indptr tail", rows.len(), nnz)?;
        Self::from_triplets(shape, rows, indices.to_vec(), values.to_vec())
    }

    /// Returns the `(items, users)` dimensions.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn n_items(&self) -> usize {
        self.shape.0
    }

    pub fn n_users(&self) -> usize {
        self.shape.1
    }

    /// Returns the amount of stored entries, explicit zeros included.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterates the `(item, user)` pairs of every liked entry, in storage order.
    pub fn liked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let zero = T::default();

        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .filter(move |(_, value)| **value != zero)
            .map(|((&item, &user), _)| (item, user))
    }
}

fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(BprErr::LengthMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

fn check_bounds(what: &'static str, ids: &[usize], bound: usize) -> Result<()> {
    match ids.iter().find(|&&id| id >= bound) {
        Some(&index) => Err(BprErr::InvalidIndex { what, index, bound }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_zeros_are_not_liked() {
        let matrix =
            InteractionMatrix::from_triplets((2, 2), vec![0, 1, 1], vec![0, 0, 1], vec![3, 0, 1])
                .unwrap();

        assert_eq!(matrix.nnz(), 3);
        let liked: Vec<_> = matrix.liked().collect();
        assert_eq!(liked, [(0, 0), (1, 1)]);
    }

    #[test]
    fn magnitude_is_ignored() {
        let matrix =
            InteractionMatrix::from_triplets((1, 2), vec![0, 0], vec![0, 1], vec![0.25f64, -7.])
                .unwrap();
        assert_eq!(matrix.liked().count(), 2);
    }

    #[test]
    fn ragged_triplets() {
        let err = InteractionMatrix::from_triplets((2, 2), vec![0, 1], vec![0], vec![1, 1]);
        assert!(matches!(
            err,
            Err(BprErr::LengthMismatch {
                what: "cols",
                got: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn out_of_bounds_users() {
        let err = InteractionMatrix::from_triplets((2, 2), vec![0], vec![2], vec![1u8]);
        assert!(matches!(
            err,
            Err(BprErr::InvalidIndex {
                what: "user",
                index: 2,
                bound: 2
            })
        ));
    }

    #[test]
    fn csr_matches_triplets() {
        // item 0: users 1, 2 / item 1: nothing / item 2: user 0
        let indptr = [0, 2, 2, 3];
        let indices = [1, 2, 0];
        let values = [1i32, 1, 1];

        let csr = InteractionMatrix::from_csr((3, 3), &indptr, &indices, &values).unwrap();
        let coo =
            InteractionMatrix::from_triplets((3, 3), vec![0, 0, 2], vec![1, 2, 0], vec![1, 1, 1])
                .unwrap();

        assert_eq!(csr, coo);
    }

    #[test]
    fn csr_with_bad_indptr() {
        let err = InteractionMatrix::from_csr((2, 2), &[0, 2, 1], &[0, 1], &[1, 1]);
        assert!(matches!(err, Err(BprErr::InvalidIndex { what: "indptr", .. })));

        let err = InteractionMatrix::from_csr((2, 2), &[0, 1], &[0], &[1]);
        assert!(matches!(err, Err(BprErr::LengthMismatch { what: "indptr", .. })));

        let err = InteractionMatrix::from_csr((2, 2), &[0, 1, 1], &[0, 1], &[1, 1]);
        assert!(matches!(
            err,
            Err(BprErr::LengthMismatch {
                what: "indptr tail",
                ..
            })
        ));
    }
}
