use super::InteractionMatrix;
use crate::error::{BprErr, Result};

/// The read-only interaction index a training call samples from.
///
/// Position `i` maps to the `(user_of[i], item_of[i])` pair of the i-th observed
/// interaction. Pairs may repeat and a user may appear at any number of positions.
#[derive(Debug, Clone)]
pub struct Interactions {
    users: Box<[u32]>,
    items: Box<[u32]>,
    user_counts: Box<[u32]>,
    item_counts: Box<[u32]>,
}

impl Interactions {
    /// Flattens the liked entries of `matrix` into a new interaction index.
    ///
    /// # Arguments
    /// * `matrix` - An implicit feedback matrix, rows are items and columns users.
    ///
    /// # Returns
    /// The index, or an `IdOverflow` if the ids don't fit in 32 bits.
    pub fn from_matrix<T>(matrix: &InteractionMatrix<T>) -> Result<Self>
    where
        T: Copy + PartialEq + Default,
    {
        let (n_items, n_users) = matrix.shape();
        check_ids("items", n_items)?;
        check_ids("users", n_users)?;

        let mut users = Vec::with_capacity(matrix.nnz());
        let mut items = Vec::with_capacity(matrix.nnz());
        let mut user_counts = vec![0u32; n_users];
        let mut item_counts = vec![0u32; n_items];

        for (item, user) in matrix.liked() {
            users.push(user as u32);
            items.push(item as u32);
            user_counts[user] = user_counts[user].saturating_add(1);
            item_counts[item] = item_counts[item].saturating_add(1);
        }

        Ok(Self {
            users: users.into_boxed_slice(),
            items: items.into_boxed_slice(),
            user_counts: user_counts.into_boxed_slice(),
            item_counts: item_counts.into_boxed_slice(),
        })
    }

    /// Returns the amount of observed interactions, `N`.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn n_users(&self) -> usize {
        self.user_counts.len()
    }

    pub fn n_items(&self) -> usize {
        self.item_counts.len()
    }

    /// Returns the user at sample position `pos`.
    #[inline]
    pub fn user(&self, pos: usize) -> usize {
        self.users[pos] as usize
    }

    /// Returns the item at sample position `pos`.
    #[inline]
    pub fn item(&self, pos: usize) -> usize {
        self.items[pos] as usize
    }

    /// The `user_of` sequence.
    pub fn users(&self) -> &[u32] {
        &self.users
    }

    /// The `item_of` sequence.
    pub fn items(&self) -> &[u32] {
        &self.items
    }

    /// Whether `user` has at least one observed interaction.
    pub fn is_active_user(&self, user: usize) -> bool {
        self.user_counts[user] > 0
    }

    /// Whether `item` has at least one observed interaction.
    pub fn is_active_item(&self, item: usize) -> bool {
        self.item_counts[item] > 0
    }
}

fn check_ids(what: &'static str, len: usize) -> Result<()> {
    match u32::try_from(len) {
        Ok(_) => Ok(()),
        Err(_) => Err(BprErr::IdOverflow { what, len }),
    }
}
