use ndarray::{ArrayViewMut1, s};

use super::ParamGen;
use crate::{interactions::Interactions, storage::FactorStore};

/// Returns how many values a `ParamGen` must provide to initialize the factors of `index`.
///
/// # Arguments
/// * `index` - The interactions the factors will be trained on.
/// * `factors` - The amount of latent factors, K.
pub fn trainable_params(index: &Interactions, factors: usize) -> usize {
    let users = (0..index.n_users())
        .filter(|&user| index.is_active_user(user))
        .count();
    let items = (0..index.n_items())
        .filter(|&item| index.is_active_item(item))
        .count();

    users * factors + items * (factors + 1)
}

/// Builds the factor matrices for the first training call over `index`.
///
/// Users and items without interactions keep all-zero latent rows, every user row
/// gets the constant `1.0` in its bias slot and active item biases are sampled like
/// the rest of their row.
///
/// # Arguments
/// * `index` - The interactions the factors will be trained on.
/// * `factors` - The amount of latent factors, K.
/// * `param_gen` - Where the initial values are sampled from.
///
/// # Returns
/// A new `FactorStore`.
pub fn init_factors<G: ParamGen>(
    index: &Interactions,
    factors: usize,
    param_gen: &mut G,
) -> FactorStore {
    let mut store = FactorStore::zeros(index.n_users(), index.n_items(), factors);

    for user in 0..index.n_users() {
        let mut row = store.user_row_mut(user);

        if index.is_active_user(user) {
            fill(row.slice_mut(s![..factors]), param_gen);
        }

        row[factors] = 1.;
    }

    for item in 0..index.n_items() {
        if index.is_active_item(item) {
            fill(store.item_row_mut(item), param_gen);
        }
    }

    store
}

fn fill<G: ParamGen>(mut row: ArrayViewMut1<'_, f32>, param_gen: &mut G) {
    if let Some(sample) = param_gen.sample(row.len()) {
        row.iter_mut().zip(sample).for_each(|(x, s)| *x = s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::InteractionMatrix;

    struct Counter(f32);

    impl ParamGen for Counter {
        fn sample(&mut self, n: usize) -> Option<Vec<f32>> {
            let sample = (0..n).map(|i| self.0 + i as f32).collect();
            self.0 += n as f32;
            Some(sample)
        }
    }

    fn index() -> Interactions {
        // 3 items x 3 users, user 1 and item 2 without interactions
        let matrix =
            InteractionMatrix::from_triplets((3, 3), vec![0, 1, 1], vec![0, 0, 2], vec![1u8; 3])
                .unwrap();
        Interactions::from_matrix(&matrix).unwrap()
    }

    #[test]
    fn cold_rows_stay_zero() {
        let index = index();
        let store = init_factors(&index, 2, &mut Counter(1.));

        let user = store.user_factors();
        assert_eq!(user.row(0).to_vec(), [1., 2., 1.]);
        assert_eq!(user.row(1).to_vec(), [0., 0., 1.]);
        assert_eq!(user.row(2).to_vec(), [3., 4., 1.]);

        let item = store.item_factors();
        assert_eq!(item.row(0).to_vec(), [5., 6., 7.]);
        assert_eq!(item.row(1).to_vec(), [8., 9., 10.]);
        assert_eq!(item.row(2).to_vec(), [0., 0., 0.]);
    }

    #[test]
    fn limit_matches_consumed_values() {
        let index = index();
        assert_eq!(trainable_params(&index, 2), 2 * 2 + 2 * 3);

        let mut counter = Counter(0.);
        init_factors(&index, 2, &mut counter);
        assert_eq!(counter.0, 10.);
    }
}
