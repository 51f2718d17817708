use crate::{interactions::Interactions, sampling::Sampler, storage::WildFactors};

/// The logistic coefficient of the pairwise ranking gradient, `1 / (1 + e^score)`.
#[inline(always)]
pub fn ranking_coefficient(score: f32) -> f32 {
    1. / (1. + score.exp())
}

/// Applies one BPR update to a `(user, liked, disliked)` triple of rows.
///
/// The last column holds the user's constant `1.0` and the items' biases. The user
/// constant is never written. `liked` and `disliked` may point to the same row, the
/// updates are then applied one after the other.
///
/// # Arguments
/// * `user` - The user row.
/// * `liked` - The liked item row.
/// * `disliked` - The disliked item row.
/// * `cols` - The row length, `K + 1`.
/// * `lr` - The learning rate.
/// * `reg` - The L2 regularization.
///
/// # Returns
/// Whether the model ranked `liked` above `disliked` before the update.
///
/// # Safety
/// The three pointers must be valid for reads and writes of `cols` values, `user` must
/// not overlap with either item row.
#[inline(always)]
pub unsafe fn update_rows(
    user: *mut f32,
    liked: *mut f32,
    disliked: *mut f32,
    cols: usize,
    lr: f32,
    reg: f32,
) -> bool {
    let bias = cols - 1;

    // SAFETY: The caller guarantees the rows are valid for `cols` values.
    unsafe {
        let mut score = 0.;
        for j in 0..cols {
            score += *user.add(j) * (*liked.add(j) - *disliked.add(j));
        }

        let z = ranking_coefficient(score);

        for j in 0..bias {
            let t = *user.add(j);
            *user.add(j) += lr * (z * (*liked.add(j) - *disliked.add(j)) - reg * t);
            *liked.add(j) += lr * (z * t - reg * *liked.add(j));
            *disliked.add(j) += lr * (-z * t - reg * *disliked.add(j));
        }

        *liked.add(bias) += lr * (z - reg * *liked.add(bias));
        *disliked.add(bias) += lr * (-z - reg * *disliked.add(bias));

        z < 0.5
    }
}

/// Samples a `(user, liked, disliked)` triple and updates its rows in place.
///
/// The liked pair comes from one uniformly drawn position and the disliked item from
/// another, the disliked item isn't checked against the user's interactions.
///
/// # Returns
/// Whether the sample was ranked correctly before the update.
#[inline]
pub fn sgd_step<S: Sampler>(
    index: &Interactions,
    factors: &WildFactors<'_>,
    sampler: &mut S,
    lr: f32,
    reg: f32,
) -> bool {
    let liked_pos = sampler.sample();
    let disliked_pos = sampler.sample();

    let user = factors.user_row(index.user(liked_pos));
    let liked = factors.item_row(index.item(liked_pos));
    let disliked = factors.item_row(index.item(disliked_pos));

    // SAFETY: The rows were bounds checked by `WildFactors` and user rows live in a
    //         different buffer than item rows. Concurrent writers are tolerated.
    unsafe { update_rows(user, liked, disliked, factors.cols(), lr, reg) }
}
