use std::num::NonZeroUsize;

use hogwild_bpr::{Bpr, BprErr, FactorStore, InteractionMatrix, TrainingSpec};

fn spec(factors: usize, iterations: usize, threads: usize) -> TrainingSpec {
    TrainingSpec {
        factors: NonZeroUsize::new(factors).unwrap(),
        iterations: NonZeroUsize::new(iterations).unwrap(),
        num_threads: threads,
        seed: Some(1234),
        ..Default::default()
    }
}

/// Builds a matrix from `(item, user)` pairs.
fn matrix(shape: (usize, usize), pairs: &[(usize, usize)]) -> InteractionMatrix<f32> {
    let (items, users) = pairs.iter().copied().unzip();
    InteractionMatrix::from_triplets(shape, items, users, vec![1.; pairs.len()]).unwrap()
}

/// Two communities of 50 users and 50 items, every user likes 10 items of its own.
fn clustered() -> InteractionMatrix<f32> {
    let pairs: Vec<_> = (0..100)
        .flat_map(|user| {
            let offset = (user / 50) * 50;
            (0..10).map(move |j| (offset + (user * 7 + j * 3) % 50, user))
        })
        .collect();

    matrix((100, 100), &pairs)
}

fn mean_accuracy(model: &mut Bpr, matrix: &InteractionMatrix<f32>, last: usize) -> f32 {
    let reports = model.fit(matrix).unwrap();
    let tail = &reports[reports.len() - last..];
    tail.iter().map(|r| r.accuracy()).sum::<f32>() / last as f32
}

#[test]
fn single_worker_training_is_deterministic() {
    let data = clustered();
    let run = || {
        let mut model = Bpr::new(spec(8, 10, 1));
        let counts: Vec<_> = model.fit(&data).unwrap().iter().map(|r| r.correct).collect();
        (model.into_factors().unwrap(), counts)
    };

    let (a, a_counts) = run();
    let (b, b_counts) = run();
    assert_eq!(a, b);
    assert_eq!(a_counts, b_counts);
}

#[test]
fn cold_rows_stay_zero() {
    // item 3 and user 2 have no interactions
    let data = matrix((4, 3), &[(0, 0), (1, 0), (2, 1), (1, 1)]);
    let mut model = Bpr::new(spec(4, 50, 2));
    model.fit(&data).unwrap();

    let store = model.factors().unwrap();
    assert!(store.item_factors().row(3).iter().all(|&x| x == 0.));
    assert_eq!(store.user_factors().row(2).to_vec(), [0., 0., 0., 0., 1.]);
}

#[test]
fn user_constant_column_stays_one() {
    let mut model = Bpr::new(spec(6, 30, 4));
    model.fit(&clustered()).unwrap();

    let store = model.factors().unwrap();
    assert!(store.user_factors().column(6).iter().all(|&x| x == 1.));
}

#[test]
fn correct_counts_are_bounded() {
    let data = clustered();
    let mut model = Bpr::new(spec(4, 20, 3));
    let reports = model.fit(&data).unwrap();

    assert_eq!(reports.len(), 20);
    assert!(reports.iter().all(|r| r.samples == 1000 && r.correct <= 1000));
}

#[test]
fn learns_a_two_by_two_ranking() {
    // user 0 likes item 0, user 1 likes item 1
    let data = matrix((2, 2), &[(0, 0), (1, 1)]);
    let mut model = Bpr::new(TrainingSpec {
        learning_rate: 0.05,
        regularization: 0.,
        ..spec(1, 2000, 1)
    });
    model.fit(&data).unwrap();

    let store = model.factors().unwrap();
    assert!(store.score(0, 0) > store.score(0, 1));
    assert!(store.score(1, 1) > store.score(1, 0));
}

#[test]
fn regularization_shrinks_latent_factors() {
    // with a single interaction liked and disliked are always the same item, so only
    // the L2 penalty moves the user row
    let data = matrix((1, 1), &[(0, 0)]);
    let (lr, reg, epochs) = (0.1f32, 0.1f32, 100);

    let initial = {
        let mut model = Bpr::new(spec(3, 1, 1));
        model.fit(&data).unwrap();
        model.into_factors().unwrap()
    };

    let train = |reg: f32| {
        let (user, item) = initial.clone().into_arrays();
        let mut model = Bpr::with_factors(
            TrainingSpec {
                learning_rate: lr,
                regularization: reg,
                ..spec(3, epochs, 1)
            },
            user,
            item,
        )
        .unwrap();
        model.fit(&data).unwrap();
        model.into_factors().unwrap()
    };

    let unregularized = train(0.);
    assert_eq!(unregularized.user_factors(), initial.user_factors());

    let shrunk = train(reg);
    let decay = (1. - lr * reg).powi(epochs as i32);
    for k in 0..3 {
        let before = initial.user_factors()[[0, k]];
        let after = shrunk.user_factors()[[0, k]];
        assert!((after - before * decay).abs() < 1e-5, "factor {k}: {after} vs {before}");
    }
}

#[test]
fn regularization_shrinks_learned_factors() {
    let data = clustered();

    let train = |reg| {
        let mut model = Bpr::new(TrainingSpec {
            learning_rate: 0.05,
            regularization: reg,
            ..spec(8, 40, 1)
        });
        model.fit(&data).unwrap();
        model.into_factors().unwrap()
    };

    let norm = |store: &FactorStore| {
        let squares: f32 = store.item_factors().iter().map(|x| x * x).sum();
        squares.sqrt()
    };

    let free = norm(&train(0.));
    let penalized = norm(&train(0.1));
    assert!(penalized < free, "{penalized} vs {free}");
}

#[test]
fn parallel_accuracy_tracks_single_worker() {
    let data = clustered();

    let spec = |threads| TrainingSpec {
        learning_rate: 0.05,
        ..spec(8, 60, threads)
    };

    let mut single = Bpr::new(spec(1));
    let mut parallel = Bpr::new(spec(4));

    let single = mean_accuracy(&mut single, &data, 20);
    let parallel = mean_accuracy(&mut parallel, &data, 20);

    assert!(single > 0.6, "single worker accuracy {single}");
    assert!((single - parallel).abs() < 0.05, "{single} vs {parallel}");
}

#[test]
fn factors_are_reused_across_calls() {
    let data = clustered();
    let mut model = Bpr::new(spec(4, 5, 2));
    model.fit(&data).unwrap();
    let first = model.factors().unwrap().clone();

    model.fit(&data).unwrap();
    let second = model.factors().unwrap();

    assert_ne!(&first, second);
    assert_eq!(second.factors(), 4);
}

#[test]
fn reuse_with_another_shape_fails() {
    let mut model = Bpr::new(spec(2, 3, 1));
    model.fit(&matrix((3, 2), &[(0, 0), (2, 1)])).unwrap();
    let before = model.factors().unwrap().clone();

    let bigger = matrix((4, 2), &[(0, 0), (3, 1)]);
    assert!(matches!(
        model.fit(&bigger),
        Err(BprErr::ShapeMismatch {
            what: "item factors",
            ..
        })
    ));
    assert_eq!(model.factors(), Some(&before));
}

#[test]
fn explicit_zeros_are_not_interactions() {
    let data =
        InteractionMatrix::from_triplets((3, 1), vec![0, 1, 2], vec![0, 0, 0], vec![1u8, 0, 3])
            .unwrap();
    let mut model = Bpr::new(spec(2, 10, 1));
    model.fit(&data).unwrap();

    let store: &FactorStore = model.factors().unwrap();
    assert!(store.item_factors().row(1).iter().all(|&x| x == 0.));
    assert!(store.item_factors().row(0).iter().any(|&x| x != 0.));
}
