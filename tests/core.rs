use approx::assert_abs_diff_eq;
use linreg_gd::backend::Backend;
use linreg_gd::data::{GeneratorConfig, Observations, generate, generate_simple};
use linreg_gd::error::ErrorKind;
use linreg_gd::tensor;
use linreg_gd::tensors::Tensor;
use linreg_gd::trainer::{TrainConfig, init_coefficients, mean_squared_error, train, train_raw};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Smallest eigenvalue of `XᵀX / n` (cyclic Jacobi rotations).
///
/// Gradient descent on this problem contracts the coefficient error by at least
/// `1 - lr * λ_min` per iteration, so this sets how long a design takes to fit.
fn gram_min_eigenvalue(obs: &Observations) -> f64 {
    let (n, k) = (obs.num_observations(), obs.num_coefficients());
    let mut a = vec![vec![0.0_f64; k]; k];
    for (x, _) in obs.iter() {
        for p in 0..k {
            for q in 0..k {
                a[p][q] += x[p] * x[q] / n as f64;
            }
        }
    }

    for _ in 0..100 {
        let off: f64 = (0..k)
            .flat_map(|p| (0..k).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off < 1e-30 {
            break;
        }
        for p in 0..k {
            for q in p + 1..k {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for row in a.iter_mut() {
                    let (rp, rq) = (row[p], row[q]);
                    row[p] = c * rp - s * rq;
                    row[q] = s * rp + c * rq;
                }
                for r in 0..k {
                    let (pr, qr) = (a[p][r], a[q][r]);
                    a[p][r] = c * pr - s * qr;
                    a[q][r] = s * pr + c * qr;
                }
            }
        }
    }
    (0..k).map(|i| a[i][i]).fold(f64::INFINITY, f64::min)
}

/// Iterations after which every coefficient is within `tol` of `actual`, from any
/// start in `[-1, 1)`. `None` if the design needs more than `cap`.
fn iterations_to_converge(
    obs: &Observations,
    actual: &[f64],
    learning_rate: f64,
    tol: f64,
    cap: usize,
) -> Option<usize> {
    // 10% slack for rounding in the eigenvalue estimate
    let lambda = 0.9 * gram_min_eigenvalue(obs);
    if !(lambda > 0.0) {
        return None;
    }
    let start_error =
        actual.iter().map(|c| c * c).sum::<f64>().sqrt() + (actual.len() as f64).sqrt();
    let needed = ((start_error / tol).ln() / (learning_rate * lambda)).ceil();
    (needed <= cap as f64).then(|| needed.max(1.0) as usize)
}

// ---------------------------------------------------------------------------
// generator
// ---------------------------------------------------------------------------

#[test]
fn test_generate_shapes_and_intercept_column() {
    let obs = generate(&[2.0, 8.0, 4.0, 4.0], 6, &GeneratorConfig::default(), &mut rng(0)).unwrap();
    assert_eq!(obs.num_observations(), 6);
    assert_eq!(obs.num_coefficients(), 4);
    assert_eq!(obs.inputs().shape, vec![6, 4]);
    assert_eq!(obs.outputs().shape, vec![6]);
    for (x, _) in obs.iter() {
        assert_eq!(x[0], 1.0);
        assert!(x[1..].iter().all(|v| (-1.0..1.0).contains(v)));
    }
}

#[test]
fn test_generate_targets_are_exact_dot_products() {
    let coefs = [6.0, 2.0];
    let obs = generate(&coefs, 5, &GeneratorConfig::default(), &mut rng(3)).unwrap();
    for (x, y) in obs.iter() {
        assert_eq!(y, coefs[0] * x[0] + coefs[1] * x[1]);
    }
}

#[test]
fn test_generate_without_intercept_draws_every_column() {
    let config = GeneratorConfig {
        feature_range: (2.0, 3.0),
        intercept: false,
    };
    let obs = generate(&[1.0, 1.0], 4, &config, &mut rng(5)).unwrap();
    assert!(obs.inputs().data.iter().all(|v| (2.0..3.0).contains(v)));
}

#[test]
fn test_generate_simple_matches_generate() {
    let a = generate_simple(6.0, 2.0, 5, &GeneratorConfig::default(), &mut rng(11)).unwrap();
    let b = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng(11)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_generator_is_idempotent_under_a_seed() {
    let config = GeneratorConfig::default();
    let a = generate(&[2.0, 8.0, 4.0, 4.0], 6, &config, &mut rng(99)).unwrap();
    let b = generate(&[2.0, 8.0, 4.0, 4.0], 6, &config, &mut rng(99)).unwrap();
    assert_eq!(a, b);
    let c = generate(&[2.0, 8.0, 4.0, 4.0], 6, &config, &mut rng(100)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_generate_rejects_bad_arguments() {
    let config = GeneratorConfig::default();
    let err = generate(&[6.0, 2.0], 0, &config, &mut rng(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(generate(&[], 3, &config, &mut rng(0)).is_err());

    let empty = GeneratorConfig {
        feature_range: (1.0, 1.0),
        ..config
    };
    assert!(empty.validate().is_err());
    assert!(generate(&[6.0, 2.0], 3, &empty, &mut rng(0)).is_err());

    let infinite = GeneratorConfig {
        feature_range: (0.0, f64::INFINITY),
        ..config
    };
    assert!(generate(&[6.0, 2.0], 3, &infinite, &mut rng(0)).is_err());
}

#[test]
fn test_generate_allows_underdetermined_sets() {
    let obs = generate(&[1.0, 2.0, 3.0], 1, &GeneratorConfig::default(), &mut rng(0)).unwrap();
    assert_eq!(obs.num_observations(), 1);
}

// ---------------------------------------------------------------------------
// observations
// ---------------------------------------------------------------------------

#[test]
fn test_observations_validate_shapes() {
    let x = tensor!([[1.0, 0.0], [1.0, 1.0]]);

    let mismatched = Observations::new(x.clone(), tensor!([1.0, 2.0, 3.0])).unwrap_err();
    assert_eq!(mismatched.kind(), ErrorKind::InvalidArgument);

    let empty = Observations::new(Tensor::new(vec![0, 2], vec![]), Tensor::new(vec![0], vec![]));
    assert!(empty.is_err());

    assert!(Observations::new(tensor!([1.0, 2.0]), tensor!([1.0, 2.0])).is_err());
    assert!(Observations::new(x, tensor!([6.0, 8.0])).is_ok());
}

#[test]
fn test_observations_from_rows() {
    let obs = Observations::from_rows(&[vec![1.0, 0.0], vec![1.0, 1.0]], vec![6.0, 8.0]).unwrap();
    assert_eq!(obs.get(1), (&[1.0, 1.0][..], 8.0));

    assert!(Observations::from_rows(&[vec![1.0, 0.0], vec![1.0]], vec![6.0, 8.0]).is_err());
    assert!(Observations::from_rows(&[], vec![]).is_err());
}

// ---------------------------------------------------------------------------
// trainer
// ---------------------------------------------------------------------------

#[test]
fn test_simple_scenario_recovers_coefficients() {
    let mut rng = rng(2024);
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng).unwrap();
    let config = TrainConfig {
        learning_rate: 0.1,
        num_iterations: 5_000,
        ..TrainConfig::simple()
    };
    let report = train(&obs, &config, &mut rng).unwrap();

    assert_eq!(report.iterations, 5_000);
    assert_eq!(report.initial.len(), 2);
    assert_abs_diff_eq!(report.coefficients[0], 6.0, epsilon = 1e-2);
    assert_abs_diff_eq!(report.coefficients[1], 2.0, epsilon = 1e-2);
}

#[test]
fn test_multiple_scenario_recovers_coefficients() {
    let actual = [2.0, 8.0, 4.0, 4.0];
    let mut rng = rng(7);
    let obs = generate(&actual, 6, &GeneratorConfig::default(), &mut rng).unwrap();
    let report = train(&obs, &TrainConfig::multiple(), &mut rng).unwrap();

    assert_eq!(report.iterations, 50_000);
    for (learned, expected) in report.coefficients.iter().zip(actual) {
        assert_abs_diff_eq!(*learned, expected, epsilon = 1e-2);
    }
}

#[test]
fn test_exactly_determined_system_converges() {
    // two observations for two coefficients: y = 6 + 2x
    let x = tensor!([[1.0, 0.0], [1.0, 1.0]]);
    let y = tensor!([6.0, 8.0]);
    let report = train_raw(&x, &y, &TrainConfig::simple(), &mut rng(1)).unwrap();
    assert_abs_diff_eq!(report.coefficients[0], 6.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.coefficients[1], 2.0, epsilon = 1e-6);

    // four observations for four coefficients
    let x = tensor!([
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 0.0, 0.0],
        [1.0, 0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0, 1.0]
    ]);
    let y = tensor!([2.0, 10.0, 6.0, 6.0]);
    let report = train_raw(&x, &y, &TrainConfig::multiple(), &mut rng(1)).unwrap();
    for (learned, expected) in report.coefficients.iter().zip([2.0, 8.0, 4.0, 4.0]) {
        assert_abs_diff_eq!(*learned, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_generated_square_systems_converge() {
    for actual in [&[6.0, 2.0][..], &[2.0, 8.0, 4.0, 4.0][..]] {
        let mut fitted = 0;
        for seed in 0..12 {
            let mut rng = rng(seed);
            let config = GeneratorConfig::default();
            let obs = generate(actual, actual.len(), &config, &mut rng).unwrap();
            // a nearly singular draw may need millions of iterations; those are skipped
            let Some(num_iterations) = iterations_to_converge(&obs, actual, 0.1, 1e-3, 200_000)
            else {
                continue;
            };
            let config = TrainConfig {
                learning_rate: 0.1,
                num_iterations,
                ..TrainConfig::multiple()
            };
            let report = train(&obs, &config, &mut rng).unwrap();
            for (learned, expected) in report.coefficients.iter().zip(actual) {
                assert_abs_diff_eq!(*learned, *expected, epsilon = 1e-3);
            }
            fitted += 1;
        }
        assert!(fitted >= 6, "only {fitted} of 12 square designs were fitted for {actual:?}");
    }
}

#[test]
fn test_training_is_deterministic_under_a_seed() {
    let run = || {
        let mut rng = rng(31);
        let config = GeneratorConfig::default();
        let obs = generate(&[2.0, 8.0, 4.0, 4.0], 6, &config, &mut rng).unwrap();
        let config = TrainConfig {
            num_iterations: 2_000,
            record_history: true,
            ..TrainConfig::multiple()
        };
        train(&obs, &config, &mut rng).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a, b);
    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.coefficients), bits(&b.coefficients));
    assert_eq!(bits(&a.loss_history), bits(&b.loss_history));
}

#[test]
fn test_backends_agree_bit_for_bit() {
    let obs = generate(&[2.0, 8.0, 4.0, 4.0], 6, &GeneratorConfig::default(), &mut rng(8)).unwrap();
    let base = TrainConfig {
        num_iterations: 3_000,
        ..TrainConfig::multiple()
    };
    let cpu = train(&obs, &base, &mut rng(9)).unwrap();
    let par = train(
        &obs,
        &TrainConfig {
            backend: Backend::Rayon,
            ..base
        },
        &mut rng(9),
    )
    .unwrap();
    assert_eq!(cpu, par);
}

#[test]
fn test_loss_is_non_increasing() {
    let mut rng = rng(12);
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng).unwrap();
    let config = TrainConfig {
        record_history: true,
        ..TrainConfig::simple()
    };
    let report = train(&obs, &config, &mut rng).unwrap();

    assert_eq!(report.loss_history.len(), 5_000);
    for pair in report.loss_history.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "loss rose from {} to {}", pair[0], pair[1]);
    }
    let last = report.final_loss().unwrap();
    let recomputed = mean_squared_error(&obs, &report.coefficients, Backend::Cpu);
    assert_abs_diff_eq!(last, recomputed, epsilon = 1e-15);
    assert!(last < report.loss_history[0]);
}

#[test]
fn test_history_is_empty_unless_requested() {
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng(4)).unwrap();
    let report = train(&obs, &TrainConfig::simple(), &mut rng(4)).unwrap();
    assert!(report.loss_history.is_empty());
    assert_eq!(report.final_loss(), None);
}

#[test]
fn test_initial_coefficients_come_from_the_init_range() {
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng(4)).unwrap();
    let config = TrainConfig {
        init_range: (5.0, 6.0),
        num_iterations: 1,
        ..TrainConfig::simple()
    };
    let report = train(&obs, &config, &mut rng(4)).unwrap();
    assert!(report.initial.iter().all(|v| (5.0..6.0).contains(v)));
    assert_ne!(report.initial, report.coefficients);

    let draws = init_coefficients(3, (-1.0, 1.0), &mut rng(4)).unwrap();
    assert_eq!(draws.len(), 3);
}

#[test]
fn test_single_iteration_applies_one_simultaneous_update() {
    let x = tensor!([[1.0, 2.0], [1.0, 4.0]]);
    let y = tensor!([3.0, 1.0]);
    let config = TrainConfig {
        num_iterations: 1,
        learning_rate: 0.5,
        ..TrainConfig::simple()
    };
    let report = train_raw(&x, &y, &config, &mut rng(6)).unwrap();

    let [b0, b1] = [report.initial[0], report.initial[1]];
    let r: Vec<f64> = (0..2).map(|i| y.data[i] - (b0 * x.row(i)[0] + b1 * x.row(i)[1])).collect();
    let g0 = -(r[0] + r[1]) / 2.0;
    let g1 = -(r[0] * 2.0 + r[1] * 4.0) / 2.0;
    assert_abs_diff_eq!(report.coefficients[0], b0 - 0.5 * g0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.coefficients[1], b1 - 0.5 * g1, epsilon = 1e-12);
}

#[test]
fn test_divergence_is_returned_not_reported() {
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng(5)).unwrap();
    let config = TrainConfig {
        learning_rate: 1e6,
        num_iterations: 1_000,
        ..TrainConfig::simple()
    };
    let report = train(&obs, &config, &mut rng(5)).unwrap();
    assert!(report.coefficients.iter().any(|c| !c.is_finite()));
}

#[test]
fn test_train_rejects_bad_arguments() {
    let obs = generate(&[6.0, 2.0], 5, &GeneratorConfig::default(), &mut rng(0)).unwrap();
    let bad = [
        TrainConfig {
            learning_rate: 0.0,
            ..TrainConfig::simple()
        },
        TrainConfig {
            learning_rate: -0.1,
            ..TrainConfig::simple()
        },
        TrainConfig {
            learning_rate: f64::NAN,
            ..TrainConfig::simple()
        },
        TrainConfig {
            num_iterations: 0,
            ..TrainConfig::simple()
        },
        TrainConfig {
            init_range: (1.0, 0.0),
            ..TrainConfig::simple()
        },
    ];
    for config in &bad {
        let err = train(&obs, config, &mut rng(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    let x = tensor!([[1.0, 0.0], [1.0, 1.0]]);
    let err = train_raw(&x, &tensor!([1.0]), &TrainConfig::simple(), &mut rng(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let none = train_raw(
        &Tensor::new(vec![0, 2], vec![]),
        &Tensor::new(vec![0], vec![]),
        &TrainConfig::simple(),
        &mut rng(0),
    );
    assert!(none.is_err());
}

#[test]
fn test_per_problem_defaults() {
    assert_eq!(TrainConfig::simple().num_iterations, 5_000);
    assert_eq!(TrainConfig::multiple().num_iterations, 50_000);
    assert_eq!(TrainConfig::simple().learning_rate, 0.1);
    assert_eq!(TrainConfig::multiple().learning_rate, 0.1);
    assert_eq!(TrainConfig::default(), TrainConfig::simple());
}

proptest! {
    #[test]
    fn prop_targets_follow_the_true_coefficients(
        coefs in prop::collection::vec(-10.0f64..10.0, 1..6),
        n in 1usize..20,
        seed in any::<u64>(),
        intercept in any::<bool>(),
    ) {
        let config = GeneratorConfig { intercept, ..GeneratorConfig::default() };
        let obs = generate(&coefs, n, &config, &mut rng(seed)).unwrap();
        prop_assert_eq!(obs.num_observations(), n);
        prop_assert_eq!(obs.num_coefficients(), coefs.len());
        for (x, y) in obs.iter() {
            if intercept {
                prop_assert_eq!(x[0], 1.0);
            }
            let expected: f64 = x.iter().zip(&coefs).map(|(a, b)| a * b).sum();
            prop_assert!((y - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_mse_is_zero_at_the_true_coefficients(
        coefs in prop::collection::vec(-10.0f64..10.0, 1..5),
        seed in any::<u64>(),
    ) {
        let config = GeneratorConfig::default();
        let obs = generate(&coefs, coefs.len() + 3, &config, &mut rng(seed)).unwrap();
        prop_assert!(mean_squared_error(&obs, &coefs, Backend::Cpu) < 1e-20);
        prop_assert_eq!(
            mean_squared_error(&obs, &coefs, Backend::Cpu).to_bits(),
            mean_squared_error(&obs, &coefs, Backend::Rayon).to_bits()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_training_recovers_nonzero_coefficients(
        actual in prop::collection::vec(prop_oneof![-10.0f64..-0.5, 0.5f64..10.0], 2..5),
        extra in 0usize..8,
        seed in any::<u64>(),
    ) {
        let mut rng = rng(seed);
        let n = 4 * actual.len() + extra;
        let obs = generate(&actual, n, &GeneratorConfig::default(), &mut rng).unwrap();
        let budget = iterations_to_converge(&obs, &actual, 0.1, 1e-3, 100_000);
        prop_assume!(budget.is_some());
        let config = TrainConfig {
            learning_rate: 0.1,
            num_iterations: budget.unwrap_or(1),
            ..TrainConfig::simple()
        };
        let report = train(&obs, &config, &mut rng).unwrap();
        for (learned, expected) in report.coefficients.iter().zip(&actual) {
            prop_assert!((learned - expected).abs() < 1e-3, "{learned} vs {expected}");
        }
    }
}
