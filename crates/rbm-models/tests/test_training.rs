//! Training driver: preconditions, exact single steps, history layout.

mod utils;

use ndarray::array;
use rbm_core::{
    all_configurations, all_configurations_in, DataDistribution, EpochSchedule, RbmError,
    RunConfig, SpinBasis, Theta,
};
use rbm_models::{
    cd_step, epoch_distributions, kl_divergence, learned_distribution, log_likelihood_trace,
    log_partition_function, periodic_chain_distribution, train, train_from,
};
use rbm_samplers::{sigmoid, FixedUniforms, RngSource};
use utils::assert_close;

fn uniform_two_unit() -> DataDistribution {
    DataDistribution::new(all_configurations(2).unwrap(), vec![0.25; 4]).unwrap()
}

fn step_theta() -> Theta {
    Theta::new(array![[0.3, -0.2]], array![0.1, -0.1], array![0.05]).unwrap()
}

// seed -> index 2 ([1, 0]); hidden on; visible 0 off, visible 1 on.
fn step_uniforms() -> FixedUniforms {
    FixedUniforms::new(vec![0.6, 0.5, 0.9, 0.2])
}

#[test]
fn test_zero_total_steps_rejected() {
    let data = uniform_two_unit();
    let config = RunConfig::from_lists(&[0, 0], &[0.1, 0.1], &[1, 1], 2, 1, 4).unwrap();
    let mut source = RngSource::from_seed(0);
    assert_eq!(
        train(&config, &data, SpinBasis::Ising, &mut source).unwrap_err(),
        RbmError::ZeroTotalSteps
    );
}

#[test]
fn test_zero_cd_depth_rejected() {
    let data = uniform_two_unit();
    let config = RunConfig::from_lists(&[3], &[0.1], &[0], 2, 1, 4).unwrap();
    let mut source = RngSource::from_seed(0);
    assert_eq!(
        train(&config, &data, SpinBasis::Ising, &mut source).unwrap_err(),
        RbmError::ZeroCdDepth
    );

    let schedule = EpochSchedule {
        steps: 1,
        learning_rate: 0.1,
        cd_depth: 0,
    };
    assert_eq!(
        cd_step(&step_theta(), &schedule, 1, &data, SpinBasis::Ising, &mut source).unwrap_err(),
        RbmError::ZeroCdDepth
    );
}

#[test]
fn test_data_width_must_match_visible_layer() {
    let data = uniform_two_unit();
    let config = RunConfig::from_lists(&[1], &[0.1], &[1], 3, 1, 1).unwrap();
    let mut source = RngSource::from_seed(0);
    assert!(matches!(
        train(&config, &data, SpinBasis::Ising, &mut source),
        Err(RbmError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_single_step_is_exact_gradient_ascent() {
    let theta = step_theta();
    let data = uniform_two_unit();
    let schedule = EpochSchedule {
        steps: 1,
        learning_rate: 0.1,
        cd_depth: 1,
    };
    let mut source = step_uniforms();

    let outcome = cd_step(&theta, &schedule, 1, &data, SpinBasis::Ising, &mut source).unwrap();
    assert_eq!(source.draws(), 4);

    // P(h on | [1, -1]) = σ(2 · 0.55) ≈ 0.75 > 0.5.
    // P(v0 on | [1]) = σ(2 · 0.4) ≈ 0.69 < 0.9; P(v1 on | [1]) = σ(-0.6) ≈ 0.35 > 0.2.
    assert_eq!(outcome.batch.data_samples()[0].values(), &[1, -1]);
    assert_eq!(outcome.batch.model_samples()[0].values(), &[-1, 1]);

    // E[h | v] = tanh(field) for ±1 units.
    let vd = [1.0, -1.0];
    let vm = [-1.0, 1.0];
    let eh_d = (0.3 * vd[0] - 0.2 * vd[1] + 0.05f64).tanh();
    let eh_m = (0.3 * vm[0] - 0.2 * vm[1] + 0.05f64).tanh();

    let alpha = 0.1;
    let w = [0.3, -0.2];
    let b = [0.1, -0.1];
    for j in 0..2 {
        let dw = eh_d * vd[j] - eh_m * vm[j];
        assert_close(outcome.theta.weights[[0, j]], w[j] + alpha * dw, 1e-12, "W");
        assert_close(outcome.theta.visible_bias[j], b[j] + alpha * (vd[j] - vm[j]), 1e-12, "b");
        assert_close(outcome.gradient.weights[[0, j]], dw, 1e-12, "dW");
    }
    assert_close(outcome.theta.hidden_bias[0], 0.05 + alpha * (eh_d - eh_m), 1e-12, "c");

    // ln Z belongs to the pre-step parameters.
    let all_v = all_configurations_in(2, SpinBasis::Ising).unwrap();
    let all_h = all_configurations_in(1, SpinBasis::Ising).unwrap();
    let log_z = log_partition_function(&all_v, &all_h, &theta).unwrap();
    assert_close(outcome.log_partition, log_z, 1e-12, "ln Z");
}

#[test]
fn test_single_step_binary_basis() {
    let theta = step_theta();
    let data = uniform_two_unit();
    let schedule = EpochSchedule {
        steps: 1,
        learning_rate: 0.1,
        cd_depth: 1,
    };
    let mut source = step_uniforms();

    let outcome = cd_step(&theta, &schedule, 1, &data, SpinBasis::Binary, &mut source).unwrap();
    assert_eq!(source.draws(), 4);

    // P(h on | [1, 0]) = σ(0.35) ≈ 0.59 > 0.5.
    // P(v0 on | [1]) = σ(0.4) ≈ 0.60 < 0.9; P(v1 on | [1]) = σ(-0.3) ≈ 0.43 > 0.2.
    assert_eq!(outcome.batch.data_samples()[0].values(), &[1, 0]);
    assert_eq!(outcome.batch.model_samples()[0].values(), &[0, 1]);

    // E[h | v] = σ(field) for 0/1 units.
    let vd = [1.0, 0.0];
    let vm = [0.0, 1.0];
    let eh_d = sigmoid(0.3 * vd[0] - 0.2 * vd[1] + 0.05);
    let eh_m = sigmoid(0.3 * vm[0] - 0.2 * vm[1] + 0.05);

    let alpha = 0.1;
    let w = [0.3, -0.2];
    let b = [0.1, -0.1];
    for j in 0..2 {
        let dw = eh_d * vd[j] - eh_m * vm[j];
        assert_close(outcome.theta.weights[[0, j]], w[j] + alpha * dw, 1e-12, "W");
        assert_close(outcome.theta.visible_bias[j], b[j] + alpha * (vd[j] - vm[j]), 1e-12, "b");
        assert_close(outcome.gradient.weights[[0, j]], dw, 1e-12, "dW");
    }
    assert_close(outcome.theta.hidden_bias[0], 0.05 + alpha * (eh_d - eh_m), 1e-12, "c");

    let all_v = all_configurations(2).unwrap();
    let all_h = all_configurations(1).unwrap();
    let log_z = log_partition_function(&all_v, &all_h, &theta).unwrap();
    assert_close(outcome.log_partition, log_z, 1e-12, "ln Z");
}

#[test]
fn test_driver_records_the_same_step() {
    let theta = step_theta();
    let data = uniform_two_unit();
    let config = RunConfig::from_lists(&[1], &[0.1], &[1], 2, 1, 1).unwrap();

    let direct = cd_step(
        &theta,
        &config.epochs[0],
        1,
        &data,
        SpinBasis::Ising,
        &mut step_uniforms(),
    )
    .unwrap();
    let run = train_from(theta.clone(), &config, &data, SpinBasis::Ising, &mut step_uniforms()).unwrap();

    assert_eq!(run.history.initial_theta(), &theta);
    assert_eq!(run.history.len(), 1);
    let entry = &run.history.entries()[0];
    assert_eq!(entry.theta, direct.theta);
    assert_eq!(entry.batch, direct.batch);
    assert_eq!(run.final_theta, direct.theta);
}

#[test]
fn test_history_uses_global_step_index() {
    let data = periodic_chain_distribution(3, 1.0).unwrap();
    let config = RunConfig::from_lists(&[2, 0, 3], &[0.5, 0.25, 0.125], &[1, 1, 2], 3, 2, 5).unwrap();
    let mut source = RngSource::from_seed(7);
    let run = train(&config, &data, SpinBasis::Ising, &mut source).unwrap();

    assert_eq!(run.history.len(), config.total_steps());
    assert_eq!(run.history.basis(), SpinBasis::Ising);
    for (t, entry) in run.history.entries().iter().enumerate() {
        assert_eq!(entry.global_step, t);
        assert_eq!(config.locate(t), Some((entry.epoch, entry.step_in_epoch)));
        assert_eq!(
            config.global_step_index(entry.epoch, entry.step_in_epoch).unwrap(),
            t
        );
        assert_eq!(entry.learning_rate, config.epochs[entry.epoch].learning_rate);
        assert_eq!(entry.cd_depth, config.epochs[entry.epoch].cd_depth);
        assert_eq!(entry.batch.len(), 5);
    }
    assert_eq!(&run.final_theta, run.history.final_theta());

    let trace = log_likelihood_trace(&run.history).unwrap();
    assert_eq!(trace.len(), 5);
    assert!(trace.iter().all(|ll| ll.is_finite() && *ll <= 0.0));

    let per_epoch = epoch_distributions(&run.history, &config).unwrap();
    let epochs: Vec<usize> = per_epoch.iter().map(|(e, _)| *e).collect();
    assert_eq!(epochs, vec![0, 2]);
    assert_eq!(per_epoch[1].1, learned_distribution(&run.final_theta, SpinBasis::Ising).unwrap());
}

#[test]
fn test_history_consistency_against_config() {
    let data = periodic_chain_distribution(3, 1.0).unwrap();
    let config = RunConfig::from_lists(&[2, 0, 1], &[0.5, 0.25, 0.1], &[1, 1, 1], 3, 2, 4).unwrap();
    let run = train(&config, &data, SpinBasis::Binary, &mut RngSource::from_seed(3)).unwrap();
    assert_eq!(run.history.check_consistent(&config), Ok(()));

    let mut other = config.clone();
    other.batch_size = 5;
    assert!(matches!(
        run.history.check_consistent(&other),
        Err(RbmError::ShapeMismatch { what: "history batch", .. })
    ));

    let mut other = config.clone();
    other.n_hidden = 3;
    assert!(matches!(
        run.history.check_consistent(&other),
        Err(RbmError::ShapeMismatch { .. })
    ));

    let mut other = config.clone();
    other.epochs[2].steps = 2;
    assert!(run.history.check_consistent(&other).is_err());

    // Same total, different split: entries no longer sit at their own index.
    let mut other = config;
    other.epochs[0].steps = 1;
    other.epochs[1].steps = 1;
    assert!(run.history.check_consistent(&other).is_err());
}

#[test]
fn test_same_seed_same_run() {
    let data = periodic_chain_distribution(3, 1.0).unwrap();
    let config = RunConfig::from_lists(&[4], &[0.3], &[2], 3, 2, 6).unwrap();

    let a = train(&config, &data, SpinBasis::Ising, &mut RngSource::from_seed(21)).unwrap();
    let b = train(&config, &data, SpinBasis::Ising, &mut RngSource::from_seed(21)).unwrap();
    let c = train(&config, &data, SpinBasis::Ising, &mut RngSource::from_seed(22)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.final_theta, c.final_theta);
}

#[test]
fn test_learning_moves_towards_target() {
    let data = periodic_chain_distribution(4, 1.0).unwrap();
    let config = RunConfig::from_lists(&[200, 200], &[0.1, 0.05], &[1, 1], 4, 3, 20).unwrap();
    let mut source = RngSource::from_seed(1234);
    let run = train(&config, &data, SpinBasis::Ising, &mut source).unwrap();

    let before = learned_distribution(run.history.initial_theta(), SpinBasis::Ising).unwrap();
    let after = learned_distribution(&run.final_theta, SpinBasis::Ising).unwrap();
    let kl_before = kl_divergence(data.probabilities(), &before).unwrap();
    let kl_after = kl_divergence(data.probabilities(), &after).unwrap();
    println!("KL before {:.4}, after {:.4}", kl_before, kl_after);
    assert!(kl_after < kl_before);
}
