//! CD-k chain behaviour against a model with fixed, hand-picked activations.

use rbm_core::{all_configurations, DataDistribution, RbmError, Result, SpinBasis, SpinVector};
use rbm_samplers::{
    cdk, generate_batch, sample_hidden, ConditionalModel, FixedUniforms, RngSource,
};

/// Units are independent of the opposite layer: `P(on)` is a constant per unit.
struct TableModel {
    basis: SpinBasis,
    hidden_p: Vec<f64>,
    visible_p: Vec<f64>,
}

impl ConditionalModel for TableModel {
    fn basis(&self) -> SpinBasis {
        self.basis
    }

    fn n_visible(&self) -> usize {
        self.visible_p.len()
    }

    fn n_hidden(&self) -> usize {
        self.hidden_p.len()
    }

    fn hidden_activation(&self, i: usize, v: &SpinVector) -> Result<f64> {
        v.require_basis(self.basis)?;
        Ok(self.hidden_p[i])
    }

    fn visible_activation(&self, j: usize, h: &SpinVector) -> Result<f64> {
        h.require_basis(self.basis)?;
        Ok(self.visible_p[j])
    }
}

fn point_mass(values: &[i8]) -> DataDistribution {
    let configs = all_configurations(values.len()).unwrap();
    let target = SpinVector::new(SpinBasis::Binary, values.to_vec()).unwrap();
    let probabilities = configs
        .iter()
        .map(|v| if *v == target { 1.0 } else { 0.0 })
        .collect();
    DataDistribution::new(configs, probabilities).unwrap()
}

#[test]
fn test_zero_depth_rejected() {
    let model = TableModel {
        basis: SpinBasis::Ising,
        hidden_p: vec![0.5],
        visible_p: vec![0.5, 0.5],
    };
    let data = point_mass(&[1, 0]);
    let mut source = FixedUniforms::constant(0.5);

    assert_eq!(
        cdk(&model, 0, &data, &mut source).unwrap_err(),
        RbmError::ZeroCdDepth
    );
    assert_eq!(
        generate_batch(&model, 0, 3, &data, &mut source).unwrap_err(),
        RbmError::ZeroCdDepth
    );
    assert_eq!(
        generate_batch(&model, 1, 0, &data, &mut source).unwrap_err(),
        RbmError::EmptyBatch
    );
}

#[test]
fn test_seed_is_converted_to_model_basis() {
    let model = TableModel {
        basis: SpinBasis::Ising,
        hidden_p: vec![0.0],
        visible_p: vec![0.0, 0.0],
    };
    let data = point_mass(&[1, 0]);
    let mut source = FixedUniforms::constant(0.3);

    let sample = cdk(&model, 1, &data, &mut source).unwrap();
    assert_eq!(sample.data_visible.basis(), SpinBasis::Ising);
    assert_eq!(sample.data_visible.values(), &[1, -1]);
    // Every activation is zero, so every unit ends "off".
    assert_eq!(sample.model_visible.values(), &[-1, -1]);
    assert_eq!(sample.model_hidden.values(), &[-1]);
}

#[test]
fn test_uniform_draw_order() {
    // 2 hidden, 3 visible, all activations 0.5: a unit is on iff its uniform < 0.5.
    let model = TableModel {
        basis: SpinBasis::Binary,
        hidden_p: vec![0.5, 0.5],
        visible_p: vec![0.5, 0.5, 0.5],
    };
    let data = point_mass(&[0, 0, 0]);
    let uniforms = vec![
        0.9, // seed
        0.1, 0.9, // round 1 hidden
        0.9, 0.1, 0.9, // round 1 visible
        0.9, 0.1, // round 2 hidden
        0.1, 0.1, 0.9, // round 2 visible
    ];
    let mut source = FixedUniforms::new(uniforms);

    let sample = cdk(&model, 2, &data, &mut source).unwrap();
    assert_eq!(source.draws(), 1 + 2 * (2 + 3));
    assert_eq!(sample.model_hidden.values(), &[0, 1]);
    assert_eq!(sample.model_visible.values(), &[1, 1, 0]);
    assert_eq!(sample.data_visible.values(), &[0, 0, 0]);
}

#[test]
fn test_batch_shape_and_pairing() {
    let model = TableModel {
        basis: SpinBasis::Ising,
        hidden_p: vec![0.3, 0.6],
        visible_p: vec![0.2, 0.8, 0.5],
    };
    let probabilities = vec![0.125; 8];
    let data = DataDistribution::new(all_configurations(3).unwrap(), probabilities).unwrap();
    let mut source = RngSource::from_seed(11);

    let batch = generate_batch(&model, 3, 17, &data, &mut source).unwrap();
    assert_eq!(batch.len(), 17);
    for (model_v, data_v) in batch.pairs() {
        assert_eq!(model_v.len(), 3);
        assert_eq!(data_v.len(), 3);
        assert_eq!(model_v.basis(), SpinBasis::Ising);
        assert_eq!(data_v.basis(), SpinBasis::Ising);
    }
}

#[test]
fn test_visible_marginals_match_activations() {
    let model = TableModel {
        basis: SpinBasis::Binary,
        hidden_p: vec![0.5],
        visible_p: vec![0.2, 0.9],
    };
    let data = point_mass(&[0, 0]);
    let mut source = RngSource::from_seed(3);

    let n = 20_000;
    let batch = generate_batch(&model, 1, n, &data, &mut source).unwrap();
    for (j, &p) in model.visible_p.iter().enumerate() {
        let on = batch.model_samples().iter().filter(|v| v.is_on(j)).count();
        let freq = on as f64 / n as f64;
        println!("unit {}: empirical {:.4}, expected {:.4}", j, freq, p);
        assert!((freq - p).abs() < 0.02, "unit {} frequency {} vs {}", j, freq, p);
    }
}

#[test]
fn test_wrong_basis_or_length_rejected() {
    let model = TableModel {
        basis: SpinBasis::Ising,
        hidden_p: vec![0.5],
        visible_p: vec![0.5, 0.5],
    };
    let mut source = FixedUniforms::constant(0.5);

    let binary = SpinVector::from_bits(SpinBasis::Binary, &[true, false]);
    assert!(matches!(
        sample_hidden(&model, &binary, &mut source),
        Err(RbmError::BasisMismatch { .. })
    ));

    let short = SpinVector::from_bits(SpinBasis::Ising, &[true]);
    assert!(matches!(
        sample_hidden(&model, &short, &mut source),
        Err(RbmError::ShapeMismatch { .. })
    ));

    let data = point_mass(&[1, 0, 1]);
    assert!(matches!(
        cdk(&model, 1, &data, &mut source),
        Err(RbmError::ShapeMismatch { .. })
    ));
}
