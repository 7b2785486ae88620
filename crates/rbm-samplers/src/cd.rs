//! Contrastive divergence (CD-k) chains.
//!
//! A chain is seeded with a weighted draw from the data distribution and then
//! alternates full hidden and full visible updates `k` times. The draw order
//! of uniforms is fixed: one for the seed, then per round every hidden unit in
//! index order followed by every visible unit in index order. With a
//! [`FixedUniforms`](crate::FixedUniforms) source a chain is therefore fully
//! determined.

use crate::bernoulli::bernoulli_spin;
use crate::sampler::ConditionalModel;
use crate::source::UniformSource;
use rbm_core::{Batch, DataDistribution, RbmError, Result, SpinVector};
use serde::{Deserialize, Serialize};

/// End state of one CD-k chain together with its seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdSample {
    /// Visible state after the last round.
    pub model_visible: SpinVector,
    /// Hidden state sampled in the last round.
    pub model_hidden: SpinVector,
    /// The data vector the chain started from, in the model basis.
    pub data_visible: SpinVector,
}

/// Sample the whole hidden layer given `v`, units in index order.
pub fn sample_hidden<M, S>(model: &M, v: &SpinVector, source: &mut S) -> Result<SpinVector>
where
    M: ConditionalModel + ?Sized,
    S: UniformSource + ?Sized,
{
    let basis = model.basis();
    v.require_basis(basis)?.require_len("visible state", model.n_visible())?;
    let values = (0..model.n_hidden())
        .map(|i| {
            let p = model.hidden_activation(i, v)?;
            Ok(bernoulli_spin(p, basis, source))
        })
        .collect::<Result<Vec<i8>>>()?;
    SpinVector::new(basis, values)
}

/// Sample the whole visible layer given `h`, units in index order.
pub fn sample_visible<M, S>(model: &M, h: &SpinVector, source: &mut S) -> Result<SpinVector>
where
    M: ConditionalModel + ?Sized,
    S: UniformSource + ?Sized,
{
    let basis = model.basis();
    h.require_basis(basis)?.require_len("hidden state", model.n_hidden())?;
    let values = (0..model.n_visible())
        .map(|j| {
            let p = model.visible_activation(j, h)?;
            Ok(bernoulli_spin(p, basis, source))
        })
        .collect::<Result<Vec<i8>>>()?;
    SpinVector::new(basis, values)
}

/// Run one CD-k chain seeded from `data`.
///
/// The seed is converted into the model basis explicitly before the chain
/// starts. `k = 0` is rejected.
pub fn cdk<M, S>(model: &M, k: usize, data: &DataDistribution, source: &mut S) -> Result<CdSample>
where
    M: ConditionalModel + ?Sized,
    S: UniformSource + ?Sized,
{
    if k == 0 {
        return Err(RbmError::ZeroCdDepth);
    }
    if data.vector_len() != model.n_visible() {
        return Err(RbmError::ShapeMismatch {
            what: "data vectors",
            expected: model.n_visible(),
            actual: data.vector_len(),
        });
    }

    let seed = data.sample(source.uniform()).to_basis(model.basis());

    let mut visible = seed.clone();
    let mut hidden = SpinVector::empty(model.basis());
    for _ in 0..k {
        hidden = sample_hidden(model, &visible, source)?;
        visible = sample_visible(model, &hidden, source)?;
    }

    Ok(CdSample {
        model_visible: visible,
        model_hidden: hidden,
        data_visible: seed,
    })
}

/// Run `batch_size` independent CD-k chains and collect them into a batch.
pub fn generate_batch<M, S>(
    model: &M,
    k: usize,
    batch_size: usize,
    data: &DataDistribution,
    source: &mut S,
) -> Result<Batch>
where
    M: ConditionalModel + ?Sized,
    S: UniformSource + ?Sized,
{
    if batch_size == 0 {
        return Err(RbmError::EmptyBatch);
    }

    let mut model_samples = Vec::with_capacity(batch_size);
    let mut data_samples = Vec::with_capacity(batch_size);
    for _ in 0..batch_size {
        let sample = cdk(model, k, data, source)?;
        model_samples.push(sample.model_visible);
        data_samples.push(sample.data_visible);
    }
    tracing::trace!(batch_size, k, "generated CD batch");

    Batch::new(model_samples, data_samples)
}
