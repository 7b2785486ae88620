use rbm_core::{Result, SpinBasis, SpinVector};

/// A bipartite model whose layers can be sampled one unit at a time.
///
/// Implementors return the probability that a unit is in its "on" state
/// (`basis().high()`) given the full state of the opposite layer. The CD
/// chain only ever talks to a model through this trait.
pub trait ConditionalModel {
    /// Basis every vector handed to or produced by the model uses.
    fn basis(&self) -> SpinBasis;

    fn n_visible(&self) -> usize;

    fn n_hidden(&self) -> usize;

    /// `P(hᵢ = on | v)`.
    fn hidden_activation(&self, i: usize, v: &SpinVector) -> Result<f64>;

    /// `P(vⱼ = on | h)`.
    fn visible_activation(&self, j: usize, h: &SpinVector) -> Result<f64>;
}

impl<M: ConditionalModel + ?Sized> ConditionalModel for &M {
    fn basis(&self) -> SpinBasis {
        (**self).basis()
    }

    fn n_visible(&self) -> usize {
        (**self).n_visible()
    }

    fn n_hidden(&self) -> usize {
        (**self).n_hidden()
    }

    fn hidden_activation(&self, i: usize, v: &SpinVector) -> Result<f64> {
        (**self).hidden_activation(i, v)
    }

    fn visible_activation(&self, j: usize, h: &SpinVector) -> Result<f64> {
        (**self).visible_activation(j, h)
    }
}
