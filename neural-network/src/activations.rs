/// An activation function paired with its derivative.
///
/// `derivative` takes the *activated* value, not the pre-activation, so the
/// forward outputs can be reused directly during backpropagation.
#[derive(Clone, Copy, Debug)]
pub struct Activation {
    pub function: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
}

impl Activation {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    #[inline]
    pub fn derive(&self, activated: f64) -> f64 {
        (self.derivative)(activated)
    }
}

/// Logistic sigmoid. `sigmoid'(z) = s * (1 - s)` where `s = sigmoid(z)`.
pub const SIGMOID: Activation = Activation {
    function: |x| 1.0 / (1.0 + (-x).exp()),
    derivative: |s| s * (1.0 - s),
};
