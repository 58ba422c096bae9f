//! Semirings parameterizing matrix multiplication
//!
//! A semiring `(S, ⊕, ⊗, 0, 1)` swaps the add/multiply pair of the classical
//! dot product: `(A ⊗ B)[i,j] = ⊕_k (A[i,k] ⊗ B[k,j])`, folded from `0`.
//! Different instances turn the same matrix power into different graph
//! questions: boolean → reachability, tropical (min-plus) → shortest walk
//! weight, counting → number of walks, probability → independent-event
//! reach.
//!
//! The algebraic axioms (⊕ and ⊗ associative, ⊗ distributes over ⊕, `0` is
//! the ⊕-identity and ⊗-annihilator, `1` the ⊗-identity) are assumed, not
//! checked at runtime; the named instances satisfy them.
//!
//! Values travel as `f64`. The boolean instance encodes false/true as
//! 0.0/1.0; the tropical instance uses a real `f64::INFINITY` for its zero
//! rather than a large finite sentinel, since IEEE arithmetic gives the
//! absorbing behavior for free.

use ndarray::Array2;
use std::fmt;

/// Kernel selector for [`semiring_matmul`]. The four named semirings get
/// monomorphic kernels; everything else goes through the closure fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialization {
    Boolean,
    Tropical,
    Counting,
    Probability,
    Generic,
}

/// An algebraic structure `(name, 0, 1, ⊕, ⊗)` over `f64` values.
pub trait Semiring: Send + Sync {
    fn name(&self) -> &str;

    /// Additive identity, the fold seed
    fn zero(&self) -> f64;

    /// Multiplicative identity
    fn one(&self) -> f64;

    /// ⊕ — combines alternatives
    fn add(&self, a: f64, b: f64) -> f64;

    /// ⊗ — combines along a path
    fn mul(&self, a: f64, b: f64) -> f64;

    /// Which specialized multiply kernel applies
    fn specialization(&self) -> Specialization {
        Specialization::Generic
    }
}

/// Boolean semiring `(∨, ∧, false, true)` over a 0.0/1.0 encoding.
/// Matrix powers answer reachability.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanSemiring;

impl Semiring for BooleanSemiring {
    fn name(&self) -> &str {
        "boolean"
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        if a != 0.0 || b != 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        if a != 0.0 && b != 0.0 {
            1.0
        } else {
            0.0
        }
    }

    fn specialization(&self) -> Specialization {
        Specialization::Boolean
    }
}

/// Tropical (min-plus) semiring `(min, +, +∞, 0)`.
/// Matrix powers answer shortest-walk weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct TropicalSemiring;

impl Semiring for TropicalSemiring {
    fn name(&self) -> &str {
        "tropical"
    }

    fn zero(&self) -> f64 {
        f64::INFINITY
    }

    fn one(&self) -> f64 {
        0.0
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        a.min(b)
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn specialization(&self) -> Specialization {
        Specialization::Tropical
    }
}

/// Counting semiring `(+, ·, 0, 1)` — the classical ring.
/// Matrix powers count walks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingSemiring;

impl Semiring for CountingSemiring {
    fn name(&self) -> &str {
        "counting"
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn specialization(&self) -> Specialization {
        Specialization::Counting
    }
}

/// Probability semiring `(a+b−a·b, ·, 0, 1)` for independent events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbabilitySemiring;

impl Semiring for ProbabilitySemiring {
    fn name(&self) -> &str {
        "probability"
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        a + b - a * b
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn specialization(&self) -> Specialization {
        Specialization::Probability
    }
}

type BinaryOp = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// User-defined semiring built from closures. Always multiplied through the
/// generic kernel.
pub struct CustomSemiring {
    name: String,
    zero: f64,
    one: f64,
    add: BinaryOp,
    mul: BinaryOp,
}

impl CustomSemiring {
    pub fn new(
        name: impl Into<String>,
        zero: f64,
        one: f64,
        add: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
        mul: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            zero,
            one,
            add: Box::new(add),
            mul: Box::new(mul),
        }
    }
}

impl Semiring for CustomSemiring {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero(&self) -> f64 {
        self.zero
    }

    fn one(&self) -> f64 {
        self.one
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        (self.add)(a, b)
    }

    fn mul(&self, a: f64, b: f64) -> f64 {
        (self.mul)(a, b)
    }
}

impl fmt::Debug for CustomSemiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSemiring")
            .field("name", &self.name)
            .field("zero", &self.zero)
            .field("one", &self.one)
            .finish()
    }
}

/// Dense semiring matrix product with kernel dispatch.
///
/// Shapes must already be compatible; callers validate dimensions.
pub(crate) fn semiring_matmul(
    a: &Array2<f64>,
    b: &Array2<f64>,
    semiring: &dyn Semiring,
) -> Array2<f64> {
    match semiring.specialization() {
        Specialization::Boolean => boolean_matmul(a, b),
        Specialization::Tropical => tropical_matmul(a, b),
        // Plus-times is exactly the classical dot product
        Specialization::Counting => a.dot(b),
        Specialization::Probability | Specialization::Generic => generic_matmul(a, b, semiring),
    }
}

fn boolean_matmul(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (n, inner, m) = (a.nrows(), a.ncols(), b.ncols());
    let mut out = Array2::<f64>::zeros((n, m));
    for i in 0..n {
        for j in 0..m {
            for k in 0..inner {
                if a[[i, k]] != 0.0 && b[[k, j]] != 0.0 {
                    out[[i, j]] = 1.0;
                    break;
                }
            }
        }
    }
    out
}

fn tropical_matmul(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    let (n, inner, m) = (a.nrows(), a.ncols(), b.ncols());
    let mut out = Array2::<f64>::from_elem((n, m), f64::INFINITY);
    for i in 0..n {
        for j in 0..m {
            let mut best = f64::INFINITY;
            for k in 0..inner {
                let candidate = a[[i, k]] + b[[k, j]];
                if candidate < best {
                    best = candidate;
                }
            }
            out[[i, j]] = best;
        }
    }
    out
}

fn generic_matmul(a: &Array2<f64>, b: &Array2<f64>, semiring: &dyn Semiring) -> Array2<f64> {
    let (n, inner, m) = (a.nrows(), a.ncols(), b.ncols());
    let mut out = Array2::<f64>::from_elem((n, m), semiring.zero());
    for i in 0..n {
        for j in 0..m {
            let mut acc = semiring.zero();
            for k in 0..inner {
                acc = semiring.add(acc, semiring.mul(a[[i, k]], b[[k, j]]));
            }
            out[[i, j]] = acc;
        }
    }
    out
}
