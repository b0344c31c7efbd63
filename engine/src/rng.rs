use rand::Rng;

/// Random source for the draw path.
///
/// Abstracting the source behind this trait keeps the draw core off the
/// process-global RNG: the gateway injects a thread-local source while tests
/// supply fixed sequences and assert exact tier/item selection.
pub trait DrawRng {
    /// A uniform draw over [0, 1).
    fn unit(&mut self) -> f64;

    /// A uniform index into a collection of length `len`. `len` must be > 0.
    fn pick(&mut self, len: usize) -> usize;
}

/// [`DrawRng`] backed by any `rand::Rng`, typically `thread_rng()` in the
/// gateway or a seeded `StdRng` in statistical tests.
pub struct StdDraw<R: Rng>(pub R);

impl<R: Rng> DrawRng for StdDraw<R> {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Deterministic RNG replaying fixed sequences, for tests.
///
/// `unit()` values are consumed from `units` in order; `pick(len)` values from
/// `picks`, reduced modulo `len`. Both wrap around when exhausted so a short
/// script can drive a long draw batch.
#[cfg(any(test, feature = "test-rng"))]
pub struct SequenceRng {
    units: Vec<f64>,
    picks: Vec<usize>,
    unit_at: usize,
    pick_at: usize,
}

#[cfg(any(test, feature = "test-rng"))]
impl SequenceRng {
    pub fn new(units: Vec<f64>, picks: Vec<usize>) -> Self {
        Self {
            units,
            picks,
            unit_at: 0,
            pick_at: 0,
        }
    }

    /// A source that always resolves the first tier and the first item.
    pub fn zeroes() -> Self {
        Self::new(vec![0.0], vec![0])
    }
}

#[cfg(any(test, feature = "test-rng"))]
impl DrawRng for SequenceRng {
    fn unit(&mut self) -> f64 {
        let value = self.units[self.unit_at % self.units.len()];
        self.unit_at += 1;
        value
    }

    fn pick(&mut self, len: usize) -> usize {
        let value = self.picks[self.pick_at % self.picks.len()];
        self.pick_at += 1;
        value % len
    }
}
