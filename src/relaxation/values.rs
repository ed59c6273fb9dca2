//! Dense view of the edge-variable values of a relaxation.

/// Values of `x[i][j]` in an n×n row-major grid; the diagonal is 0.
///
/// # Examples
///
/// ```
/// use u_tsp_exact::relaxation::EdgeValues;
///
/// let mut values = EdgeValues::zeros(3);
/// values.set(0, 1, 1.0);
/// values.set(1, 2, 0.9999999);
/// values.set(2, 0, 1.0);
/// assert!(values.is_integral(1e-6));
/// values.set(2, 0, 0.5);
/// assert!(!values.is_integral(1e-6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeValues {
    size: usize,
    data: Vec<f64>,
}

impl EdgeValues {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Builds values from a 0/1 successor list: `x[i][succ[i]] = 1`.
    pub fn from_successors(successors: &[usize]) -> Self {
        let mut values = Self::zeros(successors.len());
        for (i, &j) in successors.iter().enumerate() {
            values.set(i, j, 1.0);
        }
        values
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        if from != to {
            self.data[from * self.size + to] = value;
        }
    }

    /// Returns `true` if every entry is within `epsilon` of 0 or 1.
    pub fn is_integral(&self, epsilon: f64) -> bool {
        self.data.iter().all(|&v| is_near_binary(v, epsilon))
    }

    /// Off-diagonal entries in row-major `(i, j)` order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.size;
        (0..n)
            .flat_map(move |i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j)
            .map(move |(i, j)| (i, j, self.get(i, j)))
    }

    /// `Σ cost(i, j) · x[i][j]` over off-diagonal entries.
    pub fn weighted_sum<F>(&self, cost: F) -> f64
    where
        F: Fn(usize, usize) -> f64,
    {
        self.iter().map(|(i, j, v)| cost(i, j) * v).sum()
    }
}

/// Returns `true` if `value` is within `epsilon` of 0 or of 1.
#[inline]
pub fn is_near_binary(value: f64, epsilon: f64) -> bool {
    value.abs() <= epsilon || (value - 1.0).abs() <= epsilon
}
