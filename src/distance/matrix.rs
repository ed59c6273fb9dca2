//! Dense cost matrix with a forbidden diagonal.

use serde::{Deserialize, Serialize};

use crate::models::Vertex;

/// Cost placed on every `(i, i)` entry so self-loops never pay off in a
/// minimizing objective.
pub const DIAGONAL_SENTINEL: f64 = 99_999.0;

/// A dense n×n cost matrix stored in row-major order.
///
/// Off-diagonal entries are travel costs; diagonal entries hold
/// [`DIAGONAL_SENTINEL`].
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::Vertex;
/// use u_tsp_exact::distance::{DistanceMatrix, DIAGONAL_SENTINEL};
///
/// let vertices = vec![
///     Vertex::new(0.0, 0.0),
///     Vertex::new(3.0, 4.0),
///     Vertex::new(6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_vertices(&vertices);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.get(2, 2), DIAGONAL_SENTINEL);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size with zero off-diagonal costs.
    pub fn new(size: usize) -> Self {
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            data[i * size + i] = DIAGONAL_SENTINEL;
        }
        Self { data, size }
    }

    /// Computes a Euclidean cost matrix from vertex coordinates.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        Self::from_metric(vertices, Vertex::distance_to)
    }

    /// Computes a cost matrix by applying `metric` to every unordered pair.
    ///
    /// The metric is evaluated once per pair and mirrored, so the result is
    /// symmetric even if `metric` is not.
    pub fn from_metric<F>(vertices: &[Vertex], metric: F) -> Self
    where
        F: Fn(&Vertex, &Vertex) -> f64,
    {
        let n = vertices.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric(&vertices[i], &vertices[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a cost matrix from an explicit n×n grid.
    ///
    /// The diagonal of `data` is overwritten with [`DIAGONAL_SENTINEL`].
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, mut data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        for i in 0..size {
            data[i * size + i] = DIAGONAL_SENTINEL;
        }
        Some(Self { data, size })
    }

    /// Returns the cost of travelling from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from `from` to `to`. Writes to the diagonal are ignored.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        if from != to {
            self.data[from * self.size + to] = distance;
        }
    }

    /// Number of vertices covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns `true` if the backing storage holds exactly `size * size` costs.
    ///
    /// Always true for matrices built through the constructors; a
    /// deserialized matrix may not be.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.size * self.size
    }

    /// Returns the first off-diagonal entry that is negative or not finite.
    pub fn find_invalid_entry(&self) -> Option<(usize, usize, f64)> {
        for i in 0..self.size {
            for j in 0..self.size {
                let d = self.get(i, j);
                if i != j && !(d.is_finite() && d >= 0.0) {
                    return Some((i, j, d));
                }
            }
        }
        None
    }

    /// Returns the nearest candidate to `from`, the first one winning ties.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in candidates {
            let d = self.get(from, c);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((c, d)),
            }
        }
        best.map(|(c, _)| c)
    }
}
