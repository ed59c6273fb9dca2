//! TSP instance: an ordered vertex set and its cost matrix.

use serde::{Deserialize, Serialize};

use super::Vertex;
use crate::distance::DistanceMatrix;
use crate::error::{Result, TspError};

/// Smallest vertex count that admits a Hamiltonian cycle.
pub const MIN_VERTICES: usize = 3;

/// An ordered sequence of vertices with the costs derived from them.
///
/// Read-only once built. Construction accepts any size; [`validate`]
/// is where undersized or ill-formed instances are rejected, and every
/// solve entry point calls it before touching the LP backend.
///
/// [`validate`]: Instance::validate
///
/// # Examples
///
/// ```
/// use u_tsp_exact::models::{Instance, Vertex};
///
/// let instance = Instance::new(vec![
///     Vertex::new(0.0, 0.0),
///     Vertex::new(1.0, 0.0),
///     Vertex::new(1.0, 1.0),
///     Vertex::new(0.0, 1.0),
/// ]);
/// assert_eq!(instance.len(), 4);
/// assert!(instance.validate().is_ok());
/// assert!((instance.distance(0, 2) - 2f64.sqrt()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    vertices: Vec<Vertex>,
    distances: DistanceMatrix,
}

impl Instance {
    /// Builds an instance with Euclidean costs.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let distances = DistanceMatrix::from_vertices(&vertices);
        Self {
            vertices,
            distances,
        }
    }

    /// Builds an instance whose costs come from a caller-supplied metric.
    pub fn with_metric<F>(vertices: Vec<Vertex>, metric: F) -> Self
    where
        F: Fn(&Vertex, &Vertex) -> f64,
    {
        let distances = DistanceMatrix::from_metric(&vertices, metric);
        Self {
            vertices,
            distances,
        }
    }

    /// Builds an instance from explicit costs.
    ///
    /// Fails if the matrix size does not match the vertex count.
    pub fn from_matrix(vertices: Vec<Vertex>, distances: DistanceMatrix) -> Result<Self> {
        if distances.size() != vertices.len() {
            return Err(TspError::MalformedInstance(format!(
                "distance matrix covers {} vertices, instance has {}",
                distances.size(),
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            distances,
        })
    }

    /// Builds an instance from raw `(x, y)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().copied().map(Vertex::from).collect())
    }

    /// Checks that a tour can exist and that every cost is usable.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        if n < MIN_VERTICES {
            return Err(TspError::MalformedInstance(format!(
                "need at least {MIN_VERTICES} vertices to form a cycle, got {n}"
            )));
        }
        if !self.distances.is_well_formed() || self.distances.size() != n {
            return Err(TspError::MalformedInstance(format!(
                "distance matrix does not describe {n} vertices"
            )));
        }
        if let Some(idx) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(TspError::MalformedInstance(format!(
                "vertex {idx} has non-finite coordinates"
            )));
        }
        if let Some((i, j, d)) = self.distances.find_invalid_entry() {
            return Err(TspError::MalformedInstance(format!(
                "cost ({i}, {j}) = {d} is not a finite non-negative number"
            )));
        }
        Ok(())
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the instance has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Cost of the directed edge `from → to`.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DIAGONAL_SENTINEL;

    fn unit_square() -> Instance {
        Instance::from_points(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn test_instance_distances() {
        let inst = unit_square();
        assert_eq!(inst.len(), 4);
        assert!((inst.distance(0, 1) - 1.0).abs() < 1e-10);
        assert!((inst.distance(1, 3) - 2f64.sqrt()).abs() < 1e-10);
        assert_eq!(inst.distance(3, 3), DIAGONAL_SENTINEL);
        assert!(inst.distances().is_symmetric(1e-12));
    }

    #[test]
    fn test_validate_ok() {
        assert!(unit_square().validate().is_ok());
    }

    #[test]
    fn test_validate_too_small() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            inst.validate(),
            Err(TspError::MalformedInstance(_))
        ));
        assert!(Instance::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_validate_non_finite_vertex() {
        let inst = Instance::from_points(&[(0.0, 0.0), (1.0, f64::NAN), (2.0, 0.0)]);
        assert!(matches!(
            inst.validate(),
            Err(TspError::MalformedInstance(_))
        ));
    }

    #[test]
    fn test_with_metric() {
        let inst = Instance::with_metric(unit_square().vertices().to_vec(), |a, b| {
            (a.x() - b.x()).abs() + (a.y() - b.y()).abs()
        });
        assert!((inst.distance(0, 2) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_from_matrix_size_mismatch() {
        let dm = DistanceMatrix::new(3);
        let result = Instance::from_matrix(unit_square().vertices().to_vec(), dm);
        assert!(matches!(result, Err(TspError::MalformedInstance(_))));
    }

    #[test]
    fn test_from_matrix_rejects_negative_cost() {
        let mut dm = DistanceMatrix::new(3);
        for i in 0..3 {
            for j in 0..3 {
                dm.set(i, j, 1.0);
            }
        }
        dm.set(0, 2, -4.0);
        let vertices = vec![Vertex::new(0.0, 0.0); 3];
        let inst = Instance::from_matrix(vertices, dm).expect("sizes match");
        assert!(inst.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_deserialized_shape_mismatch() {
        let json = r#"{
            "vertices": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}, {"x": 0.0, "y": 1.0}],
            "distances": {"data": [0.0, 1.0, 1.0, 0.0], "size": 2}
        }"#;
        let inst: Instance = serde_json::from_str(json).expect("valid json");
        assert!(matches!(inst.validate(), Err(TspError::MalformedInstance(_))));
    }
}
