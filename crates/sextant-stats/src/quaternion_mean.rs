use glam::{DQuat, DVec4};

/// Running weighted mean of orientations.
///
/// Quaternions are averaged component-wise after aligning their sign with the
/// current mean, since `q` and `-q` describe the same rotation. This is a good
/// approximation as long as the averaged rotations lie close to each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedQuaternionMean {
    weight: f64,
    sum: DVec4,
}

impl WeightedQuaternionMean {
    /// Create an empty mean.
    pub fn new() -> Self {
        Self {
            weight: 0.0,
            sum: DVec4::ZERO,
        }
    }

    /// Add a rotation with the given weight. Non-positive weights are ignored.
    pub fn add(&mut self, q: DQuat, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        let mut v = DVec4::from(q);
        if self.weight > 0.0 && self.sum.dot(v) < 0.0 {
            v = -v;
        }
        self.sum += v * weight;
        self.weight += weight;
    }

    /// Total weight added so far.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The mean rotation, identity if nothing was added.
    pub fn mean(&self) -> DQuat {
        if self.weight == 0.0 {
            return DQuat::IDENTITY;
        }
        let v = self.sum / self.weight;
        if v.length_squared() == 0.0 {
            return DQuat::IDENTITY;
        }
        DQuat::from_vec4(v.normalize())
    }
}

impl Default for WeightedQuaternionMean {
    fn default() -> Self {
        Self::new()
    }
}
