//! Axis-aligned bounds for actions and observations

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-dimension closed interval `[low[i], high[i]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl BoxSpace {
    /// Bounds must have equal length and `low <= high` in each dimension
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        debug_assert!(low.iter().zip(&high).all(|(l, h)| l <= h));
        Self { low, high }
    }

    /// `dims`-dimensional box spanning `[-half, half]` in every dimension
    pub fn symmetric(dims: usize, half: f32) -> Self {
        Self::new(vec![-half; dims], vec![half; dims])
    }

    /// A 2D observation space covering a room centered on the origin
    pub fn observation(room: Vec2) -> Self {
        let half = room / 2.0;
        Self::new(vec![-half.x, -half.y], vec![half.x, half.y])
    }

    /// One 2D position per action object, each within the room
    pub fn actions(room: Vec2, count: usize) -> Self {
        let half = room / 2.0;
        let (low, high) = (0..count)
            .flat_map(|_| [(-half.x, half.x), (-half.y, half.y)])
            .unzip();
        Self::new(low, high)
    }

    pub fn dims(&self) -> usize {
        self.low.len()
    }

    /// Uniform sample from the box
    pub fn sample(&self, rng: &mut impl Rng) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&lo, &hi)| if lo < hi { rng.random_range(lo..=hi) } else { lo })
            .collect()
    }

    /// Sample as 2D points (pairs of consecutive dimensions)
    pub fn sample_points(&self, rng: &mut impl Rng) -> Vec<Vec2> {
        self.sample(rng)
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect()
    }

    pub fn contains(&self, value: &[f32]) -> bool {
        value.len() == self.dims()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| (lo..=hi).contains(&v))
    }

    /// Whether consecutive 2D points lie in the box
    pub fn contains_points(&self, points: &[Vec2]) -> bool {
        let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        self.contains(&flat)
    }
}
