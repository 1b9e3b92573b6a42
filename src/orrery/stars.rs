use super::math::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Background stars on a sphere that travels with the camera, so they can never be reached.
#[derive(Clone, Debug)]
pub struct StarField {
    offsets: Vec<Vec3>,
    size: f32,
}

impl StarField {
    pub fn generate(count: usize, render_distance: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let shell = render_distance * 0.8;

        let mut offsets = Vec::with_capacity(count);
        while offsets.len() < count {
            let candidate = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let len = candidate.norm();
            // Rejecting points outside the unit ball keeps directions uniform.
            if len > 1e-3 && len <= 1.0 {
                offsets.push(candidate / len * shell);
            }
        }

        StarField {
            offsets,
            size: render_distance * 0.0007,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn positions_around(&self, eye: Vec3) -> impl Iterator<Item = Vec3> + '_ {
        self.offsets.iter().map(move |offset| eye + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_sit_on_the_shell_around_the_eye() {
        let stars = StarField::generate(300, 1000.0, 7);
        assert_eq!(stars.len(), 300);
        let eye = Vec3::new(10.0, -4.0, 2.5);
        for p in stars.positions_around(eye) {
            assert!(((p - eye).norm() - 800.0).abs() < 1e-2);
        }
        assert!((stars.size() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_sky() {
        let a = StarField::generate(50, 500.0, 42);
        let b = StarField::generate(50, 500.0, 42);
        let origin = Vec3::zeros();
        assert!(a.positions_around(origin).eq(b.positions_around(origin)));
    }
}
