/// A scattering intensity profile I(q).
#[derive(Clone, Debug, Default)]
pub struct ScatteringProfile {
    q: Vec<f64>,
    intensity: Vec<f64>,
}

impl ScatteringProfile {
    pub fn new(q: Vec<f64>, intensity: Vec<f64>) -> ScatteringProfile {
        assert_eq!(q.len(), intensity.len(), "q and intensity lengths must match");
        ScatteringProfile { q, intensity }
    }

    pub fn q(&self) -> &[f64] {
        &self.q
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Linear interpolation of this profile onto a new q grid.
    ///
    /// Points outside the profile's range are clamped to the end values.
    pub fn interpolate(&self, q_new: &[f64]) -> Vec<f64> {
        q_new.iter().map(|&q| self.interpolate_one(q)).collect()
    }

    fn interpolate_one(&self, q: f64) -> f64 {
        if self.q.is_empty() {
            return 0.0;
        }
        if q <= self.q[0] {
            return self.intensity[0];
        }
        if q >= *self.q.last().unwrap() {
            return *self.intensity.last().unwrap();
        }
        let hi = self.q.partition_point(|&x| x < q);
        let lo = hi - 1;
        let t = (q - self.q[lo]) / (self.q[hi] - self.q[lo]);
        return self.intensity[lo] + t * (self.intensity[hi] - self.intensity[lo]);
    }
}
