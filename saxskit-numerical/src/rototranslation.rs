use crate::{Matrix3x3, Vec3};

/// Rigid-body transformation: a rotation about an origin followed by a translation.
///
/// A [`Rototranslation`] is applied to atom positions when a body is moved
/// during rigid-body fitting, and when symmetry copies of a body are
/// generated.
///
/// # Example
/// ```
/// use saxskit_numerical::{Rototranslation, Vec3};
/// use std::f64::consts::PI;
/// // rotate a point half a turn around the z axis through the origin
/// let rt = Rototranslation::around_axis(
///     &Vec3::from_float(0.0), &Vec3::new(0.0, 0.0, 1.0), PI);
/// let p = rt.apply(&Vec3::new(1.0, 0.0, 0.0));
/// assert!(p.distance_to(&Vec3::new(-1.0, 0.0, 0.0)) < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rototranslation {
    origin: Vec3,
    rotation: Matrix3x3,
    translation: Vec3,
}

impl Default for Rototranslation {
    /// Default rototranslation does not change anything.
    fn default() -> Self {
        Rototranslation {
            origin: Vec3::from_float(0.0),
            rotation: Matrix3x3::identity(),
            translation: Vec3::from_float(0.0),
        }
    }
}

impl Rototranslation {
    /// Creates a pure translation
    pub fn translation(shift: Vec3) -> Rototranslation {
        Rototranslation { translation: shift, ..Default::default() }
    }

    /// Creates a transformation that rotates 3D points around a given axis through `origin`.
    ///
    /// The rotation matrix is computed using the
    /// [Rodrigues' rotation formula](https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula).
    ///
    /// # Arguments
    /// * `origin` - rotation center
    /// * `axis` - direction of the rotation axis; doesn't have to be normalized
    /// * `angle_rad` - angle of rotation in radians
    pub fn around_axis(origin: &Vec3, axis: &Vec3, angle_rad: f64) -> Rototranslation {
        let mut u = *axis;
        u.normalize();
        let cos_theta = angle_rad.cos();
        let sin_theta = angle_rad.sin();

        let mut u_dot = Matrix3x3::outer(&u, &u);
        let mut u_cross = Matrix3x3::from_array([
            0.0, -u.z, u.y,
            u.z, 0.0, -u.x,
            -u.y, u.x, 0.0,
        ]);

        let mut rot = Matrix3x3::identity();
        rot *= cos_theta;
        u_cross *= sin_theta;
        u_dot *= 1.0 - cos_theta;
        rot += &u_cross;
        rot += &u_dot;

        return Rototranslation {
            origin: *origin,
            rotation: rot,
            translation: Vec3::from_float(0.0),
        };
    }

    /// Creates a rotation about an axis combined with a translation.
    ///
    /// The rotation is applied first, the translation second.
    pub fn new(origin: &Vec3, axis: &Vec3, angle_rad: f64, shift: Vec3) -> Rototranslation {
        let mut rt = Rototranslation::around_axis(origin, axis, angle_rad);
        rt.translation = shift;
        return rt;
    }

    /// Returns the rotation matrix of this transformation
    pub fn rotation_matrix(&self) -> &Matrix3x3 {
        &self.rotation
    }

    /// Returns the translation vector of this transformation
    pub fn translation_vector(&self) -> &Vec3 {
        &self.translation
    }

    /// Returns a transformed copy of a given vector
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        let mut v = *v;
        self.apply_mut(&mut v);
        return v;
    }

    /// Applies this rototranslation to a given vector in place
    pub fn apply_mut(&self, v: &mut Vec3) {
        *v -= &self.origin;
        self.rotation.mul_vec_mut(v);
        *v += &self.origin;
        *v += &self.translation;
    }

    /// Applies the inverse of this rototranslation to a given vector in place
    pub fn apply_inverse_mut(&self, v: &mut Vec3) {
        let mut rot_t = self.rotation;
        rot_t.transpose();
        *v -= &self.translation;
        *v -= &self.origin;
        rot_t.mul_vec_mut(v);
        *v += &self.origin;
    }
}
