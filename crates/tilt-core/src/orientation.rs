use glam::Vec3;

/// Direction pair handed to the renderer for the main object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub axis: Vec3,
    pub up: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            axis: Vec3::X,
            up: Vec3::Y,
        }
    }
}

/// Map pitch/roll in degrees to the object's length axis and up direction.
///
/// Both vectors are unit length and perpendicular for every input, but this is
/// the device's own model rather than a rotation: with roll at 0, pitch moves
/// `up` and leaves `axis` on X.
pub fn orient(pitch_deg: f32, roll_deg: f32) -> Orientation {
    let (sin_p, cos_p) = pitch_deg.to_radians().sin_cos();
    let (sin_r, cos_r) = roll_deg.to_radians().sin_cos();
    Orientation {
        axis: Vec3::new(cos_r, sin_r * cos_p, sin_r * sin_p),
        up: Vec3::new(-sin_r, cos_r * cos_p, cos_r * sin_p),
    }
}
