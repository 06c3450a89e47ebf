//! Render-facing view of the visualization.
//!
//! The scheduler writes [`SceneState`] once per frame; frontends read it and
//! the flattened [`DrawInstance`] list without touching effects internals.

use crate::constants::*;
use crate::orientation::Orientation;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectStyle {
    pub position: Vec3,
    pub orientation: Orientation,
    pub color: Vec3,
    pub opacity: f32,
    pub outline_opacity: f32,
}

impl Default for ObjectStyle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Orientation::default(),
            color: orange(),
            opacity: OBJECT_OPACITY,
            outline_opacity: OUTLINE_OPACITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub object: ObjectStyle,
    pub ground_color: Vec3,
    pub axis_colors: [Vec3; 3],
    pub info_text: String,
    pub status_text: String,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            object: ObjectStyle::default(),
            ground_color: Vec3::splat(GROUND_GRAY),
            axis_colors: AXIS_COLORS.map(Vec3::from),
            info_text: "🔄 Waiting for data...".to_string(),
            status_text: "Mode: Normal | Movement: 0.0° | Particles: 0".to_string(),
        }
    }
}

/// One billboard for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawInstance {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub opacity: f32,
}

// Footprint sampling of the main object and static scenery.
const BOX_SAMPLES_LONG: i32 = 8; // per half-length
const BOX_SAMPLES_WIDE: i32 = 2; // per half-width
const AXIS_LENGTH: f32 = 2.0;
const AXIS_DOTS: i32 = 10;
const GROUND_Y: f32 = -2.0;
const GROUND_HALF_EXTENT: i32 = 4;
const GROUND_OPACITY: f32 = 0.3;

impl SceneState {
    /// Billboards for the ground, world axes and the oriented main object.
    pub fn push_static(&self, out: &mut Vec<DrawInstance>) {
        for ix in -GROUND_HALF_EXTENT..=GROUND_HALF_EXTENT {
            for iz in -GROUND_HALF_EXTENT..=GROUND_HALF_EXTENT {
                out.push(DrawInstance {
                    position: Vec3::new(ix as f32, GROUND_Y, iz as f32),
                    radius: 0.04,
                    color: self.ground_color,
                    opacity: GROUND_OPACITY,
                });
            }
        }

        for (dir, color) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().zip(self.axis_colors) {
            for i in 1..=AXIS_DOTS {
                out.push(DrawInstance {
                    position: dir * (AXIS_LENGTH * i as f32 / AXIS_DOTS as f32),
                    radius: 0.025,
                    color,
                    opacity: 1.0,
                });
            }
        }

        let obj = &self.object;
        let Orientation { axis, up } = obj.orientation;
        let side = axis.cross(up).normalize_or_zero();
        let half_len = BOX_LENGTH * 0.5;
        let half_wide = BOX_WIDTH * 0.5;
        for i in -BOX_SAMPLES_LONG..=BOX_SAMPLES_LONG {
            for j in -BOX_SAMPLES_WIDE..=BOX_SAMPLES_WIDE {
                let along = axis * (half_len * i as f32 / BOX_SAMPLES_LONG as f32);
                let across = side * (half_wide * j as f32 / BOX_SAMPLES_WIDE as f32);
                let edge = i.abs() == BOX_SAMPLES_LONG || j.abs() == BOX_SAMPLES_WIDE;
                out.push(DrawInstance {
                    position: obj.position + along + across,
                    radius: BOX_HEIGHT * 0.5,
                    color: if edge { Vec3::ONE } else { obj.color },
                    opacity: if edge {
                        obj.outline_opacity
                    } else {
                        obj.opacity
                    },
                });
            }
        }
        // short stalk showing the up direction
        out.push(DrawInstance {
            position: obj.position + up * BOX_HEIGHT,
            radius: BOX_HEIGHT * 0.4,
            color: obj.color,
            opacity: obj.opacity,
        });
    }
}
