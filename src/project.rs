use nalgebra::{Rotation3, Vector3};
use thiserror::Error;

/// Fraction of the viewport the silhouette may fill; the rest is margin
const VIEWPORT_FILL: f32 = 0.9;
/// Span guard for degenerate (flat or single-point) clouds
const SPAN_EPSILON: f32 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectError {
    #[error("cannot project an empty point set")]
    EmptyPointSet,
}

/// Rotation and zoom for one frame, decoupled from any particular UI.
/// The shell owns the current values and passes them in on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Rotation about the x axis in radians
    pub rx: f32,
    /// Rotation about the y axis in radians
    pub ry: f32,
    /// Rotation about the z axis in radians
    pub rz: f32,
    /// Uniform scale applied after rotation, must be positive
    pub scale: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
            scale: 1.0,
        }
    }
}

impl RenderParams {
    /// Combined rotation, x axis first, then y, then z
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_euler_angles(self.rx, self.ry, self.rz)
    }
}

/// Rotate, scale and center the cloud, then flatten it orthographically
/// into `width` x `height` cell space.
///
/// x and y are normalized by the larger of the two axis ranges so the
/// silhouette keeps its aspect ratio and never touches the viewport edges.
/// z stays as the rotated depth, untouched by scaling and centering, so a
/// depth-based occlusion rule can consume it later.
pub fn project(
    points: &[Vector3<f32>],
    width: usize,
    height: usize,
    params: &RenderParams,
) -> Result<Vec<Vector3<f32>>, ProjectError> {
    if points.is_empty() {
        return Err(ProjectError::EmptyPointSet);
    }
    let rotation = params.rotation();
    let mut projected: Vec<Vector3<f32>> = points.iter().map(|p| rotation * p).collect();

    let centroid = projected
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p)
        / projected.len() as f32;
    for p in projected.iter_mut() {
        p.x = (p.x - centroid.x) * params.scale;
        p.y = (p.y - centroid.y) * params.scale;
    }

    let span = axis_range(&projected, 0)
        .max(axis_range(&projected, 1))
        .max(SPAN_EPSILON);
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;
    for p in projected.iter_mut() {
        p.x = p.x / span * (half_width * VIEWPORT_FILL) + half_width;
        p.y = p.y / span * (half_height * VIEWPORT_FILL) + half_height;
    }
    Ok(projected)
}

fn axis_range(points: &[Vector3<f32>], axis: usize) -> f32 {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for p in points {
        min = min.min(p[axis]);
        max = max.max(p[axis]);
    }
    max - min
}
