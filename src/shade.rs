use crate::surface::SimpleMesh;
use nalgebra::{Unit, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ShadeError {
    #[error("light direction has zero magnitude and cannot be normalized")]
    InvalidLightDirection,
}

/// Default light direction, shining in from the (1, 1, 1) octant.
/// Normalized inside [`shade`] like any caller-supplied light.
pub fn default_light_direction() -> Vector3<f32> {
    Vector3::new(1.0, 1.0, 1.0)
}

/// Flat point list with one brightness value per point, parallel and in
/// facet order. Built once per loaded mesh and reused for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedPoints {
    pub points: Vec<Vector3<f32>>,
    pub brightness: Vec<f32>,
}

impl ShadedPoints {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Shade a mesh under a single directional light.
///
/// Each facet contributes its three vertices in order, all carrying the same
/// brightness: the dot of the face normal with the unit light direction,
/// clamped to [0, 1]. Facets facing away from the light come out fully dark
/// rather than being culled.
pub fn shade(
    mesh: &SimpleMesh,
    light_direction: Vector3<f32>,
) -> Result<ShadedPoints, ShadeError> {
    let light = Unit::try_new(light_direction, f32::EPSILON)
        .ok_or(ShadeError::InvalidLightDirection)?;
    let mut points = Vec::with_capacity(3 * mesh.len());
    let mut brightness = Vec::with_capacity(3 * mesh.len());
    for tri in &mesh.triangles {
        let value = tri.normal.dot(&light).clamp(0.0, 1.0);
        points.extend(tri.vertices());
        brightness.extend([value; 3]);
    }
    Ok(ShadedPoints { points, brightness })
}
