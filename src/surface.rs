use nalgebra::Vector3;
use tobj::Mesh;

/// One mesh facet: three vertex positions and the face normal.
#[derive(PartialEq, Debug, Clone)]
pub struct Triangle {
    pub v1: Vector3<f32>,
    pub v2: Vector3<f32>,
    pub v3: Vector3<f32>,
    pub normal: Vector3<f32>,
}

impl Triangle {
    pub fn new(
        v1: Vector3<f32>,
        v2: Vector3<f32>,
        v3: Vector3<f32>,
        normal: Vector3<f32>,
    ) -> Triangle {
        Triangle { v1, v2, v3, normal }
    }

    /// Build a triangle whose normal comes from the vertex winding
    pub fn from_vertices(v1: Vector3<f32>, v2: Vector3<f32>, v3: Vector3<f32>) -> Triangle {
        let normal = Triangle::winding_normal(&v1, &v2, &v3);
        Triangle { v1, v2, v3, normal }
    }

    /// Unit normal of the plane spanned by the vertices, following the
    /// right-hand rule. Zero-area triangles get a zero normal, which later
    /// shades to fully dark instead of producing NaN.
    pub fn winding_normal(
        v1: &Vector3<f32>,
        v2: &Vector3<f32>,
        v3: &Vector3<f32>,
    ) -> Vector3<f32> {
        // Two triangle edges
        let u1 = v2 - v1;
        let u2 = v3 - v1;
        u1.cross(&u2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn vertices(&self) -> [Vector3<f32>; 3] {
        [self.v1, self.v2, self.v3]
    }
}

/// Triangle soup in the order the file listed the facets.
/// No shared-vertex topology is kept.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SimpleMesh {
    pub triangles: Vec<Triangle>,
}

impl SimpleMesh {
    pub fn new(triangles: Vec<Triangle>) -> SimpleMesh {
        SimpleMesh { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

pub trait ToSimpleMesh {
    fn to_simple_mesh(&self) -> SimpleMesh;
}

impl ToSimpleMesh for Mesh {
    fn to_simple_mesh(&self) -> SimpleMesh {
        let mut triangles = Vec::with_capacity(self.indices.len() / 3);
        for face in self.indices.chunks_exact(3) {
            // OBJ normals are per-vertex, so the face normal is always
            // recomputed from the winding
            triangles.push(Triangle::from_vertices(
                position(self, face[0]),
                position(self, face[1]),
                position(self, face[2]),
            ));
        }
        SimpleMesh::new(triangles)
    }
}

fn position(mesh: &Mesh, index: u32) -> Vector3<f32> {
    let i = index as usize * 3;
    Vector3::new(
        mesh.positions[i],
        mesh.positions[i + 1],
        mesh.positions[i + 2],
    )
}
