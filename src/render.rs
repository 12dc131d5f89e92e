use crate::project::{project, ProjectError, RenderParams};
use crate::rasterize::{BasicAsciiRasterizer, RasterizerError};
use crate::shade::ShadedPoints;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Rasterize(#[from] RasterizerError),
}

/// Run one frame through the whole pipeline: project the cached shaded
/// points, then rasterize them into a `cols` x `rows` glyph grid.
///
/// Pure and synchronous. Repeated calls with identical inputs produce
/// byte-identical frames, and nothing is shared between calls, so the
/// caller is free to serialize or discard frames however it likes.
pub fn render_frame(
    shaded: &ShadedPoints,
    params: &RenderParams,
    cols: usize,
    rows: usize,
    rasterizer: &BasicAsciiRasterizer,
) -> Result<String, RenderError> {
    let projected = project(&shaded.points, cols, rows, params)?;
    let frame = rasterizer.rasterize(&projected, &shaded.brightness, cols, rows)?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shade::shade;
    use crate::surface::{SimpleMesh, Triangle};
    use nalgebra::Vector3;

    fn flat_triangle_mesh() -> SimpleMesh {
        SimpleMesh::new(vec![Triangle::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        )])
    }

    fn non_background_cells(frame: &str) -> Vec<char> {
        frame.chars().filter(|&c| c != ' ' && c != '\n').collect()
    }

    #[test]
    fn lit_triangle_renders_three_brightest_glyphs() {
        let shaded = shade(&flat_triangle_mesh(), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let frame = render_frame(
            &shaded,
            &RenderParams::default(),
            10,
            10,
            &BasicAsciiRasterizer::default(),
        )
        .unwrap();
        assert_eq!(non_background_cells(&frame), vec!['.', '.', '.']);
    }

    #[test]
    fn unlit_triangle_renders_three_darkest_glyphs() {
        let shaded = shade(&flat_triangle_mesh(), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let frame = render_frame(
            &shaded,
            &RenderParams::default(),
            10,
            10,
            &BasicAsciiRasterizer::default(),
        )
        .unwrap();
        assert_eq!(non_background_cells(&frame), vec!['@', '@', '@']);
    }

    #[test]
    fn identical_inputs_give_byte_identical_frames() {
        let shaded = shade(&flat_triangle_mesh(), Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let params = RenderParams {
            rx: 0.4,
            ry: -1.2,
            rz: 2.0,
            scale: 1.3,
        };
        let rasterizer = BasicAsciiRasterizer::default();
        let first = render_frame(&shaded, &params, 30, 15, &rasterizer).unwrap();
        let second = render_frame(&shaded, &params, 30, 15, &rasterizer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_shading_fails_instead_of_rendering_garbage() {
        let shaded = shade(&SimpleMesh::default(), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let result = render_frame(
            &shaded,
            &RenderParams::default(),
            10,
            10,
            &BasicAsciiRasterizer::default(),
        );
        assert_eq!(result, Err(RenderError::Project(ProjectError::EmptyPointSet)));
    }
}
