use crate::project::RenderParams;
use crate::rasterize::BasicAsciiRasterizer;
use crate::read::{load_mesh, LoadError};
use crate::render::render_frame;
use crate::shade::{default_light_direction, shade, ShadeError, ShadedPoints};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Marker trait used for managing valid state of UI
pub trait StateMarker {}

#[derive(Default, Debug, Clone, Copy)]
pub struct RenderState;

#[derive(Default, Debug, Clone, Copy)]
pub struct HelpState;

impl StateMarker for RenderState {}
impl StateMarker for HelpState {}

#[derive(Default, Debug, Clone, Copy)]
pub struct App<S: StateMarker> {
    pub should_quit: bool,

    state: std::marker::PhantomData<S>,
}

impl From<App<HelpState>> for App<RenderState> {
    fn from(value: App<HelpState>) -> Self {
        Self {
            should_quit: value.should_quit,
            state: std::marker::PhantomData::<RenderState>,
        }
    }
}

impl From<App<RenderState>> for App<HelpState> {
    fn from(value: App<RenderState>) -> Self {
        Self {
            should_quit: value.should_quit,
            state: std::marker::PhantomData::<HelpState>,
        }
    }
}

/// Rotation axes the viewer exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

const ZOOM_MIN_PERCENT: f32 = 1.0;
const ZOOM_MAX_PERCENT: f32 = 400.0;
/// Projector scale at 100% zoom
const ZOOM_SCALE_FACTOR: f32 = 1.5;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Shade(#[from] ShadeError),
}

/// Everything one open mesh needs for interactive viewing: the shaded
/// points cached at load time, the current rotation and zoom, and the last
/// frame that rendered successfully.
pub struct ViewerSession {
    shaded: ShadedPoints,
    rasterizer: BasicAsciiRasterizer,
    rot_x: f32,
    rot_y: f32,
    rot_z: f32,
    zoom: f32,
    cols: usize,
    rows: usize,
    frame: String,
    loaded: String,
}

impl ViewerSession {
    /// Load a mesh and shade it once under the default light.
    /// The shaded points are reused for every frame of the session.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ViewerSession, SessionError> {
        let mesh = load_mesh(&path)?;
        let shaded = shade(&mesh, default_light_direction())?;
        let loaded = format!(
            "{} | {} triangles",
            path.as_ref().display(),
            mesh.len()
        );
        Ok(ViewerSession {
            shaded,
            rasterizer: BasicAsciiRasterizer::default(),
            rot_x: 0.0,
            rot_y: 0.0,
            rot_z: 0.0,
            zoom: 100.0,
            cols: 0,
            rows: 0,
            frame: String::new(),
            loaded,
        })
    }

    /// Current frame parameters, converted into what the projector expects
    pub fn params(&self) -> RenderParams {
        RenderParams {
            rx: self.rot_x.to_radians(),
            ry: self.rot_y.to_radians(),
            rz: self.rot_z.to_radians(),
            scale: self.zoom / 100.0 * ZOOM_SCALE_FACTOR,
        }
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        let angle = match axis {
            Axis::X => &mut self.rot_x,
            Axis::Y => &mut self.rot_y,
            Axis::Z => &mut self.rot_z,
        };
        *angle = wrap_degrees(*angle + degrees);
        self.redraw();
    }

    pub fn zoom_by(&mut self, percent: f32) {
        self.set_zoom(self.zoom + percent);
    }

    pub fn set_zoom(&mut self, percent: f32) {
        self.zoom = percent.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT);
        self.redraw();
    }

    pub fn reset_view(&mut self) {
        self.rot_x = 0.0;
        self.rot_y = 0.0;
        self.rot_z = 0.0;
        self.zoom = 100.0;
        self.redraw();
    }

    /// Change the viewport and rerender at the new size
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.redraw();
    }

    pub fn render_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} | rx {:+.0} ry {:+.0} rz {:+.0} | zoom {:.0}% | Press ? for help.",
            self.loaded, self.rot_x, self.rot_y, self.rot_z, self.zoom
        )
    }

    /// Rerun the pipeline with the current parameters.
    /// A failed render keeps the previous frame on screen.
    fn redraw(&mut self) {
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        match render_frame(
            &self.shaded,
            &self.params(),
            self.cols,
            self.rows,
            &self.rasterizer,
        ) {
            Ok(frame) => self.frame = frame,
            Err(e) => warn!("render failed, keeping previous frame: {e}"),
        }
    }
}

/// Keep angles in the -180..180 range
fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_STL: &str = "./data/tetrahedron.stl";

    #[test]
    fn wrap_degrees_stays_in_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
    }

    #[test]
    fn open_caches_three_points_per_triangle() {
        let session = ViewerSession::open(TEST_STL).unwrap();
        assert_eq!(session.shaded.len(), 12);
    }

    #[test]
    fn zoom_is_clamped_to_its_bounds() {
        let mut session = ViewerSession::open(TEST_STL).unwrap();
        session.zoom_by(10_000.0);
        assert_eq!(session.params().scale, ZOOM_MAX_PERCENT / 100.0 * ZOOM_SCALE_FACTOR);
        session.set_zoom(-50.0);
        assert_eq!(session.params().scale, ZOOM_MIN_PERCENT / 100.0 * ZOOM_SCALE_FACTOR);
    }

    #[test]
    fn rotation_wraps_instead_of_accumulating() {
        let mut session = ViewerSession::open(TEST_STL).unwrap();
        for _ in 0..13 {
            session.rotate(Axis::Y, 15.0);
        }
        assert_eq!(session.params().ry, (-165.0f32).to_radians());
    }

    #[test]
    fn resize_renders_a_frame_of_the_right_shape() {
        let mut session = ViewerSession::open(TEST_STL).unwrap();
        session.resize(24, 8);
        let lines: Vec<&str> = session.frame().split('\n').collect();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|line| line.chars().count() == 24));
    }

    #[test]
    fn parameter_changes_before_first_resize_leave_no_frame() {
        let mut session = ViewerSession::open(TEST_STL).unwrap();
        session.rotate(Axis::X, 15.0);
        assert!(session.frame().is_empty());
    }
}
