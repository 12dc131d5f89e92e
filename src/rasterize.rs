use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RasterizerError {
    #[error("glyph gradient must not be empty")]
    EmptyGradient,
    #[error("cannot rasterize an empty point set")]
    EmptyPointSet,
    #[error("{points} points do not match {brightness} brightness values")]
    MismatchedBrightness { points: usize, brightness: usize },
}

/// Simple rasterizer that assigns one ASCII character per cell intensity.
/// The gradient runs dark to light; the background fills untouched cells
/// and sits outside the gradient index space.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicAsciiRasterizer {
    gradient: Vec<char>,
    background: char,
}

impl BasicAsciiRasterizer {
    pub fn new(gradient: Vec<char>, background: char) -> Result<BasicAsciiRasterizer, RasterizerError> {
        if gradient.is_empty() {
            return Err(RasterizerError::EmptyGradient);
        }
        Ok(BasicAsciiRasterizer {
            gradient,
            background,
        })
    }

    pub fn bg_char(&self) -> char {
        self.background
    }

    /// Glyph for a resolved cell brightness in [0, 1]
    fn brightness_to_char(&self, value: f32) -> char {
        let scaled = value * (self.gradient.len() - 1) as f32;
        let index = (scaled as usize).min(self.gradient.len() - 1);
        self.gradient[index]
    }

    /// Bin projected points into a `rows` x `cols` glyph grid.
    ///
    /// Where several points land in one cell the brightest wins, standing in
    /// for true depth-based occlusion. The output is `rows` lines of exactly
    /// `cols` characters joined by newlines, ready for a fixed-width widget.
    pub fn rasterize(
        &self,
        points: &[Vector3<f32>],
        brightness: &[f32],
        cols: usize,
        rows: usize,
    ) -> Result<String, RasterizerError> {
        if points.is_empty() {
            return Err(RasterizerError::EmptyPointSet);
        }
        if points.len() != brightness.len() {
            return Err(RasterizerError::MismatchedBrightness {
                points: points.len(),
                brightness: brightness.len(),
            });
        }
        let x_bins = AxisBins::over(points, 0, cols);
        let y_bins = AxisBins::over(points, 1, rows);
        let mut canvas = Canvas::new(cols, rows);
        for (point, &value) in points.iter().zip(brightness) {
            canvas.plot(x_bins.bin(point.x), y_bins.bin(point.y), value);
        }
        Ok(canvas.to_text(self))
    }
}

impl Default for BasicAsciiRasterizer {
    fn default() -> Self {
        let gradient = vec!['@', '%', '#', '*', '+', '=', '-', ':', '.'];
        let background = ' ';
        BasicAsciiRasterizer::new(gradient, background).unwrap()
    }
}

/// Per-render brightness grid. Cells hold the brightest value written so
/// far, so they only ever brighten as points are added.
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: usize,
    cells: Vec<Option<f32>>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize) -> Canvas {
        Canvas {
            cols,
            cells: vec![None; cols * rows],
        }
    }

    /// Record a point's brightness in its cell, keeping the maximum
    pub fn plot(&mut self, ix: usize, iy: usize, value: f32) {
        let cell = &mut self.cells[iy * self.cols + ix];
        match cell {
            Some(previous) if *previous >= value => {}
            _ => *cell = Some(value),
        }
    }

    fn to_text(&self, rasterizer: &BasicAsciiRasterizer) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.cells.len() / self.cols);
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for cell in row {
                out.push(match cell {
                    Some(value) => rasterizer.brightness_to_char(*value),
                    None => rasterizer.bg_char(),
                });
            }
        }
        out
    }
}

/// Mapping from one projected axis onto `bins` cells.
/// A zero-range axis collapses every point into bin 0, which keeps the
/// binning total instead of dividing by zero.
struct AxisBins {
    min: f32,
    range: f32,
    bins: usize,
}

impl AxisBins {
    fn over(points: &[Vector3<f32>], axis: usize, bins: usize) -> AxisBins {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for p in points {
            min = min.min(p[axis]);
            max = max.max(p[axis]);
        }
        AxisBins {
            min,
            range: max - min,
            bins,
        }
    }

    fn bin(&self, value: f32) -> usize {
        if self.range <= 0.0 {
            return 0;
        }
        let scaled = (value - self.min) / self.range * (self.bins - 1) as f32;
        (scaled as usize).min(self.bins - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> Vector3<f32> {
        Vector3::new(x, y, 0.0)
    }

    #[test]
    fn empty_gradient_is_rejected() {
        let rasterizer = BasicAsciiRasterizer::new(vec![], ' ');
        assert_eq!(rasterizer, Err(RasterizerError::EmptyGradient));
    }

    #[test]
    fn gradient_ends_map_to_darkest_and_lightest_glyphs() {
        let rasterizer = BasicAsciiRasterizer::default();
        let grid = rasterizer
            .rasterize(&[point(0.0, 0.0), point(9.0, 0.0)], &[0.0, 1.0], 10, 1)
            .unwrap();
        assert!(grid.starts_with('@'));
        assert!(grid.ends_with('.'));
    }

    #[test]
    fn empty_point_set_is_rejected() {
        let rasterizer = BasicAsciiRasterizer::default();
        let result = rasterizer.rasterize(&[], &[], 10, 10);
        assert_eq!(result, Err(RasterizerError::EmptyPointSet));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let rasterizer = BasicAsciiRasterizer::default();
        let result = rasterizer.rasterize(&[point(0.0, 0.0)], &[0.5, 0.5], 10, 10);
        assert_eq!(
            result,
            Err(RasterizerError::MismatchedBrightness {
                points: 1,
                brightness: 2,
            })
        );
    }

    #[test]
    fn grid_has_exact_dimensions() {
        let rasterizer = BasicAsciiRasterizer::default();
        let grid = rasterizer
            .rasterize(
                &[point(0.0, 0.0), point(1.0, 1.0)],
                &[0.5, 0.5],
                12,
                5,
            )
            .unwrap();
        let lines: Vec<&str> = grid.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.chars().count() == 12));
    }

    #[test]
    fn single_point_fills_exactly_one_cell() {
        let rasterizer = BasicAsciiRasterizer::default();
        let grid = rasterizer
            .rasterize(&[point(3.0, 4.0)], &[1.0], 8, 6)
            .unwrap();
        let filled = grid.chars().filter(|&c| c != ' ' && c != '\n').count();
        assert_eq!(filled, 1);
        // Degenerate bounding box on both axes puts it in the first cell
        assert_eq!(grid.chars().next(), Some('.'));
    }

    #[test]
    fn collinear_points_collapse_into_one_column() {
        let rasterizer = BasicAsciiRasterizer::default();
        let points = vec![point(2.0, 0.0), point(2.0, 1.0), point(2.0, 2.0)];
        let grid = rasterizer
            .rasterize(&points, &[0.0, 0.0, 0.0], 6, 3)
            .unwrap();
        for line in grid.split('\n') {
            assert_eq!(line.chars().next(), Some('@'));
            assert!(line.chars().skip(1).all(|c| c == ' '));
        }
    }

    #[test]
    fn brightest_point_wins_regardless_of_order() {
        let rasterizer = BasicAsciiRasterizer::default();
        let points = [point(0.0, 0.0), point(0.0, 0.0)];
        let dim_first = rasterizer.rasterize(&points, &[0.3, 0.8], 1, 1).unwrap();
        let bright_first = rasterizer.rasterize(&points, &[0.8, 0.3], 1, 1).unwrap();
        assert_eq!(dim_first, bright_first);
        // 0.8 over a 9-glyph gradient resolves to index 6
        assert_eq!(dim_first, "-");
    }

    #[test]
    fn one_by_one_grid_collapses_everything_into_one_cell() {
        let rasterizer = BasicAsciiRasterizer::default();
        let points = vec![point(0.0, 0.0), point(5.0, 3.0), point(-2.0, 7.0)];
        let grid = rasterizer
            .rasterize(&points, &[0.1, 0.9, 0.4], 1, 1)
            .unwrap();
        // Resolved brightness is the maximum over all inputs: 0.9 -> index 7
        assert_eq!(grid.chars().count(), 1);
        assert_eq!(grid, ":");
    }

    #[test]
    fn untouched_cells_use_the_background() {
        let gradient = vec!['o'];
        let rasterizer = BasicAsciiRasterizer::new(gradient, '~').unwrap();
        let grid = rasterizer
            .rasterize(&[point(0.0, 0.0), point(2.0, 2.0)], &[1.0, 1.0], 3, 3)
            .unwrap();
        assert_eq!(grid, "o~~\n~~~\n~~o");
    }
}
