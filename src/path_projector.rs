use tiny_skia::{Color, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::journey_vector::JourneyVector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub rgba: [u8; 4],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 3.0,
            rgba: [255, 0, 0, 255],
        }
    }
}

impl StrokeStyle {
    fn paint(&self) -> Paint<'static> {
        let [r, g, b, a] = self.rgba;
        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(r, g, b, a));
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        }
    }
}

/// Pixel polyline of a single segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPath {
    pub points: Vec<(f32, f32)>,
}

impl ProjectedPath {
    /// `None` when there is nothing to stroke (a single point).
    pub fn to_path(&self) -> Option<Path> {
        let mut points = self.points.iter();
        let &(x, y) = points.next()?;
        let mut pb = PathBuilder::new();
        pb.move_to(x, y);
        for &(x, y) in points {
            pb.line_to(x, y);
        }
        pb.finish()
    }
}

/// One path per non-empty segment, in journey order. Segments are never
/// joined to each other.
pub fn projected_paths<F>(journey: &JourneyVector, coordinate_to_pixel: F) -> Vec<ProjectedPath>
where
    F: Fn(f64, f64) -> (f32, f32),
{
    journey
        .track_segments()
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| ProjectedPath {
            points: segment
                .track_points()
                .iter()
                .map(|p| coordinate_to_pixel(p.latitude, p.longitude))
                .collect(),
        })
        .collect()
}

/// Draws every segment of `journey` on top of a copy of `base`.
pub fn project<F>(
    journey: &JourneyVector,
    base: &Pixmap,
    coordinate_to_pixel: F,
    style: &StrokeStyle,
) -> Pixmap
where
    F: Fn(f64, f64) -> (f32, f32),
{
    let mut pixmap = base.clone();
    let paths = projected_paths(journey, coordinate_to_pixel);
    if paths.is_empty() {
        return pixmap;
    }

    let paint = style.paint();
    let stroke = style.stroke();
    for path in paths.iter().filter_map(ProjectedPath::to_path) {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
    pixmap
}
