//! Vector outline of the notch silhouette.
//!
//! Paths are built in a view-local space with the origin at the top-left corner and y
//! growing downward. Surfaces that use a bottom-left origin need [`NotchPath::flipped`]
//! before the path can be installed as a mask.

use crate::platform::{Bounds, Position};

/// Bottom radii above this get a top radius of `bottom_radius - 5`.
const TOP_RADIUS_THRESHOLD: f64 = 15.0;
const TOP_RADIUS_INSET: f64 = 5.0;
const MIN_TOP_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    MoveTo(Position),
    LineTo(Position),
    QuadTo { control: Position, to: Position },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotchPath {
    elements: Vec<PathElement>,
}

/// Radius of the inward bevels where the notch meets the top edge.
pub fn top_radius(bottom_radius: f64) -> f64 {
    if bottom_radius > TOP_RADIUS_THRESHOLD {
        bottom_radius - TOP_RADIUS_INSET
    } else {
        MIN_TOP_RADIUS
    }
}

/// Builds the closed notch outline for a `width` x `height` shape.
///
/// Small sizes relative to the radii produce a self-intersecting contour; that is left
/// to the rasterizer.
pub fn build_notch_path(width: f64, height: f64, bottom_radius: f64) -> NotchPath {
    let top = top_radius(bottom_radius);
    let p = Position::new;

    let mut path = NotchPath::default();
    path.move_to(p(0.0, 0.0));

    // Top left bevel
    path.quad_to(p(top, 0.0), p(top, top));
    path.line_to(p(top, height - bottom_radius));

    // Bottom left corner
    path.quad_to(p(top, height), p(top + bottom_radius, height));
    path.line_to(p(width - top - bottom_radius, height));

    // Bottom right corner
    path.quad_to(p(width - top, height), p(width - top, height - bottom_radius));
    path.line_to(p(width - top, top));

    // Top right bevel
    path.quad_to(p(width - top, 0.0), p(width, 0.0));
    path.close();

    path
}

impl NotchPath {
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    fn move_to(&mut self, to: Position) {
        self.elements.push(PathElement::MoveTo(to));
    }

    fn line_to(&mut self, to: Position) {
        self.elements.push(PathElement::LineTo(to));
    }

    fn quad_to(&mut self, control: Position, to: Position) {
        self.elements.push(PathElement::QuadTo { control, to });
    }

    fn close(&mut self) {
        self.elements.push(PathElement::Close);
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.elements.last(), Some(PathElement::Close))
    }

    /// Every point of the path, control points included.
    pub fn points(&self) -> impl Iterator<Item = Position> + '_ {
        self.elements.iter().flat_map(|element| match *element {
            PathElement::MoveTo(to) | PathElement::LineTo(to) => vec![to],
            PathElement::QuadTo { control, to } => vec![control, to],
            PathElement::Close => vec![],
        })
    }

    /// Smallest rectangle enclosing every point and control point.
    pub fn bounding_box(&self) -> Option<Bounds> {
        let mut points = self.points();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for point in points {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        Some(Bounds::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Maps every point through `f`. Returns `None` if any mapped coordinate is not
    /// finite.
    pub fn transformed<F>(&self, f: F) -> Option<NotchPath>
    where
        F: Fn(Position) -> Position,
    {
        let map = |point: Position| {
            let mapped = f(point);
            (mapped.x.is_finite() && mapped.y.is_finite()).then_some(mapped)
        };

        let elements = self
            .elements
            .iter()
            .map(|element| {
                Some(match *element {
                    PathElement::MoveTo(to) => PathElement::MoveTo(map(to)?),
                    PathElement::LineTo(to) => PathElement::LineTo(map(to)?),
                    PathElement::QuadTo { control, to } => PathElement::QuadTo {
                        control: map(control)?,
                        to: map(to)?,
                    },
                    PathElement::Close => PathElement::Close,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(NotchPath { elements })
    }

    /// Converts from the top-left origin to a bottom-left origin surface of the given
    /// height: `(x, y) -> (x, height - y)`.
    pub fn flipped(&self, height: f64) -> Option<NotchPath> {
        self.transformed(|point| Position::new(point.x, height - point.y))
    }
}
