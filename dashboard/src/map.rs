use crate::palette::color_for;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Theme,
};
use trackcore::geo::Position;
use trackcore::{BoardEntry, Destination};

/// Equirectangular fit of a set of positions into a pixel box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_lat: f64,
    min_lon: f64,
    scale: f64,
    lon_factor: f64,
    offset_x: f32,
    offset_y: f32,
    height: f32,
}

impl Projection {
    const PADDING: f32 = 24.0;
    const MIN_SPAN_DEG: f64 = 0.01;

    pub fn fit<'a>(positions: impl IntoIterator<Item = &'a Position>, width: f32, height: f32) -> Self {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        for position in positions {
            min_lat = min_lat.min(position.latitude);
            max_lat = max_lat.max(position.latitude);
            min_lon = min_lon.min(position.longitude);
            max_lon = max_lon.max(position.longitude);
        }
        if !min_lat.is_finite() || !min_lon.is_finite() {
            min_lat = 0.0;
            max_lat = 0.0;
            min_lon = 0.0;
            max_lon = 0.0;
        }

        let mid_lat = (min_lat + max_lat) / 2.0;
        let lon_factor = mid_lat.to_radians().cos().max(1e-6);
        let lat_span = (max_lat - min_lat).max(Self::MIN_SPAN_DEG);
        let lon_span = ((max_lon - min_lon) * lon_factor).max(Self::MIN_SPAN_DEG);
        // Center degenerate spans on the single point.
        let min_lat = (min_lat + max_lat) / 2.0 - lat_span / 2.0;
        let min_lon = (min_lon + max_lon) / 2.0 - lon_span / lon_factor / 2.0;

        let usable_w = (width - 2.0 * Self::PADDING).max(1.0) as f64;
        let usable_h = (height - 2.0 * Self::PADDING).max(1.0) as f64;
        let scale = (usable_w / lon_span).min(usable_h / lat_span);

        Self {
            min_lat,
            min_lon,
            scale,
            lon_factor,
            offset_x: Self::PADDING + ((usable_w - lon_span * scale) / 2.0) as f32,
            offset_y: Self::PADDING + ((usable_h - lat_span * scale) / 2.0) as f32,
            height,
        }
    }

    pub fn project(&self, position: &Position) -> Point {
        let x = (position.longitude - self.min_lon) * self.lon_factor * self.scale;
        let y = (position.latitude - self.min_lat) * self.scale;
        Point::new(
            self.offset_x + x as f32,
            self.height - (self.offset_y + y as f32),
        )
    }
}

/// Canvas program drawing visible paths, last positions and the finish.
#[derive(Clone)]
pub struct TrackMap {
    entries: Vec<BoardEntry>,
    destination: Destination,
}

impl TrackMap {
    pub fn new<'a>(entries: impl IntoIterator<Item = &'a BoardEntry>, destination: &Destination) -> Self {
        Self {
            entries: entries.into_iter().cloned().collect(),
            destination: destination.clone(),
        }
    }
}

impl<Message> canvas::Program<Message> for TrackMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.06, 0.08),
        );

        let projection = Projection::fit(
            self.entries
                .iter()
                .flat_map(|entry| entry.path.iter())
                .chain(std::iter::once(&self.destination.position)),
            bounds.width,
            bounds.height,
        );

        let finish = projection.project(&self.destination.position);
        let ring = Path::new(|builder| builder.circle(finish, 9.0));
        frame.stroke(
            &ring,
            Stroke::default()
                .with_width(2.0)
                .with_color(Color::from_rgb(0.95, 0.95, 0.95)),
        );
        let cross = Path::new(|builder| {
            builder.move_to(Point::new(finish.x - 5.0, finish.y));
            builder.line_to(Point::new(finish.x + 5.0, finish.y));
            builder.move_to(Point::new(finish.x, finish.y - 5.0));
            builder.line_to(Point::new(finish.x, finish.y + 5.0));
        });
        frame.stroke(
            &cross,
            Stroke::default().with_color(Color::from_rgb(0.95, 0.95, 0.95)),
        );

        for entry in &self.entries {
            let color = color_for(&entry.color_seed);

            if entry.path.len() > 1 {
                let trail = Path::new(|builder| {
                    for (i, position) in entry.path.iter().enumerate() {
                        let point = projection.project(position);
                        if i == 0 {
                            builder.move_to(point);
                        } else {
                            builder.line_to(point);
                        }
                    }
                });
                frame.stroke(&trail, Stroke::default().with_width(2.5).with_color(color));
            }

            let head = projection.project(&entry.latest.position);
            let marker = Path::new(|builder| builder.circle(head, 6.0));
            frame.fill(&marker, color);
            frame.fill_text(canvas::Text {
                content: entry.display_label.clone(),
                position: Point::new(head.x + 8.0, head.y + 4.0),
                color,
                size: Pixels(13.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_keeps_points_inside_padding() {
        let points = [Position::new(51.0, 5.0), Position::new(52.0, 7.0)];
        let projection = Projection::fit(points.iter(), 400.0, 300.0);
        for position in &points {
            let p = projection.project(position);
            assert!(p.x >= Projection::PADDING - 0.01 && p.x <= 400.0 - Projection::PADDING + 0.01);
            assert!(p.y >= Projection::PADDING - 0.01 && p.y <= 300.0 - Projection::PADDING + 0.01);
        }
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let points = [Position::new(51.0, 5.0), Position::new(52.0, 7.0)];
        let projection = Projection::fit(points.iter(), 400.0, 300.0);
        let south_west = projection.project(&points[0]);
        let north_east = projection.project(&points[1]);
        assert!(north_east.x > south_west.x);
        assert!(north_east.y < south_west.y);
    }

    #[test]
    fn single_point_lands_in_center() {
        let points = [Position::new(51.4, 5.4)];
        let projection = Projection::fit(points.iter(), 200.0, 200.0);
        let p = projection.project(&points[0]);
        assert!((p.x - 100.0).abs() < 0.5, "x {}", p.x);
        assert!((p.y - 100.0).abs() < 0.5, "y {}", p.y);
    }

    #[test]
    fn empty_input_does_not_produce_nan() {
        let projection = Projection::fit(std::iter::empty(), 200.0, 200.0);
        let p = projection.project(&Position::new(0.0, 0.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}
