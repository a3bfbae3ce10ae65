use tracing::trace;

/// Pixel coordinate, `x` to the right and `y` down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Point on the way from `from` toward `to`, `fraction` of the distance along
/// each axis (truncated), never overshooting `to`.
pub fn interpolate_point(from: Point, to: Point, fraction: f64) -> Point {
    let step = |a: usize, b: usize| -> usize {
        let delta = (fraction * a.abs_diff(b) as f64) as usize;
        if a >= b {
            a.saturating_sub(delta).max(b)
        } else {
            (a + delta).min(b)
        }
    };
    Point::new(step(from.x, to.x), step(from.y, to.y))
}

/// Rectangle given by its centre and size, kept inside an image.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiRect {
    center: Point,
    width: usize,
    height: usize,
    image_width: usize,
    image_height: usize,
    top_left: Point,
    bottom_right: Point,
    dirty: bool,
}

impl RoiRect {
    pub fn new(image_width: usize, image_height: usize, center: Point, width: usize, height: usize) -> Self {
        Self {
            center,
            width,
            height,
            image_width,
            image_height,
            top_left: Point::default(),
            bottom_right: Point::default(),
            dirty: true,
        }
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
        self.dirty = true;
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when centre or size changed since the last [`RoiRect::update`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last computed (top-left, bottom-right) vertices.
    pub fn vertices(&self) -> (Point, Point) {
        (self.top_left, self.bottom_right)
    }

    /// Recomputes the vertices from centre and size.
    ///
    /// With `bounded`, a rectangle crossing the left or top edge is slid to start
    /// at 0 and one crossing the right or bottom edge is slid to end on the last
    /// pixel; the centre follows the slide. Without it the vertices are only
    /// clipped to `[0, size]` and the centre is left alone.
    pub fn update(&mut self, bounded: bool) -> (Point, Point) {
        let (x0, x1) = self.span_x(bounded);
        let (y0, y1) = self.span_y(bounded);
        self.top_left = Point::new(x0, y0);
        self.bottom_right = Point::new(x1, y1);
        self.dirty = false;
        trace!("roi update: {:?} -> {:?} {:?}", self.center, self.top_left, self.bottom_right);
        (self.top_left, self.bottom_right)
    }

    fn span_x(&mut self, bounded: bool) -> (usize, usize) {
        let (start, end, center) = clamp_span(self.center.x, self.width, self.image_width, bounded);
        self.center.x = center;
        (start, end)
    }

    fn span_y(&mut self, bounded: bool) -> (usize, usize) {
        let (start, end, center) = clamp_span(self.center.y, self.height, self.image_height, bounded);
        self.center.y = center;
        (start, end)
    }
}

/// One axis of [`RoiRect::update`]: returns (start, end, centre).
fn clamp_span(center: usize, size: usize, limit: usize, bounded: bool) -> (usize, usize, usize) {
    let half = (size / 2) as i64;
    let (center_i, size_i, limit_i) = (center as i64, size as i64, limit as i64);
    let (start, end) = (center_i - half, center_i + half);

    if !bounded {
        return (start.max(0) as usize, end.min(limit_i) as usize, center);
    }

    if start < 0 {
        (0, size, half as usize)
    } else if end > limit_i - 1 {
        ((limit_i - size_i).max(0) as usize, (limit_i - 1).max(0) as usize, (limit_i - half).max(0) as usize)
    } else {
        (start as usize, end as usize, center)
    }
}

/// Named ROI rectangles over one image, kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiSet {
    image_width: usize,
    image_height: usize,
    rois: Vec<(String, RoiRect)>,
}

/// Distance fraction for the diagonal ROIs of the shading layout.
const DIAGONAL_FRACTION: f64 = 0.65;
/// Distance fraction for the horizontal and vertical ROIs of the shading layout.
const AXIS_FRACTION: f64 = 0.85;
/// ROI side as a fraction of the image side.
const ROI_SIZE_DIVISOR: usize = 10;

impl RoiSet {
    pub fn new(image_width: usize, image_height: usize) -> Self {
        Self { image_width, image_height, rois: Vec::new() }
    }

    /// Standard lens shading layout: `C0` in the centre, `Q1`..`Q4` toward the
    /// corners, `Hr`/`Hl` toward the side edges and `Vt`/`Vb` toward the top and
    /// bottom edges, each a tenth of the image in size.
    pub fn shading_layout(image_width: usize, image_height: usize) -> Self {
        let mut set = Self::new(image_width, image_height);
        let (w, h) = (image_width, image_height);
        let size = ((w / ROI_SIZE_DIVISOR).max(1), (h / ROI_SIZE_DIVISOR).max(1));
        let center = Point::new(w / 2, h / 2);

        set.add("C0", center, size);

        let targets = [
            ("Q1", Point::new(w, 0), DIAGONAL_FRACTION),
            ("Q2", Point::new(0, 0), DIAGONAL_FRACTION),
            ("Q3", Point::new(0, h), DIAGONAL_FRACTION),
            ("Q4", Point::new(w, h), DIAGONAL_FRACTION),
            ("Hr", Point::new(w, h / 2), AXIS_FRACTION),
            ("Hl", Point::new(0, h / 2), AXIS_FRACTION),
            ("Vt", Point::new(w / 2, 0), AXIS_FRACTION),
            ("Vb", Point::new(w / 2, h), AXIS_FRACTION),
        ];
        for (name, target, fraction) in targets {
            set.add(name, interpolate_point(center, target, fraction), size);
        }
        set
    }

    pub fn image_size(&self) -> (usize, usize) {
        (self.image_width, self.image_height)
    }

    /// Adds `name`, or moves and resizes it if present, and returns its
    /// bounded vertices.
    pub fn add(&mut self, name: &str, center: Point, size: (usize, usize)) -> (Point, Point) {
        let index = match self.rois.iter().position(|(n, _)| n == name) {
            Some(index) => {
                let rect = &mut self.rois[index].1;
                rect.set_center(center);
                rect.set_size(size.0, size.1);
                index
            }
            None => {
                let rect = RoiRect::new(self.image_width, self.image_height, center, size.0, size.1);
                self.rois.push((name.to_string(), rect));
                self.rois.len() - 1
            }
        };
        let rect = &mut self.rois[index].1;
        rect.update(true)
    }

    pub fn remove(&mut self, name: &str) -> Option<RoiRect> {
        let index = self.rois.iter().position(|(n, _)| n == name)?;
        Some(self.rois.remove(index).1)
    }

    /// Moves `name`; returns false if it does not exist. Takes effect on the next update.
    pub fn set_center(&mut self, name: &str, center: Point) -> bool {
        self.get_mut(name).map(|rect| rect.set_center(center)).is_some()
    }

    /// Resizes `name`; returns false if it does not exist. Takes effect on the next update.
    pub fn set_size(&mut self, name: &str, width: usize, height: usize) -> bool {
        self.get_mut(name).map(|rect| rect.set_size(width, height)).is_some()
    }

    pub fn update_all(&mut self) {
        for (_, rect) in &mut self.rois {
            rect.update(true);
        }
    }

    pub fn get(&self, name: &str) -> Option<&RoiRect> {
        self.rois.iter().find(|(n, _)| n == name).map(|(_, rect)| rect)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut RoiRect> {
        self.rois.iter_mut().find(|(n, _)| n == name).map(|(_, rect)| rect)
    }

    pub fn vertices(&self, name: &str) -> Option<(Point, Point)> {
        self.get(name).map(RoiRect::vertices)
    }

    pub fn all_vertices(&self) -> Vec<(&str, Point, Point)> {
        self.rois
            .iter()
            .map(|(name, rect)| {
                let (top_left, bottom_right) = rect.vertices();
                (name.as_str(), top_left, bottom_right)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoiRect)> {
        self.rois.iter().map(|(name, rect)| (name.as_str(), rect))
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }
}
