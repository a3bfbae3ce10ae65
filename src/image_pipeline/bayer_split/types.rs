//! Types produced by Bayer plane extraction

use crate::image_pipeline::raw::types::FilterColor;

/// Position of a sample inside each 2x2 Bayer tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TilePosition {
    /// Tile reading order: (even,even), (even,odd), (odd,even), (odd,odd).
    pub const ALL: [TilePosition; 4] = [
        TilePosition::TopLeft,
        TilePosition::TopRight,
        TilePosition::BottomLeft,
        TilePosition::BottomRight,
    ];

    /// (row, column) parity of this position.
    pub fn offset(self) -> (usize, usize) {
        match self {
            TilePosition::TopLeft => (0, 0),
            TilePosition::TopRight => (0, 1),
            TilePosition::BottomLeft => (1, 0),
            TilePosition::BottomRight => (1, 1),
        }
    }
}

/// One half-resolution colour plane of a Bayer frame
#[derive(Debug, Clone, PartialEq)]
pub struct BayerPlane {
    /// Physical filter colour of every sample in the plane
    pub color: FilterColor,
    /// Tile position the samples were taken from
    pub position: TilePosition,
    /// Width of the plane (half the even-aligned frame width)
    pub width: usize,
    /// Height of the plane (half the even-aligned frame height)
    pub height: usize,
    /// Row-major samples scaled to 8 bits
    pub samples: Vec<u8>,
    /// Mean of the samples before bit-depth reduction
    pub mean: f64,
}

impl BayerPlane {
    pub fn sample(&self, row: usize, col: usize) -> u8 {
        self.samples[row * self.width + col]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.samples.chunks_exact(self.width)
    }
}

/// All four planes of a frame, stored in tile order.
#[derive(Debug, Clone, PartialEq)]
pub struct BayerPlanes {
    planes: [BayerPlane; 4],
    /// Tile index of each colour, indexed by `FilterColor::index`
    color_slots: [usize; 4],
}

impl BayerPlanes {
    /// Bundles four planes taken in tile order; their colours must be distinct.
    pub(crate) fn from_tiles(planes: [BayerPlane; 4]) -> Self {
        let mut color_slots = [0usize; 4];
        for (slot, plane) in planes.iter().enumerate() {
            color_slots[plane.color.index()] = slot;
        }
        Self { planes, color_slots }
    }

    pub fn top_left(&self) -> &BayerPlane {
        &self.planes[0]
    }

    pub fn top_right(&self) -> &BayerPlane {
        &self.planes[1]
    }

    pub fn bottom_left(&self) -> &BayerPlane {
        &self.planes[2]
    }

    pub fn bottom_right(&self) -> &BayerPlane {
        &self.planes[3]
    }

    pub fn at(&self, position: TilePosition) -> &BayerPlane {
        &self.planes[position as usize]
    }

    /// The plane carrying `color`; every phase yields exactly one plane per colour.
    pub fn by_color(&self, color: FilterColor) -> &BayerPlane {
        &self.planes[self.color_slots[color.index()]]
    }

    /// Pre-normalisation means in R, Gr, Gb, B order.
    pub fn means(&self) -> [f64; 4] {
        FilterColor::ALL.map(|color| self.by_color(color).mean)
    }

    /// Planes in R, Gr, Gb, B order.
    pub fn in_color_order(&self) -> [&BayerPlane; 4] {
        FilterColor::ALL.map(|color| self.by_color(color))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BayerPlane> {
        self.planes.iter()
    }

    pub fn into_tiles(self) -> [BayerPlane; 4] {
        self.planes
    }

    /// (width, height) shared by all four planes.
    pub fn plane_size(&self) -> (usize, usize) {
        (self.planes[0].width, self.planes[0].height)
    }
}
