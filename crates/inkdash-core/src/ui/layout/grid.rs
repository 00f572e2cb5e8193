//! Block-grid arithmetic: grid resolution, placements and pixel rectangles
//!
//! The dashboard is divided into a coarse `blocks_x × blocks_y` grid. Widgets
//! are placed in block coordinates (1-indexed) and their pixel rectangles are
//! always derived from the current surface size, never stored as the source
//! of truth.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Rectangle};
use heapless::Vec;

use crate::config::{GRID_BLOCKS_X, GRID_BLOCKS_Y};

/// Largest number of blocks along either axis
pub const MAX_GRID_BLOCKS: u16 = 16;

/// Interior separator lines of a maximal grid, both axes together
pub const MAX_GRID_LINES: usize = 2 * (MAX_GRID_BLOCKS as usize - 1);

/// Logical grid resolution. Each side is between 1 and [`MAX_GRID_BLOCKS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    blocks_x: u16,
    blocks_y: u16,
}

impl Grid {
    /// Create a grid, clamping each side into `1..=MAX_GRID_BLOCKS`.
    pub fn new(blocks_x: u16, blocks_y: u16) -> Self {
        Self {
            blocks_x: blocks_x.clamp(1, MAX_GRID_BLOCKS),
            blocks_y: blocks_y.clamp(1, MAX_GRID_BLOCKS),
        }
    }

    pub fn blocks_x(&self) -> u16 {
        self.blocks_x
    }

    pub fn blocks_y(&self) -> u16 {
        self.blocks_y
    }

    /// Width and height of one block for the given surface size
    pub fn block_size(&self, surface_w: u32, surface_h: u32) -> (f32, f32) {
        (
            surface_w as f32 / self.blocks_x as f32,
            surface_h as f32 / self.blocks_y as f32,
        )
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_BLOCKS_X, GRID_BLOCKS_Y)
    }
}

/// A widget's rectangle in block coordinates, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub col: u16,
    pub row: u16,
    pub width_blocks: u16,
    pub height_blocks: u16,
}

impl Placement {
    pub const fn new(col: u16, row: u16, width_blocks: u16, height_blocks: u16) -> Self {
        Self {
            col,
            row,
            width_blocks,
            height_blocks,
        }
    }

    /// Clamp this placement into the grid.
    ///
    /// The origin is pulled into `1..=blocks` and the span is limited so the
    /// placement never runs past the last block. Never fails; clamping a
    /// valid placement returns it unchanged.
    pub fn clamped(self, grid: Grid) -> Self {
        let col = self.col.clamp(1, grid.blocks_x);
        let row = self.row.clamp(1, grid.blocks_y);
        let width_blocks = self.width_blocks.clamp(1, grid.blocks_x - col + 1);
        let height_blocks = self.height_blocks.clamp(1, grid.blocks_y - row + 1);

        Self {
            col,
            row,
            width_blocks,
            height_blocks,
        }
    }
}

/// Pixel rectangle derived from a placement.
///
/// Width and height may be zero or negative when the surface is smaller than
/// the padding requires; that is a valid "nothing to draw" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rectangle has no drawable area
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        !self.is_degenerate()
            && point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.w
            && point.y < self.y + self.h
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Convert to an embedded-graphics rectangle, `None` when degenerate
    pub fn to_rectangle(&self) -> Option<Rectangle> {
        if self.is_degenerate() {
            None
        } else {
            Some(Rectangle::new(
                self.top_left(),
                Size::new(self.w as u32, self.h as u32),
            ))
        }
    }
}

/// Map a grid placement to a pixel rectangle.
///
/// Block sizes are real-valued; each coordinate is truncated to a whole
/// pixel only at the end. The function is total: degenerate results are
/// returned as computed.
pub fn cell_to_rect(
    surface_w: u32,
    surface_h: u32,
    grid: Grid,
    placement: Placement,
    padding_px: i32,
) -> PixelRect {
    let (block_w, block_h) = grid.block_size(surface_w, surface_h);
    let pad = padding_px as f32;

    PixelRect {
        x: ((placement.col as f32 - 1.0) * block_w + pad) as i32,
        y: ((placement.row as f32 - 1.0) * block_h + pad) as i32,
        w: (placement.width_blocks as f32 * block_w - 2.0 * pad) as i32,
        h: (placement.height_blocks as f32 * block_h - 2.0 * pad) as i32,
    }
}

/// Interior separator lines of the debug overlay.
///
/// Vertical lines come first, then horizontal ones. Each spans the full
/// surface along its axis.
pub fn grid_lines(surface_w: u32, surface_h: u32, grid: Grid) -> Vec<Line, MAX_GRID_LINES> {
    let (block_w, block_h) = grid.block_size(surface_w, surface_h);
    // Sized for a maximal grid; pushes cannot overflow
    let mut lines = Vec::new();

    for i in 1..grid.blocks_x {
        let x = (i as f32 * block_w) as i32;
        lines
            .push(Line::new(Point::new(x, 0), Point::new(x, surface_h as i32)))
            .ok();
    }
    for j in 1..grid.blocks_y {
        let y = (j as f32 * block_h) as i32;
        lines
            .push(Line::new(Point::new(0, y), Point::new(surface_w as i32, y)))
            .ok();
    }

    lines
}
