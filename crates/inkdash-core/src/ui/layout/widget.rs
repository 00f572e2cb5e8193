//! Managed-widget contract shared by every placed widget
//!
//! A [`ManagedWidget`] owns one [`Placement`] and the rectangle most recently
//! applied by the layout surface. It does not own the surface. Widget kinds
//! that need extra layout behavior pick a [`LayoutRule`], which runs after the
//! shared block arithmetic instead of overriding it.

use super::grid::{Grid, PixelRect, Placement};
use crate::ui::core::WidgetId;

/// How a rectangle is being attached to the render target.
///
/// The first application places the widget absolutely; later ones (resizes)
/// move it without redefining parent/child relationships. Geometry is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// First placement at registration
    Put,
    /// Repositioning after a resize
    Move,
}

/// Additional layout rule evaluated after the base resize computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRule {
    /// Base block arithmetic only
    None,
    /// Re-flow wrapped text at the widget's block width minus an inset
    WrapText { inset_px: i32 },
}

/// Layout state owned by every dashboard widget.
#[derive(Debug, Clone)]
pub struct ManagedWidget {
    id: WidgetId,
    placement: Placement,
    grid: Grid,
    rule: LayoutRule,
    rect: PixelRect,
    content_size: (i32, i32),
    wrap_width: Option<i32>,
    attached: Option<AttachMode>,
}

impl ManagedWidget {
    /// Create the layout state for a widget at `{col, row, width, height}` on
    /// a `blocks_x × blocks_y` grid.
    pub fn new(
        col: u16,
        row: u16,
        width_blocks: u16,
        height_blocks: u16,
        blocks_x: u16,
        blocks_y: u16,
    ) -> Self {
        Self {
            id: WidgetId(0),
            placement: Placement::new(col, row, width_blocks, height_blocks),
            grid: Grid::new(blocks_x, blocks_y),
            rule: LayoutRule::None,
            rect: PixelRect::default(),
            content_size: (0, 0),
            wrap_width: None,
            attached: None,
        }
    }

    /// Set the layout rule applied after the base computation
    pub fn with_rule(mut self, rule: LayoutRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn rule(&self) -> LayoutRule {
        self.rule
    }

    /// Rectangle most recently applied by the surface
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Child size computed by [`resize`](Self::resize) at the last allocation
    pub fn content_size(&self) -> (i32, i32) {
        self.content_size
    }

    /// Current wrap width when the rule is [`LayoutRule::WrapText`]
    pub fn wrap_width(&self) -> Option<i32> {
        self.wrap_width
    }

    /// How the last rectangle was attached, `None` before registration
    pub fn attached(&self) -> Option<AttachMode> {
        self.attached
    }

    /// Child size for a given parent size.
    ///
    /// `width_blocks * (parent_w / blocks_x)` by
    /// `height_blocks * (parent_h / blocks_y)`, truncated to whole pixels.
    pub fn resize(&self, parent_w: i32, parent_h: i32) -> (i32, i32) {
        let block_w = parent_w as f32 / self.grid.blocks_x() as f32;
        let block_h = parent_h as f32 / self.grid.blocks_y() as f32;

        (
            (self.placement.width_blocks as f32 * block_w) as i32,
            (self.placement.height_blocks as f32 * block_h) as i32,
        )
    }

    /// Registration hook: the surface assigns the id and the clamped placement.
    pub(crate) fn register(&mut self, id: WidgetId, placement: Placement) {
        self.id = id;
        self.placement = placement;
    }

    /// Apply a freshly computed rectangle, then evaluate the layout rule.
    pub(crate) fn allocate(&mut self, rect: PixelRect, mode: AttachMode) {
        self.rect = rect;
        self.attached = Some(mode);
        self.content_size = self.resize(rect.w, rect.h);

        match self.rule {
            LayoutRule::None => {}
            LayoutRule::WrapText { inset_px } => {
                // Integer block width, like the label's own allocation
                let block_w = rect.w / self.grid.blocks_x() as i32;
                self.wrap_width = Some(block_w * self.placement.width_blocks as i32 - inset_px);
            }
        }
    }
}

/// Implemented by every widget kind that can live on a layout surface.
pub trait Placed {
    fn managed(&self) -> &ManagedWidget;

    fn managed_mut(&mut self) -> &mut ManagedWidget;
}

impl Placed for ManagedWidget {
    fn managed(&self) -> &ManagedWidget {
        self
    }

    fn managed_mut(&mut self) -> &mut ManagedWidget {
        self
    }
}
