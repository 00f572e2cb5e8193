//! Layout surface that owns the placed widgets and reflows them on resize

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Line;
use heapless::Vec;
use log::debug;

use super::grid::{Grid, MAX_GRID_LINES, PixelRect, Placement, cell_to_rect, grid_lines};
use super::widget::{AttachMode, Placed};
use crate::error::{DashError, DashResult};
use crate::host::Host;
use crate::ui::core::{RedrawTarget, WidgetId};

/// Widget ids are a `u8` index, which bounds every surface's capacity
pub const MAX_SURFACE_WIDGETS: usize = u8::MAX as usize + 1;

/// Owns a bounded collection of placed widgets.
///
/// Every widget's rectangle is recomputed from its placement and the current
/// surface size; after [`on_resize`](Self::on_resize) returns, no widget holds
/// a stale rectangle.
///
/// # Type Parameters
/// - `W`: widget type (usually an enum over the widget kinds)
/// - `N`: maximum number of widgets, at most [`MAX_SURFACE_WIDGETS`]
pub struct LayoutSurface<W, const N: usize> {
    width: u32,
    height: u32,
    grid: Grid,
    padding: i32,
    debug_overlay: bool,
    widgets: Vec<W, N>,
}

impl<W: Placed, const N: usize> LayoutSurface<W, N> {
    pub fn new(width: u32, height: u32, grid: Grid, padding: i32) -> Self {
        const { assert!(N <= MAX_SURFACE_WIDGETS, "surface capacity exceeds WidgetId range") };
        Self {
            width,
            height,
            grid,
            padding,
            debug_overlay: false,
            widgets: Vec::new(),
        }
    }

    /// Register a widget at `placement`.
    ///
    /// The placement is clamped into the grid, stored on the widget and its
    /// rectangle applied immediately with [`AttachMode::Put`].
    ///
    /// # Returns
    /// - `Ok(id)`: id used to route events back to the widget
    /// - `Err(DashError::SurfaceFull)`: every slot is taken
    pub fn register(&mut self, mut widget: W, placement: Placement) -> DashResult<WidgetId> {
        if self.widgets.is_full() {
            return Err(DashError::SurfaceFull { max: N });
        }

        let id = u8::try_from(self.widgets.len())
            .map(WidgetId)
            .map_err(|_| DashError::SurfaceFull { max: N })?;
        let placement = placement.clamped(self.grid);
        let rect = self.rect_for(placement);

        let managed = widget.managed_mut();
        managed.register(id, placement);
        managed.allocate(rect, AttachMode::Put);

        debug!("Registered widget {:?} at {:?} -> {:?}", id, placement, rect);
        self.widgets
            .push(widget)
            .map_err(|_| DashError::SurfaceFull { max: N })?;
        Ok(id)
    }

    /// Store the new surface size and re-apply every widget's rectangle.
    ///
    /// Calling this twice with the same size yields the same rectangles.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        debug!("Surface resized to {}x{}", width, height);
        self.width = width;
        self.height = height;

        let (grid, padding) = (self.grid, self.padding);
        for widget in &mut self.widgets {
            let managed = widget.managed_mut();
            let rect = cell_to_rect(width, height, grid, managed.placement(), padding);
            managed.allocate(rect, AttachMode::Move);
        }
    }

    /// Toggle the grid separator overlay and request one redraw.
    pub fn set_debug_overlay<H: Host>(&mut self, enabled: bool, host: &mut H) {
        self.debug_overlay = enabled;
        host.request_redraw(RedrawTarget::Surface);
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Separator lines for the overlay at the current size
    pub fn grid_lines(&self) -> Vec<Line, MAX_GRID_LINES> {
        grid_lines(self.width, self.height, self.grid)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: WidgetId) -> Option<&W> {
        self.widgets.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut W> {
        self.widgets.get_mut(id.0 as usize)
    }

    /// Current rectangle of a registered widget
    pub fn rect_of(&self, id: WidgetId) -> Option<PixelRect> {
        self.get(id).map(|w| w.managed().rect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &W> {
        self.widgets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut W> {
        self.widgets.iter_mut()
    }

    /// Topmost widget whose rectangle contains `point`.
    ///
    /// Later registrations are on top.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        self.widgets
            .iter()
            .rev()
            .find(|w| w.managed().rect().contains(point))
            .map(|w| w.managed().id())
    }

    fn rect_for(&self, placement: Placement) -> PixelRect {
        cell_to_rect(self.width, self.height, self.grid, placement, self.padding)
    }
}
