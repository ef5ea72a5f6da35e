use crate::document::NodeId;

/// Scrollable view of the rendered page
///
/// Rows count from the top of the full content, not the visible area.
pub trait Viewport {
    /// First content row currently visible
    fn scroll_top(&self) -> u16;

    /// Move the view; implementations clamp to `max_scroll`
    fn set_scroll_top(&mut self, top: u16);

    /// Largest reachable `scroll_top`
    fn max_scroll(&self) -> u16;

    /// Visible rows
    fn height(&self) -> u16;

    /// Content row where `node` starts, if it is laid out
    fn row_of(&self, node: NodeId) -> Option<u16>;
}
