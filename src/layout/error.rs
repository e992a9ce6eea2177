use thiserror::Error;

use crate::task::TaskId;

/// Contract violations surfaced by a layout pass. A nudge that does not fit
/// is not one of these; the group simply stays collapsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("task {id} has an empty label")]
    EmptyLabel { id: TaskId },
    #[error("overlap grouping did not converge after {merges} merges (limit {limit})")]
    NonConvergence { merges: usize, limit: usize },
    #[error("canvas {width}x{height} leaves no room inside a {margin}px margin")]
    CanvasTooSmall { width: f32, height: f32, margin: f32 },
}
