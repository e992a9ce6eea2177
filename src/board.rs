//! Host-facing controller: owns the task store and turns taps, double taps
//! and drags into store updates. Every mutation happens between layout
//! passes; each query lays the board out afresh from the store.

use crate::config::LayoutConfig;
use crate::gradient::GradientPalette;
use crate::layout::{
    Canvas, Element, LayoutError, Partition, PopupLayout, Projection, Rect, compute_layout,
    compute_popup,
};
use crate::task::{Task, TaskId, TaskStore};
use crate::text_metrics::TextMeasure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A task's completed flag was flipped.
    Toggled(TaskId),
    /// A collapsed group was tapped; its popup is now open.
    OpenedPopup { group: TaskId, members: usize },
    ClosedPopup,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleTapOutcome {
    /// The host should open its editor for this task.
    Edit(TaskId),
    /// The host should create a task with these ratings.
    Create { urgency: u8, importance: u8 },
    Ignored,
}

enum PopupHit {
    Outside,
    Member(TaskId),
    Blank,
}

pub struct Board<S, M> {
    store: S,
    measure: M,
    config: LayoutConfig,
    palette: GradientPalette,
    canvas: Canvas,
    popup: Option<TaskId>,
    dragging: Option<TaskId>,
}

impl<S: TaskStore, M: TextMeasure> Board<S, M> {
    pub fn new(
        store: S,
        measure: M,
        config: LayoutConfig,
        palette: GradientPalette,
        canvas: Canvas,
    ) -> Self {
        Self {
            store,
            measure,
            config,
            palette,
            canvas,
            popup: None,
            dragging: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn resize(&mut self, canvas: Canvas) {
        tracing::trace!(width = canvas.width, height = canvas.height, "board resized");
        self.canvas = canvas;
    }

    pub fn palette(&self) -> &GradientPalette {
        &self.palette
    }

    /// Key of the group whose popup is open.
    pub fn open_popup(&self) -> Option<TaskId> {
        self.popup
    }

    pub fn dragging(&self) -> Option<TaskId> {
        self.dragging
    }

    pub fn layout(&self) -> Result<Partition<'_>, LayoutError> {
        compute_layout(self.store.tasks(), self.canvas, &self.measure, &self.config)
    }

    /// Layout of the open popup, if any. A popup whose group no longer
    /// exists yields `None`.
    pub fn popup_layout(&self) -> Result<Option<PopupLayout<'_>>, LayoutError> {
        let Some(key) = self.popup else {
            return Ok(None);
        };
        let partition = self.layout()?;
        let Some(group) = partition.group_containing(key) else {
            return Ok(None);
        };
        compute_popup(group, self.canvas, &self.measure, &self.config, &self.palette).map(Some)
    }

    /// Top-left corner of a popup centered on the canvas.
    pub fn popup_origin(&self, popup: &PopupLayout<'_>) -> (f32, f32) {
        (
            ((self.canvas.width - popup.width()) / 2.0).max(0.0),
            ((self.canvas.height - popup.height()) / 2.0).max(0.0),
        )
    }

    fn projection(&self) -> Result<Projection, LayoutError> {
        let (ascent, descent) = self.measure.vertical_metrics();
        Projection::new(
            self.canvas,
            self.config.margin,
            self.config.padding,
            ascent,
            descent,
        )
    }

    fn popup_hit(&self, x: f32, y: f32) -> Result<Option<PopupHit>, LayoutError> {
        let Some(popup) = self.popup_layout()? else {
            return Ok(None);
        };
        let (left, top) = self.popup_origin(&popup);
        let frame = Rect::new(left, top, left + popup.width(), top + popup.height());
        if !frame.contains(x, y) {
            return Ok(Some(PopupHit::Outside));
        }
        Ok(Some(
            popup
                .hit(x - left, y - top)
                .map_or(PopupHit::Blank, |member| PopupHit::Member(member.id())),
        ))
    }

    pub fn tap(&mut self, x: f32, y: f32) -> Result<TapOutcome, LayoutError> {
        if self.popup.is_some() {
            let outcome = match self.popup_hit(x, y)? {
                Some(PopupHit::Member(id)) => {
                    self.store.update(id, Task::toggle_completed);
                    TapOutcome::Toggled(id)
                }
                Some(PopupHit::Blank) => TapOutcome::Nothing,
                Some(PopupHit::Outside) | None => {
                    self.popup = None;
                    TapOutcome::ClosedPopup
                }
            };
            tracing::trace!(x, y, ?outcome, "popup tap");
            return Ok(outcome);
        }

        let outcome = match self.layout()?.hit(x, y) {
            Some(Element::Task(placed)) => TapOutcome::Toggled(placed.id()),
            Some(Element::Group(group)) => TapOutcome::OpenedPopup {
                group: group.key(),
                members: group.len(),
            },
            None => TapOutcome::Nothing,
        };
        match outcome {
            TapOutcome::Toggled(id) => {
                self.store.update(id, Task::toggle_completed);
            }
            TapOutcome::OpenedPopup { group, .. } => self.popup = Some(group),
            TapOutcome::ClosedPopup | TapOutcome::Nothing => {}
        }
        tracing::trace!(x, y, ?outcome, "board tap");
        Ok(outcome)
    }

    pub fn double_tap(&mut self, x: f32, y: f32) -> Result<DoubleTapOutcome, LayoutError> {
        if self.popup.is_some() {
            return Ok(match self.popup_hit(x, y)? {
                Some(PopupHit::Member(id)) => DoubleTapOutcome::Edit(id),
                _ => DoubleTapOutcome::Ignored,
            });
        }
        let hit = self
            .layout()?
            .hit(x, y)
            .and_then(Element::as_task)
            .map(|placed| placed.id());
        let outcome = match hit {
            Some(id) => DoubleTapOutcome::Edit(id),
            None => {
                let (urgency, importance) = self.projection()?.to_attributes(x, y);
                DoubleTapOutcome::Create {
                    urgency,
                    importance,
                }
            }
        };
        tracing::trace!(x, y, ?outcome, "board double tap");
        Ok(outcome)
    }

    /// Pick up the task under the point, from the popup when one is open.
    /// The task is hidden from layout until [`Board::end_drag`].
    pub fn begin_drag(&mut self, x: f32, y: f32) -> Result<Option<TaskId>, LayoutError> {
        let picked = if self.popup.is_some() {
            match self.popup_hit(x, y)? {
                Some(PopupHit::Member(id)) => Some(id),
                _ => None,
            }
        } else {
            self.layout()?
                .hit(x, y)
                .and_then(Element::as_task)
                .map(|placed| placed.id())
        };
        let Some(id) = picked else {
            return Ok(None);
        };
        self.popup = None;
        self.store.update(id, |task| task.set_moving(true));
        self.dragging = Some(id);
        tracing::trace!(task = %id, x, y, "drag started");
        Ok(Some(id))
    }

    /// Give the dragged task the ratings under the drop point.
    pub fn drop_at(&mut self, x: f32, y: f32) -> Result<Option<TaskId>, LayoutError> {
        let Some(id) = self.dragging else {
            return Ok(None);
        };
        let (urgency, importance) = self.projection()?.to_attributes(x, y);
        self.store.update(id, |task| {
            task.set_urgency(urgency.into());
            task.set_importance(importance.into());
        });
        tracing::trace!(task = %id, urgency, importance, "task dropped");
        Ok(Some(id))
    }

    pub fn end_drag(&mut self) -> Option<TaskId> {
        let id = self.dragging.take()?;
        self.store.update(id, |task| task.set_moving(false));
        tracing::trace!(task = %id, "drag ended");
        Some(id)
    }
}
