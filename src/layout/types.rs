use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

use super::glyph::GlyphSizer;

/// Overlaps thinner than this (in pixels) are treated as touching edges.
pub const OVERLAP_EPSILON: f32 = 1e-3;

/// Pixel size of the board the host draws on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in canvas pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the two rectangles share a non-empty area; rectangles that
    /// merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let overlap_x = self.right.min(other.right) - self.left.max(other.left);
        let overlap_y = self.bottom.min(other.bottom) - self.top.max(other.top);
        overlap_x > OVERLAP_EPSILON && overlap_y > OVERLAP_EPSILON
    }

    /// Half-open containment: left and top edges are inside, right and bottom are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// Drawing geometry of one checkbox + text glyph.
///
/// The touch area is derived from the other fields when the glyph is sized;
/// afterwards all four only ever move together through [`Graphic::translate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Graphic {
    baseline_y: f32,
    checkbox_x: f32,
    text_x: f32,
    touch_area: Rect,
}

impl Graphic {
    pub(crate) fn new(baseline_y: f32, checkbox_x: f32, text_x: f32, touch_area: Rect) -> Self {
        Self {
            baseline_y,
            checkbox_x,
            text_x,
            touch_area,
        }
    }

    /// y of the lower edge of the checkbox and of the text baseline.
    pub fn baseline_y(&self) -> f32 {
        self.baseline_y
    }

    pub fn checkbox_x(&self) -> f32 {
        self.checkbox_x
    }

    pub fn text_x(&self) -> f32 {
        self.text_x
    }

    pub fn touch_area(&self) -> &Rect {
        &self.touch_area
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.baseline_y += dy;
        self.checkbox_x += dx;
        self.text_x += dx;
        self.touch_area = self.touch_area.offset(dx, dy);
    }
}

/// A task borrowed from the store together with the graphic computed for it
/// in the current layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed<'a> {
    task: &'a Task,
    graphic: Graphic,
}

impl<'a> Placed<'a> {
    pub(crate) fn new(task: &'a Task, graphic: Graphic) -> Self {
        Self { task, graphic }
    }

    pub fn task(&self) -> &'a Task {
        self.task
    }

    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.graphic.translate(dx, dy);
    }
}

/// Transient aggregate of overlapping tasks. Lives for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    members: Vec<Placed<'a>>,
    urgency: u8,
    importance: u8,
    label: String,
    graphic: Graphic,
    force_combined: bool,
    nudge_limit: usize,
}

impl<'a> Group<'a> {
    /// Combine two elements; groups contribute their members, not themselves.
    pub(crate) fn merge(first: Element<'a>, second: Element<'a>, sizer: &GlyphSizer<'_>) -> Self {
        let mut members = first.into_members();
        members.extend(second.into_members());
        Self::from_members(members, sizer)
    }

    pub(crate) fn from_members(mut members: Vec<Placed<'a>>, sizer: &GlyphSizer<'_>) -> Self {
        debug_assert!(members.len() >= 2, "a group needs at least two members");
        let (urgency, importance, label) = aggregate(&mut members);
        let graphic = sizer.place_label(&label, urgency, importance);
        Self {
            members,
            urgency,
            importance,
            label,
            graphic,
            force_combined: false,
            nudge_limit: sizer.config().max_nudge_members,
        }
    }

    pub(crate) fn absorb(&mut self, member: Placed<'a>, sizer: &GlyphSizer<'_>) {
        self.members.push(member);
        self.recombine(sizer);
    }

    // Sort members, refresh the averages and the marker graphic.
    fn recombine(&mut self, sizer: &GlyphSizer<'_>) {
        let (urgency, importance, label) = aggregate(&mut self.members);
        self.urgency = urgency;
        self.importance = importance;
        self.label = label;
        self.graphic = sizer.place_label(&self.label, urgency, importance);
    }

    /// Members ordered by descending importance; equal importance keeps
    /// insertion order.
    pub fn members(&self) -> &[Placed<'a>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Floor of the members' average urgency.
    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    /// Floor of the members' average importance.
    pub fn importance(&self) -> u8 {
        self.importance
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    pub fn force_combined(&self) -> bool {
        self.force_combined
    }

    pub(crate) fn set_force_combined(&mut self, force_combined: bool) {
        self.force_combined = force_combined;
    }

    /// Whether the layout may still try to spread this group apart.
    pub fn nudging(&self) -> bool {
        self.members.len() <= self.nudge_limit && !self.force_combined
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.members.iter().any(|m| m.id() == id)
    }

    /// Smallest member id; the group's position in the stable ordering.
    pub fn key(&self) -> TaskId {
        self.members
            .iter()
            .map(Placed::id)
            .min()
            .unwrap_or(TaskId(u64::MAX))
    }

    pub(crate) fn into_members(self) -> Vec<Placed<'a>> {
        self.members
    }
}

fn aggregate(members: &mut [Placed<'_>]) -> (u8, u8, String) {
    members.sort_by(|a, b| b.task.importance().cmp(&a.task.importance()));
    let count = members.len().max(1) as u32;
    let urgency: u32 = members.iter().map(|m| m.task.urgency() as u32).sum();
    let importance: u32 = members.iter().map(|m| m.task.importance() as u32).sum();
    (
        (urgency / count) as u8,
        (importance / count) as u8,
        format!("{} tasks", members.len()),
    )
}

/// One drawable entry of a partition: a standalone task or a collapsed group.
#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    Task(Placed<'a>),
    Group(Group<'a>),
}

impl<'a> Element<'a> {
    pub fn label(&self) -> &str {
        match self {
            Element::Task(placed) => placed.task.label(),
            Element::Group(group) => group.label(),
        }
    }

    pub fn urgency(&self) -> u8 {
        match self {
            Element::Task(placed) => placed.task.urgency(),
            Element::Group(group) => group.urgency(),
        }
    }

    pub fn importance(&self) -> u8 {
        match self {
            Element::Task(placed) => placed.task.importance(),
            Element::Group(group) => group.importance(),
        }
    }

    pub fn graphic(&self) -> &Graphic {
        match self {
            Element::Task(placed) => placed.graphic(),
            Element::Group(group) => group.graphic(),
        }
    }

    pub fn key(&self) -> TaskId {
        match self {
            Element::Task(placed) => placed.id(),
            Element::Group(group) => group.key(),
        }
    }

    pub fn as_task(&self) -> Option<&Placed<'a>> {
        match self {
            Element::Task(placed) => Some(placed),
            Element::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group<'a>> {
        match self {
            Element::Task(_) => None,
            Element::Group(group) => Some(group),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    pub(crate) fn into_members(self) -> Vec<Placed<'a>> {
        match self {
            Element::Task(placed) => vec![placed],
            Element::Group(group) => group.into_members(),
        }
    }
}

/// Result of a layout pass: every visible task appears exactly once, either
/// standalone or inside one group. Borrows the tasks, so the store cannot be
/// mutated while a partition is alive.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    canvas: Canvas,
    elements: Vec<Element<'a>>,
}

impl<'a> Partition<'a> {
    pub(crate) fn new(canvas: Canvas, mut elements: Vec<Element<'a>>) -> Self {
        elements.sort_by_key(Element::key);
        Self { canvas, elements }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Elements in the stable order used for layout and hit testing.
    pub fn elements(&self) -> &[Element<'a>] {
        &self.elements
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Placed<'a>> {
        self.elements.iter().filter_map(Element::as_task)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group<'a>> {
        self.elements.iter().filter_map(Element::as_group)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The group holding `id`, if the task was collapsed into one.
    pub fn group_containing(&self, id: TaskId) -> Option<&Group<'a>> {
        self.groups().find(|group| group.contains(id))
    }
}
