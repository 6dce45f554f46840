//! The slot container engine.
//!
//! A container owns a set of named slots, each holding at most one child
//! widget. From its own geometry it derives every child's clipping
//! rectangle ([`SlotLayout::slot_bounds`]) and origin
//! ([`SlotLayout::child_origin`]); concrete containers override those to
//! carve sub-rectangles or apply scroll offsets. When the container's size
//! changes it walks the new size back toward the old one, one pixel at a
//! time, until every child accepts its slot rectangle.
//!
//! Children are drawn in list order; the last child is topmost and wins
//! focus/hover ties. A stack of "dialogue" children can be marked: while
//! the stack is non-empty and not hidden, only the top dialogue may hold
//! focus or hover, and its siblings render beneath a darkening overlay.

use tessera_types::diag::Diagnostics;
use tessera_types::error::{Result, TesseraError};
use tessera_types::input::InputState;
use tessera_types::{Color, Origin, ViewRect};

use crate::widget::{DrawContext, UpdateContext, Widget, WidgetCore};

/// Opaque handle to a slot, valid until the slot is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

/// Containment rules a concrete container supplies to the engine.
pub trait SlotLayout {
    /// The clipping rectangle for a slot, given the container frame and a
    /// prospective size. Default: the full container rectangle.
    fn slot_bounds(&self, _slot: SlotId, frame: &WidgetCore, width: u32, height: u32) -> ViewRect {
        ViewRect::new(frame.real_x(), frame.real_y(), width, height)
    }

    /// Extra origin offset for a slot's child. Default: none.
    fn child_origin(&self, _slot: SlotId) -> Origin {
        Origin::ZERO
    }

    /// The outermost clip every child inherits. Default: the container's
    /// own boundaries.
    fn master_bounds(&self, frame: &WidgetCore) -> ViewRect {
        frame.boundaries
    }
}

/// The default containment rules: every slot gets the whole container.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLayout;

impl SlotLayout for DefaultLayout {}

/// A failed [`SlotContainer::place`], handing the widget back to the
/// caller.
pub struct PlaceError {
    pub widget: Box<dyn Widget>,
    pub error: TesseraError,
}

impl std::fmt::Debug for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceError").field("error", &self.error).finish()
    }
}

struct Child {
    slot: SlotId,
    widget: Box<dyn Widget>,
}

/// Slot bookkeeping plus the focus/hover/dialogue machinery.
pub struct SlotContainer {
    next_slot: u64,
    slots: Vec<SlotId>,
    /// Draw order: first is drawn first, last is topmost.
    children: Vec<Child>,
    focused: Option<SlotId>,
    hovered: Option<SlotId>,
    dialogues: Vec<SlotId>,
    pub dialogues_hidden: bool,
    pub darken_under_dialogue: bool,
    pub darkening_mask: Color,
    remove_queue: Vec<SlotId>,
}

/// Bound on the size-negotiation walk. The walk moves one pixel per
/// iteration back toward the previous size, so hitting this means the
/// constraints oscillate or the clamp pinned the size; either way it is
/// reported instead of looping.
const SIZE_NEGOTIATION_LIMIT: u32 = 4096;

impl Default for SlotContainer {
    fn default() -> Self {
        Self {
            next_slot: 0,
            slots: Vec::new(),
            children: Vec::new(),
            focused: None,
            hovered: None,
            dialogues: Vec::new(),
            dialogues_hidden: false,
            darken_under_dialogue: true,
            darkening_mask: Color::rgba(0, 0, 0, 77),
            remove_queue: Vec::new(),
        }
    }
}

impl SlotContainer {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Slot management --------------------------------------------------

    /// Create an empty slot and return its handle.
    pub fn add_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.slots.push(id);
        id
    }

    pub fn has_slot(&self, slot: SlotId) -> bool {
        self.slots.contains(&slot)
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.children.iter().any(|c| c.slot == slot)
    }

    /// Remove a slot, closing and returning any child it held.
    pub fn remove_slot(&mut self, slot: SlotId) -> Result<Option<Box<dyn Widget>>> {
        if !self.has_slot(slot) {
            log::warn!("tried to remove nonexistent slot {slot:?}");
            return Err(TesseraError::Layout(format!("no slot {slot:?}")));
        }
        let child = self.detach(slot);
        self.slots.retain(|s| *s != slot);
        Ok(child)
    }

    /// Put a widget into an empty slot.
    ///
    /// Fails when the slot does not exist or is occupied, or when the
    /// widget has not finished its own setup. On failure the widget is
    /// handed back inside the error.
    pub fn place(
        &mut self,
        mut widget: Box<dyn Widget>,
        slot: SlotId,
        frame: &WidgetCore,
        layout: &dyn SlotLayout,
    ) -> std::result::Result<(), PlaceError> {
        let error = if !self.has_slot(slot) {
            Some(format!("can't place into nonexistent slot {slot:?}"))
        } else if self.is_occupied(slot) {
            Some(format!("can't place into occupied slot {slot:?}"))
        } else if !widget.core().initialized {
            Some("can't place a widget that is not initialized".to_string())
        } else if widget.core().closed {
            Some("can't place a closed widget".to_string())
        } else {
            None
        };
        if let Some(message) = error {
            log::warn!("{message}");
            return Err(PlaceError {
                widget,
                error: TesseraError::Layout(message),
            });
        }

        {
            let core = widget.core_mut();
            core.origin = layout.child_origin(slot);
            core.apply_boundaries(layout.slot_bounds(
                slot,
                frame,
                frame.width(),
                frame.height(),
            ));
            core.master_boundaries = layout.master_bounds(frame);
        }
        widget.added_to_container();
        self.children.push(Child { slot, widget });
        Ok(())
    }

    /// Close and detach the child in a slot. The slot itself stays.
    pub fn remove(&mut self, slot: SlotId) -> Result<Option<Box<dyn Widget>>> {
        if !self.has_slot(slot) {
            return Err(TesseraError::Layout(format!("no slot {slot:?}")));
        }
        Ok(self.detach(slot))
    }

    fn detach(&mut self, slot: SlotId) -> Option<Box<dyn Widget>> {
        let index = self.children.iter().position(|c| c.slot == slot)?;
        let mut child = self.children.remove(index);
        if !child.widget.core().closed {
            child.widget.close();
        }
        child.widget.removed_from_container();
        if self.focused == Some(slot) {
            self.focused = None;
        }
        if self.hovered == Some(slot) {
            self.hovered = None;
        }
        self.dialogues.retain(|d| *d != slot);
        Some(child.widget)
    }

    /// Queue a child for removal at the next update.
    pub fn request_removal(&mut self, slot: SlotId) {
        if !self.remove_queue.contains(&slot) {
            self.remove_queue.push(slot);
        }
    }

    /// Close and detach every child. Slots stay.
    pub fn clear_children(&mut self) {
        let slots: Vec<SlotId> = self.children.iter().map(|c| c.slot).collect();
        for slot in slots {
            let _ = self.detach(slot);
        }
    }

    // -- Child access ------------------------------------------------------

    pub fn child(&self, slot: SlotId) -> Option<&dyn Widget> {
        self.children
            .iter()
            .find(|c| c.slot == slot)
            .map(|c| c.widget.as_ref())
    }

    pub fn child_mut(&mut self, slot: SlotId) -> Option<&mut (dyn Widget + 'static)> {
        self.children
            .iter_mut()
            .find(|c| c.slot == slot)
            .map(|c| c.widget.as_mut())
    }

    /// Children in draw order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &dyn Widget)> {
        self.children.iter().map(|c| (c.slot, c.widget.as_ref()))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_child_topmost(&self, slot: SlotId) -> bool {
        self.children.last().map(|c| c.slot) == Some(slot)
    }

    // -- Draw order --------------------------------------------------------

    /// Move a child to the top of the draw order. Layout is unaffected.
    pub fn put_child_in_front(&mut self, slot: SlotId) -> Result<()> {
        let index = self
            .children
            .iter()
            .position(|c| c.slot == slot)
            .ok_or_else(|| TesseraError::Layout(format!("slot {slot:?} holds no child")))?;
        let child = self.children.remove(index);
        self.children.push(child);
        Ok(())
    }

    /// Move a child to the bottom of the draw order. Layout is unaffected.
    pub fn put_child_in_back(&mut self, slot: SlotId) -> Result<()> {
        let index = self
            .children
            .iter()
            .position(|c| c.slot == slot)
            .ok_or_else(|| TesseraError::Layout(format!("slot {slot:?} holds no child")))?;
        let child = self.children.remove(index);
        self.children.insert(0, child);
        Ok(())
    }

    // -- Focus, hover, dialogues ------------------------------------------

    pub fn focused(&self) -> Option<SlotId> {
        self.focused
    }

    /// Hand focus to a specific child (Tab traversal). Ignored unless the
    /// slot holds a child.
    pub fn set_focus(&mut self, slot: Option<SlotId>) {
        self.focused = slot.filter(|s| self.is_occupied(*s));
    }

    pub fn hovered(&self) -> Option<SlotId> {
        self.hovered
    }

    /// Mark a child as a modal dialogue, on top of the stack.
    pub fn push_dialogue(&mut self, slot: SlotId) {
        self.dialogues.push(slot);
    }

    pub fn remove_dialogue(&mut self, slot: SlotId) {
        self.dialogues.retain(|d| *d != slot);
    }

    /// Top of the dialogue stack, if any.
    pub fn current_dialogue(&self) -> Option<SlotId> {
        self.dialogues.last().copied()
    }

    fn is_hidden_dialogue(&self, slot: SlotId) -> bool {
        self.dialogues_hidden && self.dialogues.contains(&slot)
    }

    fn handle_focus(&mut self, container_has_focus: bool, input: &InputState) {
        if let Some(slot) = self.focused {
            let gone = match self.child(slot) {
                Some(child) => child.core().suspended || child.core().closed,
                None => true,
            };
            if gone {
                self.focused = None;
            }
        }

        if !container_has_focus {
            self.focused = None;
            return;
        }

        let previous = self.focused;
        self.focused = None;
        for child in &self.children {
            if self.dialogues_hidden && self.dialogues.contains(&child.slot) {
                continue;
            }
            let core = child.widget.core();
            if core.hidden || core.suspended {
                continue;
            }
            if child.widget.wants_focus(input) {
                // Later children are topmost, so the last claimant wins.
                self.focused = Some(child.slot);
            }
        }
        if self.focused.is_none() {
            self.focused = previous;
        }
    }

    fn handle_mouse_over(&mut self, container_under_mouse: bool, input: &InputState) {
        if !container_under_mouse {
            self.hovered = None;
            return;
        }

        self.hovered = None;
        for child in &self.children {
            if self.dialogues_hidden && self.dialogues.contains(&child.slot) {
                continue;
            }
            let core = child.widget.core();
            if core.hidden {
                continue;
            }
            if input.mouse_in(core.visible_rect()) {
                self.hovered = Some(child.slot);
            }
        }
    }

    // -- Geometry propagation ---------------------------------------------

    /// Push boundaries, origins, and master boundaries down to every
    /// child, derived from the container frame through the layout rules.
    pub fn sync_child_frames(&mut self, frame: &WidgetCore, layout: &dyn SlotLayout) {
        for child in &mut self.children {
            let core = child.widget.core_mut();
            core.origin = layout.child_origin(child.slot);
            core.apply_boundaries(layout.slot_bounds(
                child.slot,
                frame,
                frame.width(),
                frame.height(),
            ));
            core.master_boundaries = layout.master_bounds(frame);
        }
    }

    /// Whether every child would accept its slot width at a prospective
    /// container width.
    pub fn is_valid_width(&self, frame: &WidgetCore, layout: &dyn SlotLayout, width: u32) -> bool {
        self.children.iter().all(|c| {
            let bounds = layout.slot_bounds(c.slot, frame, width, frame.height());
            c.widget.core().accepts_width(bounds.width)
        })
    }

    /// Whether every child would accept its slot height at a prospective
    /// container height.
    pub fn is_valid_height(&self, frame: &WidgetCore, layout: &dyn SlotLayout, height: u32) -> bool {
        self.children.iter().all(|c| {
            let bounds = layout.slot_bounds(c.slot, frame, frame.width(), height);
            c.widget.core().accepts_height(bounds.height)
        })
    }

    /// Re-derive child frames and walk the container size until every
    /// child accepts its slot rectangle.
    ///
    /// The walk nudges each dimension one pixel per step back toward its
    /// previous value. It stops when all children accept, when it reaches
    /// the previous value, or at the iteration bound; the last two are
    /// reported through `diag` as unsatisfiable constraints.
    pub fn make_size_valid(
        &mut self,
        frame: &mut WidgetCore,
        layout: &dyn SlotLayout,
        old_width: u32,
        old_height: u32,
        diag: &mut dyn Diagnostics,
    ) {
        self.sync_child_frames(frame, layout);

        if old_width != frame.width() {
            self.make_width_valid(frame, layout, old_width, diag);
        }
        if old_height != frame.height() {
            self.make_height_valid(frame, layout, old_height, diag);
        }
        self.sync_child_frames(frame, layout);
    }

    fn make_width_valid(
        &mut self,
        frame: &mut WidgetCore,
        layout: &dyn SlotLayout,
        old_width: u32,
        diag: &mut dyn Diagnostics,
    ) {
        let mut iterations = 0;
        while !self.is_valid_width(frame, layout, frame.width()) {
            iterations += 1;
            if iterations > SIZE_NEGOTIATION_LIMIT {
                diag.report(
                    "layout",
                    None,
                    "container width negotiation did not converge",
                );
                return;
            }
            let width = frame.width();
            if old_width < width {
                frame.set_width(width - 1);
            } else if old_width > width {
                frame.set_width(width + 1);
            } else {
                diag.report("layout", None, "no container width satisfies all children");
                return;
            }
            if frame.width() == width {
                // The clamp pinned the size; nothing left to try.
                diag.report("layout", None, "no container width satisfies all children");
                return;
            }
        }
    }

    fn make_height_valid(
        &mut self,
        frame: &mut WidgetCore,
        layout: &dyn SlotLayout,
        old_height: u32,
        diag: &mut dyn Diagnostics,
    ) {
        let mut iterations = 0;
        while !self.is_valid_height(frame, layout, frame.height()) {
            iterations += 1;
            if iterations > SIZE_NEGOTIATION_LIMIT {
                diag.report(
                    "layout",
                    None,
                    "container height negotiation did not converge",
                );
                return;
            }
            let height = frame.height();
            if old_height < height {
                frame.set_height(height - 1);
            } else if old_height > height {
                frame.set_height(height + 1);
            } else {
                diag.report("layout", None, "no container height satisfies all children");
                return;
            }
            if frame.height() == height {
                diag.report("layout", None, "no container height satisfies all children");
                return;
            }
        }
    }

    // -- Frame driving -----------------------------------------------------

    /// Per-frame bookkeeping: propagate geometry, settle focus and hover,
    /// drain the removal queue, then update every child.
    pub fn update(
        &mut self,
        frame: &WidgetCore,
        layout: &dyn SlotLayout,
        ctx: &mut UpdateContext<'_>,
        container_has_focus: bool,
        container_under_mouse: bool,
    ) {
        self.sync_child_frames(frame, layout);

        self.handle_focus(container_has_focus, ctx.input);
        self.handle_mouse_over(container_under_mouse, ctx.input);

        // Closed dialogues fall off the stack.
        while let Some(top) = self.current_dialogue() {
            let closed = match self.child(top) {
                Some(child) => child.core().closed,
                None => true,
            };
            if !closed {
                break;
            }
            self.dialogues.pop();
        }

        // An active dialogue is the only child eligible for focus/hover.
        if !self.dialogues_hidden
            && let Some(top) = self.current_dialogue()
        {
            if self.focused != Some(top) {
                self.focused = None;
            }
            if self.hovered != Some(top) {
                self.hovered = None;
            }
        }

        for slot in std::mem::take(&mut self.remove_queue) {
            let _ = self.detach(slot);
        }

        let focused = self.focused;
        let hovered = self.hovered;
        let mut skip: Vec<SlotId> = Vec::new();
        for child in &mut self.children {
            if self.dialogues_hidden && self.dialogues.contains(&child.slot) {
                skip.push(child.slot);
            }
            let core = child.widget.core_mut();
            core.has_focus = container_has_focus && focused == Some(child.slot);
            core.under_mouse = hovered == Some(child.slot);
        }

        for index in 0..self.children.len() {
            let slot = self.children[index].slot;
            if skip.contains(&slot) || self.children[index].widget.core().closed {
                continue;
            }
            self.children[index].widget.update(ctx);
        }
    }

    /// Draw children bottom-to-top, clipping each to its boundaries.
    ///
    /// With an active, visible dialogue, the other children render first,
    /// the screen is dimmed, then the dialogue renders on top.
    pub fn draw(&self, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let active_dialogue = if !self.dialogues_hidden && self.darken_under_dialogue {
            self.current_dialogue()
        } else {
            None
        };

        for child in &self.children {
            if Some(child.slot) == active_dialogue {
                continue;
            }
            if self.is_hidden_dialogue(child.slot) {
                continue;
            }
            self.draw_child(child, ctx, view)?;
        }

        if let Some(top) = active_dialogue {
            ctx.backend.dim_screen(self.darkening_mask)?;
            if let Some(child) = self.children.iter().find(|c| c.slot == top) {
                self.draw_child(child, ctx, view)?;
            }
        }
        Ok(())
    }

    fn draw_child(&self, child: &Child, ctx: &mut DrawContext<'_>, view: ViewRect) -> Result<()> {
        let core = child.widget.core();
        if core.hidden || core.closed {
            return Ok(());
        }
        let child_view = view
            .intersect(core.boundaries)
            .intersect(core.master_boundaries);
        child.widget.draw(ctx, child_view)
    }
}
