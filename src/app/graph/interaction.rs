use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::physics::DRAG_ALPHA_TARGET;
use super::super::render_utils::screen_to_world;
use super::super::{Scene, ViewModel};

/// Press-to-release movement below this many screen pixels counts as a
/// click, not a drag.
pub(in crate::app) const CLICK_DRAG_THRESHOLD: f32 = 4.0;

pub(in crate::app) const MIN_ZOOM: f32 = 0.2;
pub(in crate::app) const MAX_ZOOM: f32 = 8.0;

/// Emitted toward the hosting shell whenever hover or selection changes.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum SelectionEvent {
    Hovered(Option<String>),
    Selected(Option<String>),
}

/// Single-session pointer state machine: at most one drag at a time;
/// hover and selection are independent and may coincide. Selection is
/// sticky, surviving hover changes until re-selected or cleared by a
/// background click.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct InteractionState {
    pub hovered: Option<String>,
    pub selected: Option<String>,
    drag: Option<DragState>,
    events: Vec<SelectionEvent>,
}

#[derive(Clone, Debug)]
struct DragState {
    id: String,
    epoch: u64,
    press: Pos2,
    moved: bool,
}

impl InteractionState {
    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.id.as_str())
    }

    pub fn set_hovered(&mut self, id: Option<String>) {
        // Leaving the hit-region of the node being dragged does not end
        // its hover until the drag releases.
        if id.is_none()
            && let Some(drag) = &self.drag
            && self.hovered.as_deref() == Some(drag.id.as_str())
        {
            return;
        }
        if self.hovered != id {
            self.hovered = id.clone();
            self.events.push(SelectionEvent::Hovered(id));
        }
    }

    pub fn set_selected(&mut self, id: Option<String>) {
        if self.selected != id {
            self.selected = id.clone();
            self.events.push(SelectionEvent::Selected(id));
        }
    }

    /// Starts dragging `id`: any pin left over from a prior drag is
    /// cleared, the node is pinned to the pointer, and the simulation is
    /// reheated so the layout keeps flowing around the pointer.
    pub fn begin_drag(&mut self, scene: &mut Scene, id: &str, press: Pos2, pointer_world: Vec2) {
        let Some(&index) = scene.index_by_id.get(id) else {
            return;
        };
        scene.sim.unpin_all();
        scene.sim.pin(index, pointer_world);
        scene.sim.set_alpha_target(DRAG_ALPHA_TARGET);
        self.drag = Some(DragState {
            id: id.to_owned(),
            epoch: scene.sim.epoch(),
            press,
            moved: false,
        });
    }

    /// Moves the active drag. A drag belonging to a superseded scene epoch
    /// is discarded instead of applied; a drag whose entity vanished from
    /// the scene is cleared and the simulation cooled.
    pub fn drag_to(&mut self, scene: &mut Scene, pointer_screen: Pos2, pointer_world: Vec2) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        if drag.epoch != scene.sim.epoch() {
            self.drag = None;
            return;
        }
        if (pointer_screen - drag.press).length() > CLICK_DRAG_THRESHOLD {
            drag.moved = true;
        }
        match scene.index_by_id.get(&drag.id) {
            Some(&index) => scene.sim.pin(index, pointer_world),
            None => {
                self.drag = None;
                scene.sim.set_alpha_target(0.0);
            }
        }
    }

    /// Releases the active drag: the pin is cleared so the node resumes
    /// free motion from where it was dropped, and the simulation cools
    /// back down. A release that never exceeded the click threshold
    /// selects the node instead. Stale releases (superseded epoch or
    /// entity filtered out) are no-ops beyond clearing the drag state.
    pub fn end_drag(&mut self, scene: &mut Scene) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if drag.epoch != scene.sim.epoch() {
            return;
        }
        if let Some(&index) = scene.index_by_id.get(&drag.id) {
            scene.sim.unpin(index);
        }
        scene.sim.set_alpha_target(0.0);
        if !drag.moved {
            self.set_selected(Some(drag.id));
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn drain_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let (scroll, pinch) = ui.input(|input| (input.raw_scroll_delta.y, input.zoom_delta()));
        if scroll.abs() <= f32::EPSILON && (pinch - 1.0).abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = ((1.0 + (scroll * 0.0018)) * pinch).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<(usize, f32)> {
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer| {
            visible_indices
                .iter()
                .filter_map(|index| {
                    let distance = screen_positions[*index].distance(pointer);
                    if distance <= screen_radii[*index] {
                        Some((*index, distance))
                    } else {
                        None
                    }
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
    }
}
