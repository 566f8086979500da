use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use super::super::highlight::build_highlight_state;
use super::super::render_utils::{
    blend_color, circle_visible, connection_stroke, curve_control_point, curve_visible, dim_color,
    draw_background, entity_radius, risk_color, screen_radius, screen_to_world, world_to_screen,
};
use super::super::{Scene, ViewModel};

const NODE_FILL: Color32 = Color32::from_rgb(0x2D, 0x37, 0x48);
const NODE_FILL_HOVERED: Color32 = Color32::from_rgb(0x4A, 0x55, 0x68);
const NODE_FILL_SELECTED: Color32 = Color32::from_rgb(0x71, 0x80, 0x96);
const LABEL_COLOR: Color32 = Color32::from_rgb(0xA0, 0xAE, 0xC0);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xE2, 0xE8, 0xF0);

impl ViewModel {
    fn update_screen_space(rect: egui::Rect, pan: egui::Vec2, zoom: f32, scene: &mut Scene) {
        scene.view_scratch.screen_positions.clear();
        scene.view_scratch.screen_radii.clear();
        scene.view_scratch.visible_indices.clear();

        for (index, node) in scene.sim.nodes.iter().enumerate() {
            let position = world_to_screen(rect, pan, zoom, node.pos);
            let radius = screen_radius(entity_radius(scene.entities[index].weight), zoom);
            scene.view_scratch.screen_positions.push(position);
            scene.view_scratch.screen_radii.push(radius);
            if circle_visible(rect, position, radius) {
                scene.view_scratch.visible_indices.push(index);
            }
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.scene_dirty {
            self.rebuild_scene();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);

        let pan = self.pan;
        let zoom = self.zoom;
        let params = self.force_params;
        let interaction_active = response.dragged();

        let Some(scene) = self.scene.as_mut() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No entities match the current filters.",
                FontId::proportional(14.0),
                LABEL_COLOR,
            );
            self.interaction.set_hovered(None);
            if response.clicked_by(egui::PointerButton::Primary) {
                self.interaction.set_selected(None);
            }
            return;
        };

        let mut physics_moving = false;
        if self.live_physics {
            physics_moving = scene.sim.step(&params);
        }
        if physics_moving || interaction_active {
            ui.ctx().request_repaint();
        }

        Self::update_screen_space(rect, pan, zoom, scene);

        let hovered = Self::hovered_index(
            ui,
            &scene.view_scratch.visible_indices,
            &scene.view_scratch.screen_positions,
            &scene.view_scratch.screen_radii,
        );
        let hovered_id = hovered.map(|(index, _)| scene.entities[index].id.clone());

        if self.interaction.dragging().is_none() {
            self.interaction.set_hovered(hovered_id.clone());
        }
        if hovered.is_some() || self.interaction.dragging().is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.interaction.dragging().is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        // Pointer gestures: node drag pins the node to the pointer; primary
        // drag on the background (and secondary/middle anywhere) pans.
        let pointer = response.interact_pointer_pos();
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(id) = &hovered_id
            && let Some(pointer) = pointer
        {
            let press = ui
                .input(|input| input.pointer.press_origin())
                .unwrap_or(pointer);
            let world = screen_to_world(rect, pan, zoom, pointer);
            self.interaction.begin_drag(scene, id, press, world);
        } else if response.dragged_by(egui::PointerButton::Primary)
            && self.interaction.dragging().is_some()
            && let Some(pointer) = pointer
        {
            let world = screen_to_world(rect, pan, zoom, pointer);
            self.interaction.drag_to(scene, pointer, world);
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.interaction.end_drag(scene);
        }

        let background_pan = response.dragged_by(egui::PointerButton::Primary)
            && self.interaction.dragging().is_none();
        if background_pan
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.interaction.set_selected(hovered_id.clone());
        }

        let highlight = self
            .interaction
            .selected
            .as_deref()
            .and_then(|id| build_highlight_state(scene, id));
        let selection_active = highlight.is_some();

        for (edge_index, &(source, target, connection_index)) in scene.edges.iter().enumerate() {
            let start = scene.view_scratch.screen_positions[source];
            let end = scene.view_scratch.screen_positions[target];
            if !curve_visible(rect, start, end) {
                continue;
            }

            let mut stroke = connection_stroke(&scene.connections[connection_index]);
            if let Some(state) = &highlight {
                if state.related_edges.contains(&edge_index) {
                    stroke = Stroke::new(
                        (stroke.width * 1.6).min(6.0),
                        blend_color(stroke.color, HIGHLIGHT_COLOR, 0.55),
                    );
                } else {
                    stroke = Stroke::new(stroke.width, dim_color(stroke.color, 0.35));
                }
            }

            painter.add(QuadraticBezierShape::from_points_stroke(
                [start, curve_control_point(start, end), end],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }

        let hovered_index = hovered.map(|(index, _)| index);
        let mut selection_animating = false;

        for &index in &scene.view_scratch.visible_indices {
            let entity = &scene.entities[index];
            let position = scene.view_scratch.screen_positions[index];
            let radius = scene.view_scratch.screen_radii[index];

            let is_selected = self.interaction.selected.as_deref() == Some(entity.id.as_str());
            let is_hovered = hovered_index == Some(index);
            let is_related = highlight
                .as_ref()
                .is_some_and(|state| state.related_nodes.contains(&index));

            let base_fill = if is_hovered {
                NODE_FILL_HOVERED
            } else if selection_active && !is_related {
                dim_color(NODE_FILL, 0.55)
            } else {
                NODE_FILL
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("entity-selection", entity.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            painter.circle_filled(
                position,
                radius,
                blend_color(base_fill, NODE_FILL_SELECTED, selection_mix),
            );

            let mut risk_stroke = risk_color(entity.risk);
            if selection_active && !is_related && !is_selected {
                risk_stroke = dim_color(risk_stroke, 0.55);
            }
            painter.circle_stroke(position, radius, Stroke::new(2.0, risk_stroke));

            if entity.risk == crate::data::RiskLevel::Critical {
                painter.circle_stroke(
                    position,
                    radius + 5.0,
                    Stroke::new(
                        1.0,
                        Color32::from_rgba_unmultiplied(0xF5, 0x65, 0x65, 120),
                    ),
                );
            }

            if selection_mix > 0.0 {
                let halo_strength = (selection_mix * (1.0 - selection_mix) * 4.0).clamp(0.0, 1.0);
                let halo_alpha = (30.0 + (halo_strength * 145.0)) as u8;
                painter.circle_stroke(
                    position,
                    radius + 4.0 + ((1.0 - selection_mix) * 6.0),
                    Stroke::new(
                        1.0 + (halo_strength * 1.6),
                        Color32::from_rgba_unmultiplied(0xE2, 0xE8, 0xF0, halo_alpha),
                    ),
                );
            }

            let should_draw_label =
                is_selected || is_hovered || is_related || radius > 17.0 || zoom > 1.35;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &entity.id,
                    FontId::monospace(11.0),
                    if is_selected || is_hovered {
                        HIGHLIGHT_COLOR
                    } else {
                        LABEL_COLOR
                    },
                );
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(index) = hovered_index {
            let entity = &scene.entities[index];
            let overlay = format!(
                "{}  |  {} on {}  |  engagement {:.0}%  |  risk {}",
                entity.id,
                entity.kind.label(),
                entity.platform,
                entity.engagement,
                entity.risk.label()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                overlay,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
