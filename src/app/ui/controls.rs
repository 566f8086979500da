use eframe::egui::{self, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::data::EntityKind;

use super::super::ViewModel;

const QUICK_SELECT_ROWS: usize = 8;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Network Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        ui.label("Search (id, type, or platform)")
            .on_hover_text("Entities failing the match are removed from the graph.");
        changed |= ui.text_edit_singleline(&mut self.criteria.query).changed();

        self.draw_quick_select(ui);

        ui.separator();

        let platform_label = self
            .criteria
            .platform
            .clone()
            .unwrap_or_else(|| "All platforms".to_owned());
        egui::ComboBox::from_label("Platform")
            .selected_text(platform_label)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut self.criteria.platform, None, "All platforms")
                    .changed();
                for platform in self.data.platforms() {
                    let label = platform.clone();
                    changed |= ui
                        .selectable_value(&mut self.criteria.platform, Some(platform), label)
                        .changed();
                }
            });

        let kind_label = self
            .criteria
            .kind
            .map(|kind| kind.label().to_owned())
            .unwrap_or_else(|| "All types".to_owned());
        egui::ComboBox::from_label("Type")
            .selected_text(kind_label)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut self.criteria.kind, None, "All types")
                    .changed();
                for kind in EntityKind::ALL {
                    changed |= ui
                        .selectable_value(&mut self.criteria.kind, Some(kind), kind.label())
                        .changed();
                }
            });

        changed |= ui
            .add(
                egui::Slider::new(&mut self.criteria.min_engagement, 0.0..=100.0)
                    .text("Min engagement")
                    .suffix("%"),
            )
            .changed();

        ui.separator();
        ui.label("Physics");
        ui.checkbox(&mut self.live_physics, "Live simulation");

        let mut params_changed = false;
        params_changed |= ui
            .add(
                egui::Slider::new(&mut self.force_params.link_distance, 40.0..=240.0)
                    .text("Link distance"),
            )
            .changed();
        params_changed |= ui
            .add(
                egui::Slider::new(&mut self.force_params.charge_strength, -2500.0..=-100.0)
                    .text("Repulsion"),
            )
            .changed();
        params_changed |= ui
            .add(
                egui::Slider::new(&mut self.force_params.collision_strength, 0.0..=2.0)
                    .text("Collision"),
            )
            .changed();

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
            }
            if ui.button("Reset physics").clicked() {
                self.force_params = Default::default();
                params_changed = true;
            }
        });

        ui.separator();
        ui.checkbox(&mut self.show_fps_bar, "Show FPS in top bar");

        // A rebuild reseeds alpha while keeping surviving positions, which
        // doubles as the reheat after a parameter change.
        if changed || params_changed {
            self.scene_dirty = true;
        }
    }

    /// Fuzzy-ranked shortcut list under the search box: clicking a row
    /// selects that entity without touching the filters.
    fn draw_quick_select(&mut self, ui: &mut Ui) {
        let query = self.criteria.query.trim().to_owned();
        if query.is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked: Vec<(i64, &str)> = self
            .data
            .entities
            .iter()
            .filter_map(|entity| {
                matcher
                    .fuzzy_match(&entity.id, &query)
                    .map(|score| (score, entity.id.as_str()))
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        ranked.truncate(QUICK_SELECT_ROWS);

        if ranked.is_empty() {
            return;
        }

        let mut pending = None;
        ui.add_space(2.0);
        ui.label("Quick select");
        for (_score, id) in ranked {
            if ui.small_button(id).clicked() {
                pending = Some(id.to_owned());
            }
        }
        if let Some(id) = pending {
            self.interaction.set_selected(Some(id));
        }
    }
}
