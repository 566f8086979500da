use eframe::egui::{self, RichText, Ui};

use crate::util::format_count;

use super::super::ViewModel;
use super::super::render_utils::{COLLISION_PADDING, entity_radius};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Entity Details");
        ui.add_space(6.0);

        let Some(focus_id) = self
            .interaction
            .selected
            .clone()
            .or_else(|| self.interaction.hovered.clone())
        else {
            ui.label("Hover or select an entity in the graph.");
            return;
        };

        let Some(entity) = self.data.entity(&focus_id).cloned() else {
            ui.label("Selected entity no longer exists in the dataset.");
            return;
        };

        ui.label(RichText::new(&entity.id).strong());
        ui.small(format!("{} on {}", entity.kind.label(), entity.platform));
        ui.add_space(6.0);

        ui.label(format!("Followers: {}", format_count(entity.followers)));
        ui.label(format!("Posts: {}", format_count(entity.posts)));
        ui.label(format!("Engagement: {:.0}%", entity.engagement));
        ui.label(format!("Sentiment: {:+.2}", entity.sentiment));
        ui.label(format!("Risk level: {}", entity.risk.label()));
        ui.label(format!("Cluster group: {}", entity.group));

        if !entity.extras.is_empty() {
            ui.add_space(4.0);
            for (key, value) in &entity.extras {
                ui.small(format!("{key}: {value}"));
            }
        }

        ui.separator();
        ui.label(RichText::new("Connections").strong());

        let visible: std::collections::HashSet<&str> = self
            .scene
            .as_ref()
            .map(|scene| {
                scene
                    .entities
                    .iter()
                    .map(|entity| entity.id.as_str())
                    .collect()
            })
            .unwrap_or_default();

        let mut rows = Vec::new();
        for connection in &self.data.connections {
            if !connection.touches(&entity.id) {
                continue;
            }
            let other = connection.other_endpoint(&entity.id).to_owned();
            if self.data.entity(&other).is_none() {
                continue;
            }
            let in_view = visible.contains(other.as_str());
            rows.push((other, connection.kind, connection.interactions, in_view));
        }

        if rows.is_empty() {
            ui.label("No connections recorded for this entity.");
        } else {
            let mut pending = None;
            egui::ScrollArea::vertical()
                .id_salt("entity_connections_scroll")
                .max_height(320.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (other, kind, interactions, in_view) in &rows {
                        let flag = if *in_view { "" } else { "  (filtered out)" };
                        let text = format!(
                            "{other}  ·  {}  ·  {} interactions{flag}",
                            kind.label(),
                            format_count(*interactions)
                        );
                        if ui.small_button(text).clicked() {
                            pending = Some(other.clone());
                        }
                    }
                });
            if let Some(id) = pending {
                self.interaction.set_selected(Some(id));
            }
        }

        ui.separator();
        ui.small(format!(
            "Rendered radius {:.1}px · collision radius {:.1}px",
            entity_radius(entity.weight),
            entity_radius(entity.weight) + COLLISION_PADDING
        ));
    }
}
