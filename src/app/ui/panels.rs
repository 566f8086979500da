use std::collections::VecDeque;
use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::data::NetworkData;

use super::super::filter::FilterCriteria;
use super::super::graph::{InteractionState, SelectionEvent};
use super::super::physics::ForceParams;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(data: NetworkData) -> Self {
        Self {
            data,
            criteria: FilterCriteria::default(),
            force_params: ForceParams::default(),
            live_physics: true,
            pan: Vec2::ZERO,
            zoom: 1.0,
            scene: None,
            scene_dirty: true,
            scene_epoch: 0,
            interaction: InteractionState::default(),
            visible_entity_count: 0,
            visible_connection_count: 0,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset_path: Option<&Path>,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        if self.scene_dirty {
            self.rebuild_scene();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("sociogram");
                    ui.separator();
                    match dataset_path {
                        Some(path) => ui.label(format!("dataset: {}", path.display())),
                        None => ui.label("dataset: built-in sample"),
                    };
                    ui.label(format!(
                        "entities: {}  edges: {}",
                        self.data.entity_count(),
                        self.data.connection_count()
                    ));
                    ui.label(format!("avg engagement: {:.0}%", self.data.avg_engagement()));
                    ui.label(format!("risk score: {}%", self.data.risk_score()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading relationship network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        // The outbound half of the interaction contract: every hover and
        // selection transition leaves the core exactly once.
        for event in self.interaction.drain_events() {
            match event {
                SelectionEvent::Hovered(id) => log::debug!("hover -> {id:?}"),
                SelectionEvent::Selected(id) => log::debug!("select -> {id:?}"),
            }
        }
    }
}
