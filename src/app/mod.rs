use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::data::{self, Connection, Entity, NetworkData};

mod filter;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod ui;

use filter::FilterCriteria;
use graph::InteractionState;
use physics::{ForceParams, Simulation};

pub struct SociogramApp {
    dataset_path: Option<PathBuf>,
    state: AppState,
    reload_rx: Option<Receiver<Result<NetworkData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<NetworkData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// All state behind a loaded dataset: the criteria, the current scene and
/// its simulation frame, the view transform, and the interaction session.
struct ViewModel {
    data: NetworkData,
    criteria: FilterCriteria,
    force_params: ForceParams,
    live_physics: bool,
    pan: Vec2,
    zoom: f32,
    scene: Option<Scene>,
    scene_dirty: bool,
    scene_epoch: u64,
    interaction: InteractionState,
    visible_entity_count: usize,
    visible_connection_count: usize,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

/// The visible subset wired up for simulation and drawing. Rebuilt as a
/// whole on every dataset/criteria change. `entities` is aligned with
/// `sim.nodes`; each edge is (source node, target node, index into
/// `connections`) for the drawable subset with both endpoints in scene.
struct Scene {
    sim: Simulation,
    entities: Vec<Entity>,
    connections: Vec<Connection>,
    edges: Vec<(usize, usize, usize)>,
    index_by_id: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    view_scratch: ViewScratch,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
}

impl SociogramApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset_path: Option<PathBuf>) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: Option<PathBuf>) -> Receiver<Result<NetworkData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match &dataset_path {
                Some(path) => data::load_network(path),
                None => data::sample_network(),
            };
            let _ = tx.send(result.map_err(|error| format!("{error:#}")));
        });

        rx
    }

    fn start_load(dataset_path: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for SociogramApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(network) => AppState::Ready(Box::new(ViewModel::new(network))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relationship network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relationship network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, self.dataset_path.as_deref(), &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(network) => AppState::Ready(Box::new(ViewModel::new(network))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
