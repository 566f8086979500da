use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::super::filter::filter_network;
use super::super::physics::{SimLink, SimNode, Simulation};
use super::super::render_utils::{COLLISION_PADDING, entity_radius};
use super::super::{Scene, ViewModel, ViewScratch};

fn seed_position(id: &str, index: usize) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    let mut direction = vec2(jx, jy);
    if direction.length_sq() <= 0.0001 {
        let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
        direction = vec2(angle.cos(), angle.sin());
    }
    direction * 150.0
}

impl ViewModel {
    /// Discards the current scene and builds a fresh one from the filtered
    /// dataset. Runs on every dataset or criteria change: the epoch
    /// advances so interaction state tied to the superseded frame becomes
    /// inert, any active drag is cancelled, and the new frame starts from
    /// `alpha = 1`. Entities that survive the change keep their position
    /// and velocity so the layout re-settles instead of re-exploding.
    pub(in crate::app) fn rebuild_scene(&mut self) {
        self.scene_epoch = self.scene_epoch.wrapping_add(1);
        self.interaction.cancel_drag();

        let filtered = filter_network(&self.data, &self.criteria);
        log::debug!(
            "scene rebuild (epoch {}): {} entities, {} connections visible",
            self.scene_epoch,
            filtered.entities.len(),
            filtered.connections.len()
        );

        self.visible_entity_count = filtered.entities.len();
        self.visible_connection_count = filtered.connections.len();

        if filtered.entities.is_empty() {
            self.scene = None;
            self.scene_dirty = false;
            return;
        }

        let prior: HashMap<String, (Vec2, Vec2)> = self
            .scene
            .take()
            .map(|scene| {
                scene
                    .sim
                    .nodes
                    .into_iter()
                    .map(|node| (node.id, (node.pos, node.vel)))
                    .collect()
            })
            .unwrap_or_default();

        let mut index_by_id = HashMap::with_capacity(filtered.entities.len());
        let mut nodes = Vec::with_capacity(filtered.entities.len());
        for (index, entity) in filtered.entities.iter().enumerate() {
            index_by_id.insert(entity.id.clone(), index);
            let (pos, vel) = prior
                .get(&entity.id)
                .copied()
                .unwrap_or_else(|| (seed_position(&entity.id, index), Vec2::ZERO));
            nodes.push(SimNode {
                id: entity.id.clone(),
                pos,
                vel,
                pin: None,
                radius: entity_radius(entity.weight) + COLLISION_PADDING,
            });
        }

        // Only connections with both endpoints in the scene become springs
        // and drawable curves; the rest of the visible set (one endpoint
        // filtered out) is surfaced through the details panel instead.
        let mut edges = Vec::new();
        let mut links = Vec::new();
        for (connection_index, connection) in filtered.connections.iter().enumerate() {
            if let (Some(&source), Some(&target)) = (
                index_by_id.get(&connection.source),
                index_by_id.get(&connection.target),
            ) && source != target
            {
                edges.push((source, target, connection_index));
                links.push(SimLink { source, target });
            }
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for &(source, target, _) in &edges {
            if !neighbors[source].contains(&target) {
                neighbors[source].push(target);
            }
            if !neighbors[target].contains(&source) {
                neighbors[target].push(source);
            }
        }

        self.scene = Some(Scene {
            sim: Simulation::new(nodes, links, self.scene_epoch),
            entities: filtered.entities,
            connections: filtered.connections,
            edges,
            index_by_id,
            neighbors,
            view_scratch: ViewScratch::default(),
        });
        self.scene_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::ViewModel;
    use crate::data::sample_network;

    #[test]
    fn rebuild_populates_scene_from_sample_data() {
        let mut model = ViewModel::new(sample_network().expect("sample parses"));
        model.rebuild_scene();

        let scene = model.scene.as_ref().expect("scene built");
        assert_eq!(scene.entities.len(), 16);
        assert_eq!(scene.edges.len(), 16);
        assert_eq!(scene.sim.nodes.len(), 16);
        assert_eq!(model.visible_connection_count, 16);
        assert!(scene.index_by_id.contains_key("@techleader"));

        // Springs reference valid scene nodes only.
        for &(source, target, connection_index) in &scene.edges {
            assert!(source < scene.sim.nodes.len());
            assert!(target < scene.sim.nodes.len());
            assert!(connection_index < scene.connections.len());
        }
    }

    #[test]
    fn rebuild_with_no_matches_yields_empty_scene() {
        let mut model = ViewModel::new(sample_network().expect("sample parses"));
        model.criteria.query = "no such entity".to_owned();
        model.rebuild_scene();
        assert!(model.scene.is_none());
        assert_eq!(model.visible_entity_count, 0);
        assert_eq!(model.visible_connection_count, 0);
    }

    #[test]
    fn surviving_entities_keep_their_positions_across_rebuilds() {
        let mut model = ViewModel::new(sample_network().expect("sample parses"));
        model.rebuild_scene();

        let params = model.force_params;
        {
            let scene = model.scene.as_mut().expect("scene built");
            for _ in 0..40 {
                scene.sim.step(&params);
            }
        }
        let settled_pos = {
            let scene = model.scene.as_ref().unwrap();
            let index = scene.index_by_id["@techleader"];
            scene.sim.nodes[index].pos
        };

        model.criteria.min_engagement = 80.0;
        model.rebuild_scene();
        let scene = model.scene.as_ref().expect("scene built");
        let index = scene.index_by_id["@techleader"];
        assert_eq!(scene.sim.nodes[index].pos, settled_pos);
        // The frame itself is fresh: alpha reset, zero ticks.
        assert_eq!(scene.sim.ticks(), 0);
        assert_eq!(scene.sim.alpha(), 1.0);
    }

    #[test]
    fn rebuild_advances_the_epoch() {
        let mut model = ViewModel::new(sample_network().expect("sample parses"));
        model.rebuild_scene();
        let first = model.scene.as_ref().unwrap().sim.epoch();
        model.rebuild_scene();
        let second = model.scene.as_ref().unwrap().sim.epoch();
        assert_eq!(second, first + 1);
    }
}
