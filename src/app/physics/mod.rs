mod forces;

use eframe::egui::Vec2;

use forces::{
    apply_axis_gravity, apply_charge_force, apply_collision_force, apply_link_force,
    recenter_on_origin,
};

pub(in crate::app) const ALPHA_MIN: f32 = 0.001;
pub(in crate::app) const DRAG_ALPHA_TARGET: f32 = 0.3;
const VELOCITY_DECAY: f32 = 0.6;

/// One node of the simulation frame. Position and velocity are owned here.
/// `pin` is the drag override: while set, the node snaps to it every tick
/// but keeps exerting forces on its neighbors.
#[derive(Clone, Debug)]
pub(in crate::app) struct SimNode {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub pin: Option<Vec2>,
    pub radius: f32,
}

/// An undirected spring between two node indices. Direction from the
/// dataset is irrelevant to the layout.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct SimLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct ForceParams {
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub charge_max_distance: f32,
    pub collision_strength: f32,
    pub axis_strength: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            link_strength: 0.5,
            charge_strength: -1000.0,
            charge_max_distance: 300.0,
            collision_strength: 1.0,
            axis_strength: 0.1,
        }
    }
}

/// The ephemeral simulation frame: rebuilt whenever the visible set
/// changes, mutated once per rendered frame until settled. `epoch` ties
/// interaction state to the frame it was started against so work belonging
/// to a superseded frame can be discarded.
pub(in crate::app) struct Simulation {
    pub nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    epoch: u64,
    ticks: u64,
}

impl Simulation {
    pub fn new(nodes: Vec<SimNode>, links: Vec<SimLink>, epoch: u64) -> Self {
        Self {
            nodes,
            links,
            alpha: 1.0,
            alpha_target: 0.0,
            // Reaches ALPHA_MIN after ~300 ticks from a fresh seed.
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            epoch,
            ticks: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True once the decay loop has run its course (or the frame is too
    /// small to ever move). Settled frames skip all force work.
    pub fn settled(&self) -> bool {
        self.nodes.len() < 2 || (self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN)
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn pin(&mut self, index: usize, pos: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(pos);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    pub fn unpin_all(&mut self) {
        for node in &mut self.nodes {
            node.pin = None;
        }
    }

    /// Advances the frame by one tick. Returns false without touching any
    /// node when the frame is settled, so a stray call after convergence
    /// is free.
    pub fn step(&mut self, params: &ForceParams) -> bool {
        if self.settled() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.ticks += 1;

        apply_link_force(
            &mut self.nodes,
            &self.links,
            params.link_distance,
            params.link_strength,
            self.alpha,
        );
        apply_charge_force(
            &mut self.nodes,
            params.charge_strength,
            params.charge_max_distance,
            self.alpha,
        );
        apply_axis_gravity(&mut self.nodes, params.axis_strength, self.alpha);
        apply_collision_force(&mut self.nodes, params.collision_strength);
        recenter_on_origin(&mut self.nodes);

        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel *= VELOCITY_DECAY;
                node.pos += node.vel;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn node(id: &str, x: f32, y: f32) -> SimNode {
        SimNode {
            id: id.to_owned(),
            pos: vec2(x, y),
            vel: Vec2::ZERO,
            pin: None,
            radius: 10.0,
        }
    }

    fn pair(ax: f32, bx: f32, linked: bool) -> Simulation {
        let nodes = vec![node("a", ax, 0.0), node("b", bx, 0.0)];
        let links = if linked {
            vec![SimLink {
                source: 0,
                target: 1,
            }]
        } else {
            Vec::new()
        };
        Simulation::new(nodes, links, 0)
    }

    fn ring_graph(count: usize) -> Simulation {
        let nodes = (0..count)
            .map(|index| {
                let angle = index as f32 * std::f32::consts::TAU / count as f32;
                node(&format!("n{index}"), angle.cos() * 40.0, angle.sin() * 40.0)
            })
            .collect();
        let links = (0..count)
            .map(|index| SimLink {
                source: index,
                target: (index + 1) % count,
            })
            .collect();
        Simulation::new(nodes, links, 0)
    }

    #[test]
    fn degenerate_frames_are_idle() {
        let mut empty = Simulation::new(Vec::new(), Vec::new(), 0);
        assert!(empty.settled());
        assert!(!empty.step(&ForceParams::default()));

        let mut single = Simulation::new(vec![node("only", 3.0, 4.0)], Vec::new(), 0);
        assert!(single.settled());
        assert!(!single.step(&ForceParams::default()));
        assert_eq!(single.nodes[0].pos, vec2(3.0, 4.0));
        assert_eq!(single.ticks(), 0);
    }

    #[test]
    fn connected_graph_settles_within_bounded_ticks() {
        let mut sim = ring_graph(50);
        let params = ForceParams::default();
        let mut ticks = 0u32;
        while sim.step(&params) {
            ticks += 1;
            assert!(ticks <= 320, "simulation failed to settle");
        }
        assert!(sim.settled());
        assert!(sim.alpha() < ALPHA_MIN);
        for sim_node in &sim.nodes {
            assert!(sim_node.pos.x.is_finite() && sim_node.pos.y.is_finite());
        }
    }

    #[test]
    fn pinned_node_tracks_pin_exactly_and_resumes_on_release() {
        let mut sim = ring_graph(4);
        let params = ForceParams::default();
        let pin = vec2(200.0, -150.0);
        sim.pin(0, pin);
        sim.set_alpha_target(DRAG_ALPHA_TARGET);

        for _ in 0..10 {
            sim.step(&params);
            assert_eq!(sim.nodes[0].pos, pin);
            assert_eq!(sim.nodes[0].vel, Vec2::ZERO);
        }

        sim.unpin(0);
        sim.set_alpha_target(0.0);
        sim.step(&params);
        assert_ne!(sim.nodes[0].pos, pin);
    }

    #[test]
    fn pinned_node_still_deforms_its_neighbors() {
        // In a 4-ring, node 0 links to 1 and 3 but not to 2. Dragging node 0
        // far out must pull its linked neighbors after it, so they end up
        // closer to it than the unlinked node.
        let mut sim = ring_graph(4);
        let params = ForceParams::default();

        sim.pin(0, vec2(500.0, 0.0));
        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        for _ in 0..30 {
            sim.step(&params);
        }
        let linked = (sim.nodes[1].pos - sim.nodes[0].pos).length();
        let unlinked = (sim.nodes[2].pos - sim.nodes[0].pos).length();
        assert!(linked < unlinked, "linked {linked} vs unlinked {unlinked}");
    }

    #[test]
    fn link_force_is_symmetric_on_a_pair() {
        let mut sim = pair(-5.0, 5.0, true);
        sim.step(&ForceParams::default());
        let (a, b) = (&sim.nodes[0], &sim.nodes[1]);
        assert!((a.pos.x + b.pos.x).abs() < 1e-3);
        assert!((a.vel.x + b.vel.x).abs() < 1e-3);
    }

    #[test]
    fn linked_pair_spreads_toward_target_separation() {
        let mut sim = pair(-5.0, 5.0, true);
        let params = ForceParams::default();
        while sim.step(&params) {}
        let distance = (sim.nodes[0].pos - sim.nodes[1].pos).length();
        assert!(
            distance > 50.0 && distance < 320.0,
            "unexpected separation {distance}"
        );
    }

    #[test]
    fn charge_is_capped_by_max_interaction_distance() {
        let params = ForceParams {
            link_strength: 0.0,
            collision_strength: 0.0,
            axis_strength: 0.0,
            ..ForceParams::default()
        };

        let mut far = pair(-250.0, 250.0, false);
        far.step(&params);
        assert_eq!(far.nodes[0].vel, Vec2::ZERO);
        assert_eq!(far.nodes[1].vel, Vec2::ZERO);

        let mut near = pair(-50.0, 50.0, false);
        near.step(&params);
        assert!(near.nodes[0].vel.x < 0.0);
        assert!(near.nodes[1].vel.x > 0.0);
    }

    #[test]
    fn collision_pushes_overlapping_nodes_apart() {
        let params = ForceParams {
            link_strength: 0.0,
            charge_strength: 0.0,
            axis_strength: 0.0,
            ..ForceParams::default()
        };
        let mut sim = pair(-4.0, 4.0, false);
        for _ in 0..60 {
            sim.step(&params);
        }
        let distance = (sim.nodes[0].pos - sim.nodes[1].pos).length();
        assert!(distance >= 18.0, "still overlapping at {distance}");
    }

    #[test]
    fn reheat_keeps_the_frame_live_until_cooled() {
        let mut sim = ring_graph(3);
        let params = ForceParams::default();
        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        for _ in 0..600 {
            sim.step(&params);
        }
        assert!(!sim.settled());
        assert!(sim.alpha() > ALPHA_MIN);

        sim.set_alpha_target(0.0);
        while sim.step(&params) {}
        assert!(sim.settled());
    }

    #[test]
    fn coincident_nodes_are_separated_deterministically() {
        let mut first = pair(0.0, 0.0, true);
        let mut second = pair(0.0, 0.0, true);
        let params = ForceParams::default();
        for _ in 0..20 {
            first.step(&params);
            second.step(&params);
        }
        assert!((first.nodes[0].pos - first.nodes[1].pos).length() > 1.0);
        assert_eq!(first.nodes[0].pos, second.nodes[0].pos);
        assert_eq!(first.nodes[1].pos, second.nodes[1].pos);
    }
}
