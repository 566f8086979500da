use eframe::egui::{Vec2, vec2};

use super::{SimLink, SimNode};

/// Deterministic stand-in for d3's random jiggle: coincident pairs are
/// nudged apart along an index-derived direction so repeated runs over the
/// same dataset produce the same layout.
fn separation_jitter(source: usize, target: usize) -> Vec2 {
    let angle =
        ((source as f32) * 0.618_034 + (target as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * 1e-3
}

/// Hooke-style pull of each connected pair toward `distance`, split evenly
/// between the two endpoints.
pub(super) fn apply_link_force(
    nodes: &mut [SimNode],
    links: &[SimLink],
    distance: f32,
    strength: f32,
    alpha: f32,
) {
    for link in links {
        if link.source >= nodes.len() || link.target >= nodes.len() || link.source == link.target {
            continue;
        }

        let source = &nodes[link.source];
        let target = &nodes[link.target];
        let mut delta = (target.pos + target.vel) - (source.pos + source.vel);
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_jitter(link.source, link.target);
        }

        let length = delta.length();
        let pull = delta * ((length - distance) / length * strength * alpha * 0.5);

        nodes[link.target].vel -= pull;
        nodes[link.source].vel += pull;
    }
}

/// Charge-like pairwise repulsion (negative `strength` repels), ignored
/// beyond `max_distance` so distant clusters do not interact.
pub(super) fn apply_charge_force(
    nodes: &mut [SimNode],
    strength: f32,
    max_distance: f32,
    alpha: f32,
) {
    let max_distance_sq = max_distance * max_distance;
    let count = nodes.len();

    for i in 0..count {
        for j in (i + 1)..count {
            let mut delta = nodes[j].pos - nodes[i].pos;
            if delta.length_sq() <= f32::EPSILON {
                delta = separation_jitter(i, j);
            }

            let distance_sq = delta.length_sq();
            if distance_sq > max_distance_sq {
                continue;
            }

            let weight = strength * alpha / distance_sq.max(1.0);
            nodes[i].vel += delta * weight;
            nodes[j].vel -= delta * weight;
        }
    }
}

/// Weak independent pulls toward the origin on each axis; keeps sparse
/// graphs from wandering.
pub(super) fn apply_axis_gravity(nodes: &mut [SimNode], strength: f32, alpha: f32) {
    for node in nodes.iter_mut() {
        node.vel.x -= node.pos.x * strength * alpha;
        node.vel.y -= node.pos.y * strength * alpha;
    }
}

/// Minimum-separation enforcement at the nodes' visual radii, resolved
/// after the velocity forces on the predicted positions.
pub(super) fn apply_collision_force(nodes: &mut [SimNode], strength: f32) {
    if strength <= 0.0 {
        return;
    }

    let count = nodes.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let min_distance = nodes[i].radius + nodes[j].radius;
            let mut delta =
                (nodes[j].pos + nodes[j].vel) - (nodes[i].pos + nodes[i].vel);
            if delta.length_sq() <= f32::EPSILON {
                delta = separation_jitter(i, j);
            }

            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }

            let push = delta * ((min_distance - distance) / distance * strength * 0.5);
            nodes[i].vel -= push;
            nodes[j].vel += push;
        }
    }
}

/// Shifts every position so the centroid sits on the origin. Pinned nodes
/// are shifted too and snap back during integration, matching how the rest
/// of the graph flows around a dragged node.
pub(super) fn recenter_on_origin(nodes: &mut [SimNode]) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    if centroid.length_sq() <= f32::EPSILON {
        return;
    }
    for node in nodes.iter_mut() {
        node.pos -= centroid;
    }
}
