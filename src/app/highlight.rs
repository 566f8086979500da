use std::collections::HashSet;

use super::Scene;

/// Scene indices emphasized while an entity is selected: the entity, its
/// direct neighbors, and the connections between them.
pub(in crate::app) struct HighlightState {
    pub related_nodes: HashSet<usize>,
    pub related_edges: HashSet<usize>,
}

pub(in crate::app) fn build_highlight_state(scene: &Scene, selected_id: &str) -> Option<HighlightState> {
    let &selected = scene.index_by_id.get(selected_id)?;

    let mut related_nodes = HashSet::new();
    related_nodes.insert(selected);
    for &neighbor in &scene.neighbors[selected] {
        related_nodes.insert(neighbor);
    }

    let related_edges = scene
        .edges
        .iter()
        .enumerate()
        .filter_map(|(edge_index, &(source, target, _))| {
            (source == selected || target == selected).then_some(edge_index)
        })
        .collect();

    Some(HighlightState {
        related_nodes,
        related_edges,
    })
}
