use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::model::NetworkData;

/// Demo dataset bundled into the binary, used when no `--dataset` path is
/// given on the command line.
pub const SAMPLE_NETWORK_JSON: &str = include_str!("../../assets/sample_network.json");

pub fn load_network(path: &Path) -> Result<NetworkData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read network dataset {}", path.display()))?;
    parse_network(&raw).with_context(|| format!("failed to parse network dataset {}", path.display()))
}

pub fn sample_network() -> Result<NetworkData> {
    parse_network(SAMPLE_NETWORK_JSON).context("failed to parse embedded sample network")
}

/// Parses a `{nodes, links}` document. Duplicate entity ids keep the first
/// occurrence. Connection endpoints are not validated here, the filter
/// engine owns the dangling-endpoint rule.
pub fn parse_network(raw: &str) -> Result<NetworkData> {
    let mut data: NetworkData =
        serde_json::from_str(raw).context("network dataset is not valid JSON")?;

    if data.entities.is_empty() {
        return Err(anyhow!("network dataset contains no entities"));
    }

    let mut seen = HashSet::with_capacity(data.entities.len());
    data.entities.retain(|entity| {
        let fresh = seen.insert(entity.id.clone());
        if !fresh {
            log::warn!("duplicate entity id {:?} in dataset, keeping first", entity.id);
        }
        fresh
    });

    Ok(data)
}
