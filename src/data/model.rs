use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Influencer,
    Brand,
    Community,
    Competitor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        Self::Account,
        Self::Influencer,
        Self::Brand,
        Self::Community,
        Self::Competitor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Influencer => "influencer",
            Self::Brand => "brand",
            Self::Community => "community",
            Self::Competitor => "competitor",
        }
    }
}

/// Risk classification, ordered from benign to critical.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn is_elevated(self) -> bool {
        self >= Self::High
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Strong,
    Weak,
    Potential,
    Risk,
}

impl ConnectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::Potential => "potential",
            Self::Risk => "risk",
        }
    }
}

/// A node in the relationship graph. `id` is the join key between the
/// dataset, the simulation, and the interaction state; positions and
/// velocities live in the simulation frame, never here.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Entity {
    pub id: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub group: u32,
    #[serde(rename = "value")]
    pub weight: f32,
    #[serde(default)]
    pub sentiment: f32,
    pub engagement: f32,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub posts: u64,
    #[serde(rename = "threatLevel")]
    pub risk: RiskLevel,
    /// Platform-specific presentation-only fields. The filter and the
    /// simulation never look at these.
    #[serde(flatten)]
    pub extras: BTreeMap<String, serde_json::Value>,
}

/// A weighted relation between two entity ids. Direction is retained for
/// display but the layout treats the pair symmetrically.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(rename = "value")]
    pub strength: f32,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    #[serde(default)]
    pub sentiment: f32,
    #[serde(default)]
    pub interactions: u64,
}

impl Connection {
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    pub fn other_endpoint<'a>(&'a self, id: &str) -> &'a str {
        if self.source == id {
            &self.target
        } else {
            &self.source
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NetworkData {
    #[serde(rename = "nodes")]
    pub entities: Vec<Entity>,
    #[serde(rename = "links")]
    pub connections: Vec<Connection>,
}

impl NetworkData {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn avg_engagement(&self) -> f32 {
        if self.entities.is_empty() {
            return 0.0;
        }
        let total: f32 = self.entities.iter().map(|entity| entity.engagement).sum();
        total / self.entities.len() as f32
    }

    /// Share of entities at high or critical risk, as a rounded percentage.
    pub fn risk_score(&self) -> u32 {
        if self.entities.is_empty() {
            return 0;
        }
        let elevated = self
            .entities
            .iter()
            .filter(|entity| entity.risk.is_elevated())
            .count();
        ((elevated as f32 / self.entities.len() as f32) * 100.0).round() as u32
    }

    /// Distinct platform tags in first-seen order.
    pub fn platforms(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for entity in &self.entities {
            if !seen.contains(&entity.platform) {
                seen.push(entity.platform.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, engagement: f32, risk: RiskLevel) -> Entity {
        Entity {
            id: id.to_owned(),
            platform: "twitter".to_owned(),
            kind: EntityKind::Account,
            group: 1,
            weight: 10.0,
            sentiment: 0.0,
            engagement,
            followers: 0,
            posts: 0,
            risk,
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert!(!RiskLevel::Medium.is_elevated());
        assert!(RiskLevel::High.is_elevated());
    }

    #[test]
    fn metrics_over_empty_dataset_are_zero() {
        let data = NetworkData::default();
        assert_eq!(data.avg_engagement(), 0.0);
        assert_eq!(data.risk_score(), 0);
    }

    #[test]
    fn risk_score_counts_elevated_share() {
        let data = NetworkData {
            entities: vec![
                entity("a", 80.0, RiskLevel::Low),
                entity("b", 60.0, RiskLevel::High),
                entity("c", 40.0, RiskLevel::Critical),
                entity("d", 20.0, RiskLevel::Medium),
            ],
            connections: Vec::new(),
        };
        assert_eq!(data.risk_score(), 50);
        assert_eq!(data.avg_engagement(), 50.0);
    }

    #[test]
    fn platforms_are_deduplicated_in_order() {
        let mut data = NetworkData {
            entities: vec![
                entity("a", 1.0, RiskLevel::Low),
                entity("b", 1.0, RiskLevel::Low),
            ],
            connections: Vec::new(),
        };
        data.entities[1].platform = "reddit".to_owned();
        data.entities.push(entity("c", 1.0, RiskLevel::Low));
        assert_eq!(data.platforms(), vec!["twitter", "reddit"]);
    }
}
