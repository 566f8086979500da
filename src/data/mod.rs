mod load;
mod model;

pub use load::{load_network, parse_network, sample_network};
pub use model::{Connection, ConnectionKind, Entity, EntityKind, NetworkData, RiskLevel};
