use thiserror::Error;

/// Failure to turn a world document into a country list.
///
/// All variants are fatal to initialisation: nothing is rendered.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a TopoJSON Topology or GeoJSON FeatureCollection")]
    UnknownDocument,
    #[error("topology has no object named `{0}`")]
    MissingObject(String),
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcIndex { index: i64, count: usize },
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
    #[error("world document contains no countries")]
    Empty,
}
