use foundation::math::GeoPoint;
use serde_json::Value;

use crate::centroid::planar_centroid;
use crate::error::WorldError;
use crate::geojson::features_from_collection;
use crate::geometry::{Feature, Geometry};
use crate::topojson::Topology;

/// Object holding the country polygons in the standard world topologies.
pub const COUNTRIES_OBJECT: &str = "countries";

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// Position in the country list; the key used by selection and auto-cycling.
    pub index: usize,
    pub id: Option<String>,
    pub name: String,
    pub geometry: Geometry,
    pub centroid: GeoPoint,
}

impl Country {
    /// Rotation target that brings this country to the view centre.
    pub fn focus_point(&self) -> GeoPoint {
        self.centroid.negated()
    }
}

/// Countries decoded from a world document, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldDocument {
    countries: Vec<Country>,
    skipped: usize,
}

impl WorldDocument {
    pub fn from_json_str(payload: &str) -> Result<Self, WorldError> {
        Self::from_json_str_with_object(payload, COUNTRIES_OBJECT)
    }

    pub fn from_json_str_with_object(payload: &str, object: &str) -> Result<Self, WorldError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value, object)
    }

    /// Accepts a TopoJSON `Topology` (reading `object`) or a GeoJSON
    /// `FeatureCollection` (where `object` is ignored).
    pub fn from_value(value: Value, object: &str) -> Result<Self, WorldError> {
        let features = match value.get("type").and_then(Value::as_str) {
            Some("Topology") => Topology::from_value(value)?.features(object)?,
            Some("FeatureCollection") => features_from_collection(&value)?,
            _ => return Err(WorldError::UnknownDocument),
        };
        Self::from_features(features)
    }

    /// Keeps features that have geometry and a centroid; the rest cannot be
    /// drawn or focused and are dropped with a warning.
    pub fn from_features(features: Vec<Feature>) -> Result<Self, WorldError> {
        let total = features.len();
        let mut countries = Vec::with_capacity(total);
        for feature in features {
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let Some(centroid) = planar_centroid(&geometry).filter(|c| c.is_finite()) else {
                continue;
            };
            let index = countries.len();
            let name = feature
                .id
                .clone()
                .unwrap_or_else(|| format!("Country {}", index + 1));
            countries.push(Country {
                index,
                id: feature.id,
                name,
                geometry,
                centroid,
            });
        }

        let skipped = total - countries.len();
        if skipped > 0 {
            tracing::warn!(skipped, "dropped features without drawable geometry");
        }
        if countries.is_empty() {
            return Err(WorldError::Empty);
        }
        tracing::info!(countries = countries.len(), "world document decoded");

        Ok(Self { countries, skipped })
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn into_countries(self) -> Vec<Country> {
        self.countries
    }

    pub fn get(&self, index: usize) -> Option<&Country> {
        self.countries.get(index)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Number of source features that were dropped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::WorldDocument;
    use crate::error::WorldError;
    use pretty_assertions::assert_eq;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [0, 0] },
        "arcs": [
            [[0, 0], [4, 0], [0, 4], [-4, 0], [0, -4]],
            [[20, 10], [2, 0], [0, 2], [-2, 0], [0, -2]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "AAA", "arcs": [[0]] },
                    { "type": null, "id": "ZZZ" },
                    { "type": "MultiPolygon", "arcs": [[[1]]] }
                ]
            }
        }
    }"#;

    #[test]
    fn decodes_topology_countries() {
        let world = WorldDocument::from_json_str(TOPOLOGY).expect("decode");
        assert_eq!(world.len(), 2);
        assert_eq!(world.skipped(), 1);

        let a = world.get(0).unwrap();
        assert_eq!(a.name, "AAA");
        assert_eq!((a.centroid.lon_deg, a.centroid.lat_deg), (2.0, 2.0));
        assert_eq!((a.focus_point().lon_deg, a.focus_point().lat_deg), (-2.0, -2.0));

        let b = world.get(1).unwrap();
        assert_eq!(b.index, 1);
        assert_eq!(b.id, None);
        assert_eq!(b.name, "Country 2");
        assert_eq!((b.centroid.lon_deg, b.centroid.lat_deg), (21.0, 11.0));
    }

    #[test]
    fn decodes_feature_collection() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "BBB",
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]] }
            }]
        }"#;
        let world = WorldDocument::from_json_str(payload).expect("decode");
        assert_eq!(world.countries()[0].name, "BBB");
    }

    #[test]
    fn malformed_documents_are_fatal() {
        assert!(matches!(
            WorldDocument::from_json_str("{ not json"),
            Err(WorldError::Json(_))
        ));
        assert!(matches!(
            WorldDocument::from_json_str(r#"{ "type": "Feature" }"#),
            Err(WorldError::UnknownDocument)
        ));
        assert!(matches!(
            WorldDocument::from_json_str(r#"{ "type": "Topology", "arcs": [], "objects": {} }"#),
            Err(WorldError::MissingObject(_))
        ));
        assert!(matches!(
            WorldDocument::from_json_str(r#"{ "type": "FeatureCollection", "features": [] }"#),
            Err(WorldError::Empty)
        ));
    }
}
