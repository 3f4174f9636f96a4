//! TopoJSON topology decoding.
//!
//! Arcs are shared polylines; geometries reference them by index, with `~i`
//! (that is `-i - 1`) meaning arc `i` traversed backwards. Quantized topologies
//! carry a `transform` and delta-encode each arc's positions.

use foundation::math::GeoPoint;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::WorldError;
use crate::geometry::{Feature, Geometry, Ring, feature_id};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: Map<String, Value>,
}

/// A topology with its arcs already decoded into absolute positions.
#[derive(Debug, Clone)]
pub struct Topology {
    pub transform: Option<Transform>,
    arcs: Vec<Vec<GeoPoint>>,
    objects: Map<String, Value>,
}

impl Topology {
    pub fn from_value(value: Value) -> Result<Self, WorldError> {
        let raw: RawTopology = serde_json::from_value(value)?;
        let arcs = raw
            .arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| decode_arc(arc, raw.transform.as_ref(), index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            transform: raw.transform,
            arcs,
            objects: raw.objects,
        })
    }

    /// Decodes a named object into features. A `GeometryCollection` yields one
    /// feature per member; any other geometry yields a single feature.
    pub fn features(&self, object: &str) -> Result<Vec<Feature>, WorldError> {
        let value = self
            .objects
            .get(object)
            .ok_or_else(|| WorldError::MissingObject(object.to_string()))?;

        if value.get("type").and_then(Value::as_str) == Some("GeometryCollection") {
            let members = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| WorldError::InvalidFeature {
                    index: 0,
                    reason: "GeometryCollection without geometries".to_string(),
                })?;
            members
                .iter()
                .enumerate()
                .map(|(index, member)| self.feature(member, index))
                .collect()
        } else {
            Ok(vec![self.feature(value, 0)?])
        }
    }

    fn feature(&self, value: &Value, index: usize) -> Result<Feature, WorldError> {
        let obj = value.as_object().ok_or_else(|| WorldError::InvalidFeature {
            index,
            reason: "geometry must be an object".to_string(),
        })?;
        let invalid = |reason: String| WorldError::InvalidFeature { index, reason };

        let geometry = match obj.get("type").and_then(Value::as_str) {
            // `null` types are legal and mean "no geometry".
            None => None,
            Some("Point") => Some(Geometry::Point(
                self.position(obj.get("coordinates")).map_err(invalid)?,
            )),
            Some("MultiPoint") => {
                let coords = obj
                    .get("coordinates")
                    .and_then(Value::as_array)
                    .ok_or_else(|| invalid("MultiPoint without coordinates".to_string()))?;
                let points = coords
                    .iter()
                    .map(|c| self.position(Some(c)))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                Some(Geometry::MultiPoint(points))
            }
            Some("LineString") => Some(Geometry::LineString(self.line(&arc_list(obj, index)?)?)),
            Some("MultiLineString") => Some(Geometry::MultiLineString(
                nested_arc_lists(obj, index)?
                    .iter()
                    .map(|arcs| self.line(arcs))
                    .collect::<Result<_, _>>()?,
            )),
            Some("Polygon") => Some(Geometry::Polygon(
                self.polygon(&nested_arc_lists(obj, index)?)?,
            )),
            Some("MultiPolygon") => {
                let polys = obj
                    .get("arcs")
                    .and_then(Value::as_array)
                    .ok_or_else(|| invalid("MultiPolygon without arcs".to_string()))?;
                let mut out = Vec::with_capacity(polys.len());
                for poly in polys {
                    let rings = poly
                        .as_array()
                        .ok_or_else(|| invalid("polygon arcs must be an array".to_string()))?
                        .iter()
                        .map(|ring| indices(ring, index))
                        .collect::<Result<Vec<_>, _>>()?;
                    out.push(self.polygon(&rings)?);
                }
                Some(Geometry::MultiPolygon(out))
            }
            Some(other) => return Err(invalid(format!("unsupported geometry type: {other}"))),
        };

        Ok(Feature {
            id: feature_id(obj.get("id")),
            geometry,
        })
    }

    fn position(&self, coords: Option<&Value>) -> Result<GeoPoint, String> {
        let p = crate::geojson::parse_point(coords.ok_or("missing coordinates".to_string())?)?;
        Ok(match &self.transform {
            Some(t) => t.apply(p.lon_deg, p.lat_deg),
            None => p,
        })
    }

    fn arc(&self, index: i64) -> Result<Vec<GeoPoint>, WorldError> {
        let (slot, reversed) = if index < 0 {
            (!index, true)
        } else {
            (index, false)
        };
        let arc = usize::try_from(slot)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(WorldError::ArcIndex {
                index,
                count: self.arcs.len(),
            })?;
        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Stitches arcs end to end, dropping each shared joint once.
    fn line(&self, arcs: &[i64]) -> Result<Vec<GeoPoint>, WorldError> {
        let mut out: Vec<GeoPoint> = Vec::new();
        for &index in arcs {
            let points = self.arc(index)?;
            if !out.is_empty() {
                out.pop();
            }
            out.extend(points);
        }
        Ok(out)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Vec<Ring>, WorldError> {
        rings.iter().map(|ring| self.line(ring)).collect()
    }
}

fn decode_arc(
    arc: &[Vec<f64>],
    transform: Option<&Transform>,
    index: usize,
) -> Result<Vec<GeoPoint>, WorldError> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for position in arc {
        let [px, py, ..] = position.as_slice() else {
            return Err(WorldError::InvalidFeature {
                index,
                reason: "arc position must have two coordinates".to_string(),
            });
        };
        match transform {
            Some(t) => {
                x += px;
                y += py;
                out.push(t.apply(x, y));
            }
            None => out.push(GeoPoint::new(*px, *py)),
        }
    }
    Ok(out)
}

fn indices(value: &Value, index: usize) -> Result<Vec<i64>, WorldError> {
    value
        .as_array()
        .ok_or_else(|| WorldError::InvalidFeature {
            index,
            reason: "arc list must be an array".to_string(),
        })?
        .iter()
        .map(|v| {
            v.as_i64().ok_or_else(|| WorldError::InvalidFeature {
                index,
                reason: format!("arc index must be an integer, got {v}"),
            })
        })
        .collect()
}

fn arc_list(obj: &Map<String, Value>, index: usize) -> Result<Vec<i64>, WorldError> {
    let arcs = obj.get("arcs").ok_or_else(|| WorldError::InvalidFeature {
        index,
        reason: "geometry without arcs".to_string(),
    })?;
    indices(arcs, index)
}

fn nested_arc_lists(obj: &Map<String, Value>, index: usize) -> Result<Vec<Vec<i64>>, WorldError> {
    obj.get("arcs")
        .and_then(Value::as_array)
        .ok_or_else(|| WorldError::InvalidFeature {
            index,
            reason: "geometry without arcs".to_string(),
        })?
        .iter()
        .map(|ring| indices(ring, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Topology;
    use crate::error::WorldError;
    use crate::geometry::Geometry;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn square_topology() -> Topology {
        // Two arcs forming a unit square: bottom+right, then top+left.
        Topology::from_value(json!({
            "type": "Topology",
            "transform": { "scale": [0.5, 0.5], "translate": [10.0, 20.0] },
            "arcs": [
                [[0, 0], [2, 0], [0, 2]],
                [[2, 2], [-2, 0], [0, -2]]
            ],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": 4, "arcs": [[0, 1]] },
                        { "type": "LineString", "arcs": [-1] },
                        { "type": null }
                    ]
                }
            }
        }))
        .expect("valid topology")
    }

    #[test]
    fn delta_decodes_and_stitches_ring() {
        let topo = square_topology();
        let features = topo.features("countries").expect("features");
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].id.as_deref(), Some("4"));
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Polygon(vec![vec![
                GeoPoint::new(10.0, 20.0),
                GeoPoint::new(11.0, 20.0),
                GeoPoint::new(11.0, 21.0),
                GeoPoint::new(10.0, 21.0),
                GeoPoint::new(10.0, 20.0),
            ]]))
        );
    }

    #[test]
    fn negative_index_reverses_arc() {
        let features = square_topology().features("countries").expect("features");
        assert_eq!(
            features[1].geometry,
            Some(Geometry::LineString(vec![
                GeoPoint::new(11.0, 21.0),
                GeoPoint::new(11.0, 20.0),
                GeoPoint::new(10.0, 20.0),
            ]))
        );
    }

    #[test]
    fn null_type_has_no_geometry() {
        let features = square_topology().features("countries").expect("features");
        assert!(features[2].geometry.is_none());
    }

    #[test]
    fn missing_object_is_reported() {
        let err = square_topology().features("land").unwrap_err();
        assert!(matches!(err, WorldError::MissingObject(name) if name == "land"));
    }

    #[test]
    fn out_of_range_arc_is_an_error() {
        let topo = Topology::from_value(json!({
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]]],
            "objects": { "countries": { "type": "LineString", "arcs": [3] } }
        }))
        .expect("valid topology");
        let err = topo.features("countries").unwrap_err();
        assert!(matches!(err, WorldError::ArcIndex { index: 3, count: 1 }));
    }

    #[test]
    fn untransformed_arcs_are_absolute() {
        let topo = Topology::from_value(json!({
            "type": "Topology",
            "arcs": [[[5.5, 1.0], [6.5, 2.0]]],
            "objects": { "route": { "type": "LineString", "arcs": [0] } }
        }))
        .expect("valid topology");
        let features = topo.features("route").expect("features");
        assert_eq!(
            features[0].geometry,
            Some(Geometry::LineString(vec![
                GeoPoint::new(5.5, 1.0),
                GeoPoint::new(6.5, 2.0),
            ]))
        );
    }
}
