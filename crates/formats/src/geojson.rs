use foundation::math::GeoPoint;
use serde_json::Value;

use crate::error::WorldError;
use crate::geometry::{Feature, Geometry, feature_id};

/// Reads a GeoJSON FeatureCollection. Features with a `null` geometry are kept
/// with `geometry: None` so indices line up with the source document.
pub fn features_from_collection(value: &Value) -> Result<Vec<Feature>, WorldError> {
    let obj = value.as_object().ok_or(WorldError::UnknownDocument)?;
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(WorldError::UnknownDocument)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let feat_obj = feat_val
            .as_object()
            .ok_or_else(|| WorldError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

        let feat_type = feat_obj.get("type").and_then(|v| v.as_str());
        if feat_type != Some("Feature") {
            return Err(WorldError::InvalidFeature {
                index,
                reason: format!("unexpected feature type: {feat_type:?}"),
            });
        }

        let geometry = match feat_obj.get("geometry") {
            None | Some(Value::Null) => None,
            Some(g) => Some(
                parse_geometry(g).map_err(|reason| WorldError::InvalidFeature { index, reason })?,
            ),
        };

        features.push(Feature {
            id: feature_id(feat_obj.get("id")),
            geometry,
        });
    }

    Ok(features)
}

pub fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_nested(coords, parse_points)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_nested(coords, parse_points)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_nested(coords, |poly| {
            parse_nested(poly, parse_points)
        })?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

pub(crate) fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    parse_nested(coords, parse_point)
}

fn parse_nested<T>(
    coords: &Value,
    item: impl Fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(item).collect()
}
