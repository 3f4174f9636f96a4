use foundation::math::GeoPoint;
use serde_json::Value;

pub type Ring = Vec<GeoPoint>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Visits every vertex in document order.
    pub fn for_each_point(&self, mut f: impl FnMut(GeoPoint)) {
        match self {
            Geometry::Point(p) => f(*p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().copied().for_each(f),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().flatten().copied().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().copied().for_each(f),
        }
    }

    pub fn vertex_count(&self) -> usize {
        let mut n = 0;
        self.for_each_point(|_| n += 1);
        n
    }

    /// Polygon rings grouped per polygon; empty for non-areal geometry.
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon(rings) => vec![rings.as_slice()],
            Geometry::MultiPolygon(polys) => polys.iter().map(|p| p.as_slice()).collect(),
            _ => Vec::new(),
        }
    }
}

/// A geometry plus its identifier, as read from either document format.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub geometry: Option<Geometry>,
}

/// Feature ids may be strings or numbers; anything else is treated as absent.
pub fn feature_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, feature_id};
    use foundation::math::GeoPoint;
    use serde_json::json;

    #[test]
    fn counts_vertices_across_parts() {
        let square = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let g = Geometry::MultiPolygon(vec![vec![square.clone()], vec![square]]);
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.polygons().len(), 2);
        assert!(Geometry::Point(GeoPoint::new(0.0, 0.0)).polygons().is_empty());
    }

    #[test]
    fn ids_from_strings_and_numbers() {
        assert_eq!(feature_id(Some(&json!("FRA"))), Some("FRA".to_string()));
        assert_eq!(feature_id(Some(&json!(250))), Some("250".to_string()));
        assert_eq!(feature_id(Some(&json!(""))), None);
        assert_eq!(feature_id(Some(&json!(null))), None);
        assert_eq!(feature_id(None), None);
    }
}
