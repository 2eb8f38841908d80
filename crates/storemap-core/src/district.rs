//! District boundaries and spatial lookup.
//!
//! Districts arrive as GeoJSON geometries (`[lng, lat]` positions). The
//! boundary is converted once, at deserialization, into a `geo` multipolygon
//! so point lookups never re-parse coordinates.

use std::collections::BTreeMap;

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::LatLng;

/// A GeoJSON position: `[lng, lat]` with an optional trailing altitude.
pub type Position = Vec<f64>;

/// The subset of GeoJSON geometry types the districts endpoint emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    fn polygons(&self) -> Vec<&[Vec<Position>]> {
        match self {
            Geometry::Polygon(rings) => vec![rings.as_slice()],
            Geometry::MultiPolygon(polys) => polys.iter().map(Vec::as_slice).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawDistrict {
    name: String,
    geom: Geometry,
}

/// A named administrative boundary. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDistrict")]
pub struct District {
    pub name: String,
    pub geom: Geometry,
    shape: MultiPolygon<f64>,
}

impl TryFrom<RawDistrict> for District {
    type Error = String;

    fn try_from(raw: RawDistrict) -> Result<Self, Self::Error> {
        let shape = to_multi_polygon(&raw.geom)
            .map_err(|reason| format!("district \"{}\": {reason}", raw.name))?;
        Ok(Self {
            name: raw.name,
            geom: raw.geom,
            shape,
        })
    }
}

impl District {
    /// # Errors
    ///
    /// Returns a description of the first malformed ring or position.
    pub fn new(name: impl Into<String>, geom: Geometry) -> Result<Self, String> {
        Self::try_from(RawDistrict {
            name: name.into(),
            geom,
        })
    }

    /// Point-in-polygon test. Holes are excluded, boundary points are outside.
    #[must_use]
    pub fn contains(&self, at: LatLng) -> bool {
        self.shape.contains(&Point::new(at.lng, at.lat))
    }

    /// Every polygon as map-ready lat/lng paths, holes included.
    #[must_use]
    pub fn outlines(&self) -> Vec<Outline> {
        self.shape
            .iter()
            .map(|poly| Outline {
                exterior: to_path(poly.exterior()),
                holes: poly.interiors().iter().map(to_path).collect(),
            })
            .collect()
    }
}

/// One polygon of a district boundary in lat/lng order.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub exterior: Vec<LatLng>,
    /// Areas cut out of the exterior; points inside them are outside the
    /// district.
    pub holes: Vec<Vec<LatLng>>,
}

fn to_path(ring: &LineString<f64>) -> Vec<LatLng> {
    ring.coords().map(|c| LatLng::new(c.y, c.x)).collect()
}

fn to_multi_polygon(geom: &Geometry) -> Result<MultiPolygon<f64>, String> {
    let polygons = geom
        .polygons()
        .into_iter()
        .map(to_polygon)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiPolygon::new(polygons))
}

fn to_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|ring| to_line_string(ring));
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon has no rings".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_line_string(ring: &[Position]) -> Result<LineString<f64>, String> {
    if ring.len() < 3 {
        return Err(format!("ring has {} positions, need at least 3", ring.len()));
    }
    ring.iter()
        .map(|pos| match pos.as_slice() {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Ok(Coord { x: *lng, y: *lat }),
            other => Err(format!("invalid position {other:?}")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// First district whose boundary contains `at`.
#[must_use]
pub fn locate_district(districts: &[District], at: LatLng) -> Option<&District> {
    districts.iter().find(|d| d.contains(at))
}

/// Branch count per district, as returned by `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictStats(BTreeMap<String, u64>);

impl DistrictStats {
    /// `(district, count)` pairs in district-name order.
    pub fn bars(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    #[must_use]
    pub fn count_for(&self, district: &str) -> Option<u64> {
        self.0.get(district).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for DistrictStats {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Position> {
        vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]
    }

    #[test]
    fn polygon_contains_inner_point() {
        let d = District::new("Square", Geometry::Polygon(vec![square(0.0, 10.0)])).unwrap();
        assert!(d.contains(LatLng::new(5.0, 5.0)));
        assert!(!d.contains(LatLng::new(15.0, 5.0)));
    }

    #[test]
    fn hole_is_outside() {
        let d = District::new(
            "Donut",
            Geometry::Polygon(vec![square(0.0, 10.0), square(4.0, 6.0)]),
        )
        .unwrap();
        assert!(!d.contains(LatLng::new(5.0, 5.0)));
        assert!(d.contains(LatLng::new(2.0, 2.0)));
    }

    #[test]
    fn multipolygon_checks_every_part() {
        let d = District::new(
            "Islands",
            Geometry::MultiPolygon(vec![vec![square(0.0, 1.0)], vec![square(20.0, 21.0)]]),
        )
        .unwrap();
        assert!(d.contains(LatLng::new(20.5, 20.5)));
        assert!(!d.contains(LatLng::new(10.0, 10.0)));
    }

    #[test]
    fn locate_picks_containing_district() {
        let districts = vec![
            District::new("West", Geometry::Polygon(vec![square(0.0, 10.0)])).unwrap(),
            District::new("East", Geometry::Polygon(vec![square(10.5, 20.0)])).unwrap(),
        ];
        let found = locate_district(&districts, LatLng::new(15.0, 15.0));
        assert_eq!(found.map(|d| d.name.as_str()), Some("East"));
        assert!(locate_district(&districts, LatLng::new(-5.0, -5.0)).is_none());
    }

    #[test]
    fn deserializes_geojson_multipolygon_with_altitude() {
        let json = serde_json::json!({
            "name": "Hoan Kiem",
            "geom": {
                "type": "MultiPolygon",
                "coordinates": [[[[105.84, 21.02, 0.0], [105.86, 21.02, 0.0],
                                  [105.86, 21.04, 0.0], [105.84, 21.04, 0.0],
                                  [105.84, 21.02, 0.0]]]]
            }
        });
        let d: District = serde_json::from_value(json).expect("should parse");
        assert!(d.contains(LatLng::new(21.03, 105.85)));
        let outlines = d.outlines();
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].exterior[0], LatLng::new(21.02, 105.84));
        assert!(outlines[0].holes.is_empty());
    }

    #[test]
    fn outlines_keep_holes_that_lookup_excludes() {
        let d = District::new(
            "Lake",
            Geometry::Polygon(vec![square(0.0, 10.0), square(4.0, 6.0)]),
        )
        .unwrap();
        assert!(!d.contains(LatLng::new(5.0, 5.0)));
        assert!(d.contains(LatLng::new(2.0, 2.0)));

        let outlines = d.outlines();
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].holes.len(), 1);
        assert!(outlines[0].holes[0].contains(&LatLng::new(4.0, 4.0)));
    }

    #[test]
    fn rejects_degenerate_ring() {
        let json = serde_json::json!({
            "name": "Broken",
            "geom": { "type": "Polygon", "coordinates": [[[1.0, 1.0], [2.0, 2.0]]] }
        });
        let err = serde_json::from_value::<District>(json).unwrap_err();
        assert!(err.to_string().contains("Broken"), "got: {err}");
    }

    #[test]
    fn rejects_unknown_geometry_type() {
        let json = serde_json::json!({
            "name": "Line",
            "geom": { "type": "LineString", "coordinates": [[1.0, 1.0], [2.0, 2.0]] }
        });
        assert!(serde_json::from_value::<District>(json).is_err());
    }

    #[test]
    fn stats_are_ordered_and_summed() {
        let stats: DistrictStats =
            serde_json::from_value(serde_json::json!({"Tay Ho": 2, "Ba Dinh": 5})).unwrap();
        let bars: Vec<_> = stats.bars().collect();
        assert_eq!(bars, vec![("Ba Dinh", 5), ("Tay Ho", 2)]);
        assert_eq!(stats.total(), 7);
        assert_eq!(stats.count_for("Tay Ho"), Some(2));
    }
}
