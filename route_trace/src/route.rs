use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use geom::{Distance, GeoPoint};

use crate::{measure, Trace};

/// A smoothed trace and its length. Measuring again produces a whole new one.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredRoute {
    trace: Trace,
    distance: Distance,
}

impl MeasuredRoute {
    pub fn new(trace: Trace) -> MeasuredRoute {
        let distance = measure(&trace);
        MeasuredRoute { trace, distance }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// `padding` is a fraction; 0.1 reports 10% more than was measured.
    pub fn padded_distance(&self, padding: f64) -> Distance {
        self.distance * (1.0 + padding)
    }

    /// Like "3.07 miles", truncated and never rounded.
    pub fn label(&self, padding: f64) -> String {
        self.padded_distance(padding).to_truncated_miles_string()
    }

    /// Where to anchor the label: the middle point of the route, counting every stroke.
    pub fn label_anchor(&self) -> Option<GeoPoint> {
        let n = self.trace.num_points();
        self.trace.all_points().nth(n / 2)
    }

    /// Every point of every stroke, joined into one polyline for drawing.
    pub fn combined_polyline(&self) -> Vec<GeoPoint> {
        self.trace.all_points().collect()
    }

    /// One MultiLineString feature, one line per stroke, labeled with the distance. Strokes too
    /// short to form a line are skipped.
    pub fn to_geojson(&self, padding: f64) -> FeatureCollection {
        let lines: Vec<Vec<Vec<f64>>> = self
            .trace
            .segments()
            .iter()
            .filter(|segment| segment.len() >= 2)
            .map(|segment| segment.iter().map(|pt| pt.to_geojson_coords()).collect())
            .collect();

        let distance = self.padded_distance(padding);
        let mut properties = JsonObject::new();
        properties.insert(
            "distance_miles".to_string(),
            serde_json::Value::from(distance.to_miles()),
        );
        properties.insert(
            "label".to_string(),
            serde_json::Value::from(distance.to_truncated_miles_string()),
        );

        FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::MultiLineString(lines))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }],
            foreign_members: None,
        }
    }
}
