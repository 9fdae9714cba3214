//! Request and response types for the Camino endpoints.
//!
//! Requests are checked locally with [`Validate`] before anything goes on the wire.
//! Responses are checked after decoding, so out-of-range values from the server surface as
//! [`Error::Decode`](crate::Error::Decode) instead of leaking into caller code.
//!
//! Units: distances are meters, durations are seconds, angles are degrees.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Endpoint-specific fields the server is free to add to.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Local request checks, run before any network call.
pub trait Validate {
    /// Returns [`Error::Validation`] naming the first offending field.
    fn validate(&self) -> Result<()>;
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino_ai::Coordinate;
    ///
    /// assert!(Coordinate::new(40.7831, -73.9712).is_ok());
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    fn check(&self, field: &'static str) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::validation(
                field,
                format!("latitude {} outside [-90, 90]", self.lat),
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::validation(
                field,
                format!("longitude {} outside [-180, 180]", self.lng),
            ));
        }
        Ok(())
    }
}

impl Validate for Coordinate {
    fn validate(&self) -> Result<()> {
        self.check("coordinate")
    }
}

/// A location given either as coordinates or as text the server geocodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationRef {
    Coordinate(Coordinate),
    Place(String),
}

impl LocationRef {
    fn check(&self, field: &'static str) -> Result<()> {
        match self {
            LocationRef::Coordinate(coordinate) => coordinate.check(field),
            LocationRef::Place(text) if text.trim().is_empty() => {
                Err(Error::validation(field, "place description is empty"))
            }
            LocationRef::Place(_) => Ok(()),
        }
    }
}

impl From<Coordinate> for LocationRef {
    fn from(coordinate: Coordinate) -> Self {
        LocationRef::Coordinate(coordinate)
    }
}

impl From<&str> for LocationRef {
    fn from(text: &str) -> Self {
        LocationRef::Place(text.to_string())
    }
}

impl From<String> for LocationRef {
    fn from(text: String) -> Self {
        LocationRef::Place(text)
    }
}

/// How the traveller moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Cycling,
    Transit,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Transit => "transit",
        })
    }
}

/// Which spatial relationship to compute between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    #[default]
    Distance,
    Direction,
    TravelTime,
    Description,
}

/// Natural language place search, optionally biased to an area.
///
/// # Examples
///
/// ```
/// use camino_ai::{Coordinate, QueryRequest};
///
/// let request = QueryRequest::new("quiet coffee shops")
///     .with_location(Coordinate { lat: 40.7831, lng: -73.9712 })
///     .with_radius(1000.0)
///     .with_limit(10);
/// assert_eq!(request.limit, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Search radius in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Results to skip, for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: None,
            radius: None,
            limit: None,
            offset: None,
        }
    }

    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_radius(mut self, meters: f64) -> Self {
        self.radius = Some(meters);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl Validate for QueryRequest {
    fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::validation("query", "query text is empty"));
        }
        if let Some(location) = &self.location {
            location.check("location")?;
        }
        if let Some(radius) = self.radius {
            check_non_negative("radius", radius)?;
        }
        if self.limit == Some(0) {
            return Err(Error::validation("limit", "limit must be positive"));
        }
        Ok(())
    }
}

/// Spatial relationship between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRequest {
    pub from: LocationRef,
    pub to: LocationRef,
    #[serde(default)]
    pub relationship_type: RelationshipType,
}

impl RelationshipRequest {
    pub fn new(
        from: impl Into<LocationRef>,
        to: impl Into<LocationRef>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship_type,
        }
    }
}

impl Validate for RelationshipRequest {
    fn validate(&self) -> Result<()> {
        self.from.check("from")?;
        self.to.check("to")
    }
}

/// Describe the surroundings of a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRequest {
    pub location: Coordinate,
    /// Radius in meters.
    pub radius: f64,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<String>,
}

impl ContextRequest {
    pub fn new(location: Coordinate, radius: f64) -> Self {
        Self {
            location,
            radius,
            categories: BTreeSet::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }
}

impl Validate for ContextRequest {
    fn validate(&self) -> Result<()> {
        self.location.check("location")?;
        check_non_negative("radius", self.radius)?;
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::validation("categories", "category names must not be empty"));
        }
        Ok(())
    }
}

/// Limits on a multi-stop journey.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JourneyConstraints {
    #[serde(default)]
    pub transport_mode: TransportMode,
    /// Longest acceptable journey, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    #[serde(default)]
    pub avoid_tolls: bool,
}

/// Plan a journey through two or more waypoints.
///
/// # Examples
///
/// ```
/// use camino_ai::{Coordinate, JourneyRequest, TransportMode, Validate};
///
/// let request = JourneyRequest::new(vec![
///     Coordinate { lat: 40.7831, lng: -73.9712 }.into(),
///     "Brooklyn Bridge".into(),
/// ])
/// .with_transport_mode(TransportMode::Walking)
/// .optimized(true);
///
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyRequest {
    pub waypoints: Vec<LocationRef>,
    #[serde(default)]
    pub constraints: JourneyConstraints,
    #[serde(default)]
    pub optimize: bool,
}

impl JourneyRequest {
    pub fn new(waypoints: Vec<LocationRef>) -> Self {
        Self {
            waypoints,
            constraints: JourneyConstraints::default(),
            optimize: false,
        }
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.constraints.transport_mode = mode;
        self
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.constraints.max_duration = Some(max_duration.as_secs_f64());
        self
    }

    pub fn avoid_tolls(mut self, avoid: bool) -> Self {
        self.constraints.avoid_tolls = avoid;
        self
    }

    /// Lets the server reorder intermediate stops.
    pub fn optimized(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

impl Validate for JourneyRequest {
    fn validate(&self) -> Result<()> {
        if self.waypoints.len() < 2 {
            return Err(Error::validation(
                "waypoints",
                format!("need at least 2 waypoints, got {}", self.waypoints.len()),
            ));
        }
        for waypoint in &self.waypoints {
            waypoint.check("waypoints")?;
        }
        if let Some(max_duration) = self.constraints.max_duration {
            if !max_duration.is_finite() || max_duration <= 0.0 {
                return Err(Error::validation(
                    "constraints.max_duration",
                    format!("max duration must be positive, got {}", max_duration),
                ));
            }
        }
        Ok(())
    }
}

/// Point to point route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: LocationRef,
    pub end: LocationRef,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub avoid_highways: bool,
}

impl RouteRequest {
    pub fn new(start: impl Into<LocationRef>, end: impl Into<LocationRef>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            transport_mode: TransportMode::default(),
            avoid_highways: false,
        }
    }

    pub fn with_transport_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = mode;
        self
    }

    pub fn avoid_highways(mut self, avoid: bool) -> Self {
        self.avoid_highways = avoid;
        self
    }
}

impl Validate for RouteRequest {
    fn validate(&self) -> Result<()> {
        self.start.check("start")?;
        self.end.check("end")
    }
}

/// A place matched by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub category: Option<String>,
    /// Match confidence in `[0, 1]`, present on AI-ranked matches.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Response of `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub results: Vec<Place>,
    pub total: u64,
    #[serde(rename = "queryId")]
    pub query_id: String,
}

/// Response of `POST /relationship`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipResult {
    /// Meters.
    pub distance: f64,
    /// Degrees clockwise from true north, in `[0, 360)`.
    pub bearing: f64,
    pub relationship: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A nearby place and how far it is from the context location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    #[serde(flatten)]
    pub place: Place,
    /// Meters.
    pub distance: f64,
}

/// Response of `POST /context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResult {
    pub location: Coordinate,
    #[serde(default)]
    pub context: Metadata,
    #[serde(default)]
    pub nearby: Vec<NearbyPlace>,
}

/// One leg of a route or journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub transport_mode: Option<TransportMode>,
}

/// Response of `POST /journey`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyResult {
    /// Meters.
    pub total_distance: f64,
    /// Seconds.
    pub total_duration: f64,
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Indices into the request's waypoints, in travel order. Empty means input order.
    #[serde(default)]
    pub optimized_order: Vec<usize>,
}

impl JourneyResult {
    /// Applies [`optimized_order`](Self::optimized_order) to the request's waypoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino_ai::JourneyResult;
    ///
    /// let result = JourneyResult {
    ///     total_distance: 1200.0,
    ///     total_duration: 900.0,
    ///     segments: vec![],
    ///     optimized_order: vec![2, 0, 1],
    /// };
    /// assert_eq!(result.ordered(&["a", "b", "c"]), vec!["c", "a", "b"]);
    /// ```
    pub fn ordered<T: Clone>(&self, waypoints: &[T]) -> Vec<T> {
        if self.optimized_order.is_empty() {
            return waypoints.to_vec();
        }
        self.optimized_order
            .iter()
            .filter_map(|&index| waypoints.get(index).cloned())
            .collect()
    }

    pub fn total_time(&self) -> Duration {
        seconds(self.total_duration)
    }
}

/// Response of `POST /route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Encoded path geometry, passed through untouched.
    pub polyline: String,
}

impl RouteResult {
    pub fn travel_time(&self) -> Duration {
        seconds(self.duration)
    }
}

/// Post-decode range checks. The error string becomes the decode failure reason.
pub(crate) trait CheckDecoded {
    fn check_decoded(&self) -> std::result::Result<(), String>;
}

impl CheckDecoded for Coordinate {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        self.check("coordinate").map_err(|e| e.to_string())
    }
}

impl CheckDecoded for Place {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        self.coordinate.check_decoded()?;
        match self.confidence {
            Some(confidence) if !(0.0..=1.0).contains(&confidence) => Err(format!(
                "confidence {} of `{}` outside [0, 1]",
                confidence, self.name
            )),
            _ => Ok(()),
        }
    }
}

impl CheckDecoded for QueryResult {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        self.results.iter().try_for_each(Place::check_decoded)
    }
}

impl CheckDecoded for RelationshipResult {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        non_negative("distance", self.distance)?;
        if !(0.0..360.0).contains(&self.bearing) {
            return Err(format!("bearing {} outside [0, 360)", self.bearing));
        }
        Ok(())
    }
}

impl CheckDecoded for ContextResult {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        self.location.check_decoded()?;
        for nearby in &self.nearby {
            nearby.place.check_decoded()?;
            non_negative("nearby distance", nearby.distance)?;
        }
        Ok(())
    }
}

impl CheckDecoded for Segment {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        self.start.check_decoded()?;
        self.end.check_decoded()?;
        non_negative("segment distance", self.distance)?;
        non_negative("segment duration", self.duration)
    }
}

impl CheckDecoded for JourneyResult {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        non_negative("total_distance", self.total_distance)?;
        non_negative("total_duration", self.total_duration)?;
        self.segments.iter().try_for_each(Segment::check_decoded)?;

        let mut seen = vec![false; self.optimized_order.len()];
        for &index in &self.optimized_order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(format!(
                        "optimized_order {:?} is not a permutation",
                        self.optimized_order
                    ))
                }
            }
        }
        Ok(())
    }
}

impl CheckDecoded for RouteResult {
    fn check_decoded(&self) -> std::result::Result<(), String> {
        non_negative("distance", self.distance)?;
        non_negative("duration", self.duration)?;
        self.segments.iter().try_for_each(Segment::check_decoded)
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    non_negative(field, value).map_err(|message| Error::validation(field, message))
}

fn non_negative(field: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be a non-negative number, got {}", field, value))
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    fn park() -> Coordinate {
        Coordinate {
            lat: 40.7831,
            lng: -73.9712,
        }
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());

        for (lat, lng) in [
            (90.5, 0.0),
            (-91.0, 0.0),
            (0.0, 180.1),
            (0.0, -200.0),
            (f64::NAN, 0.0),
            (0.0, f64::INFINITY),
        ] {
            let err = Coordinate::new(lat, lng).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{} {}", lat, lng);
        }
    }

    #[test]
    fn test_coordinate_wire_shape() {
        assert_eq!(
            serde_json::to_value(park()).unwrap(),
            json!({"lat": 40.7831, "lng": -73.9712})
        );
    }

    #[test]
    fn test_location_ref_is_untagged() {
        let coordinate: LocationRef = serde_json::from_value(json!({"lat": 1.0, "lng": 2.0})).unwrap();
        assert_eq!(coordinate, LocationRef::Coordinate(Coordinate { lat: 1.0, lng: 2.0 }));

        let place: LocationRef = serde_json::from_value(json!("Times Square")).unwrap();
        assert_eq!(place, LocationRef::Place("Times Square".to_string()));
        assert_eq!(serde_json::to_value(&place).unwrap(), json!("Times Square"));
    }

    #[test]
    fn test_query_request_skips_unset_fields() {
        let value = serde_json::to_value(QueryRequest::new("coffee shops")).unwrap();
        assert_eq!(value, json!({"query": "coffee shops"}));
    }

    #[test]
    fn test_query_request_validation() {
        assert!(QueryRequest::new("coffee").validate().is_ok());
        assert!(QueryRequest::new("  ").validate().is_err());
        assert!(QueryRequest::new("coffee").with_radius(-1.0).validate().is_err());
        assert!(QueryRequest::new("coffee").with_limit(0).validate().is_err());

        let err = QueryRequest::new("coffee")
            .with_location(Coordinate { lat: 100.0, lng: 0.0 })
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "location", .. }));
    }

    #[test]
    fn test_transport_mode_names() {
        assert_eq!(serde_json::to_value(TransportMode::Driving).unwrap(), json!("driving"));
        assert_eq!(serde_json::to_value(TransportMode::Transit).unwrap(), json!("transit"));
        assert_eq!(TransportMode::Cycling.to_string(), "cycling");
        assert_eq!(
            serde_json::to_value(RelationshipType::TravelTime).unwrap(),
            json!("travel_time")
        );
    }

    #[test]
    fn test_relationship_rejects_empty_place() {
        let request = RelationshipRequest::new(park(), "", RelationshipType::Direction);
        assert!(matches!(
            request.validate(),
            Err(Error::Validation { field: "to", .. })
        ));
    }

    #[test]
    fn test_context_validation() {
        assert!(ContextRequest::new(park(), 500.0)
            .with_category("restaurants")
            .validate()
            .is_ok());
        assert!(ContextRequest::new(park(), -5.0).validate().is_err());
        assert!(ContextRequest::new(park(), 5.0).with_category("").validate().is_err());
    }

    #[test]
    fn test_journey_needs_two_waypoints() {
        let err = JourneyRequest::new(vec![park().into()]).validate().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "waypoints", .. }));
        assert!(JourneyRequest::new(vec![]).validate().is_err());
    }

    #[test]
    fn test_journey_max_duration_must_be_positive() {
        let mut request = JourneyRequest::new(vec![park().into(), "Home".into()]);
        request.constraints.max_duration = Some(0.0);
        assert!(request.validate().is_err());

        let request = request.with_max_duration(Duration::from_secs(7200));
        assert!(request.validate().is_ok());
        assert_eq!(request.constraints.max_duration, Some(7200.0));
    }

    #[test]
    fn test_journey_request_wire_shape() {
        let request = JourneyRequest::new(vec![park().into(), "Brooklyn Bridge".into()])
            .with_transport_mode(TransportMode::Walking)
            .avoid_tolls(true)
            .optimized(true);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "waypoints": [{"lat": 40.7831, "lng": -73.9712}, "Brooklyn Bridge"],
                "constraints": {"transport_mode": "walking", "avoid_tolls": true},
                "optimize": true
            })
        );
    }

    #[test]
    fn test_optimized_order_reorders_waypoints() {
        let request = JourneyRequest::new(vec!["A".into(), "B".into(), "C".into()]);
        let result: JourneyResult = serde_json::from_value(json!({
            "total_distance": 5400.0,
            "total_duration": 1800.0,
            "segments": [],
            "optimized_order": [2, 0, 1]
        }))
        .unwrap();

        assert!(result.check_decoded().is_ok());
        assert_eq!(
            result.ordered(&request.waypoints),
            vec![
                LocationRef::from("C"),
                LocationRef::from("A"),
                LocationRef::from("B")
            ]
        );
        assert_eq!(result.total_time(), Duration::from_secs(1800));
    }

    #[test]
    fn test_bad_optimized_order_fails_check() {
        for order in [vec![0, 0, 1], vec![0, 3, 1]] {
            let result = JourneyResult {
                total_distance: 1.0,
                total_duration: 1.0,
                segments: vec![],
                optimized_order: order,
            };
            assert!(result.check_decoded().is_err());
        }
    }

    #[test]
    fn test_place_confidence_range() {
        let mut place: Place = serde_json::from_value(json!({
            "name": "Central Perk",
            "coordinate": {"lat": 40.7831, "lng": -73.9712},
            "confidence": 0.92,
            "metadata": {"phone": "555-1234"}
        }))
        .unwrap();
        assert!(place.check_decoded().is_ok());
        assert_eq!(place.metadata["phone"], "555-1234");
        assert_eq!(place.address, None);

        place.confidence = Some(1.5);
        assert!(place.check_decoded().is_err());
    }

    #[test]
    fn test_relationship_bearing_range() {
        let mut result = RelationshipResult {
            distance: 1235.0,
            bearing: 225.0,
            relationship: "southwest".to_string(),
            metadata: Metadata::new(),
        };
        assert!(result.check_decoded().is_ok());

        result.bearing = 360.0;
        assert!(result.check_decoded().is_err());
    }

    #[test]
    fn test_nearby_place_flattens() {
        let context: ContextResult = serde_json::from_value(json!({
            "location": {"lat": 40.7831, "lng": -73.9712},
            "context": {"area_description": "Upper West Side"},
            "nearby": [{
                "name": "Zabar's",
                "coordinate": {"lat": 40.7849, "lng": -73.9795},
                "category": "shop",
                "distance": 350.5
            }]
        }))
        .unwrap();

        assert!(context.check_decoded().is_ok());
        assert_eq!(context.nearby[0].place.name, "Zabar's");
        assert_eq!(context.nearby[0].distance, 350.5);
        assert_eq!(context.context["area_description"], "Upper West Side");
    }
}
