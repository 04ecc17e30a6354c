mod common;

use tranzit_lib::{
    plan_direct_route, DirectRouteFinder, DirectRouteRequest, Error, PlanKind, UNKNOWN_ROUTE_NAME,
};

use common::fixture_snapshot;

fn plan(start: &str, goal: &str) -> tranzit_lib::Result<tranzit_lib::DirectRoutePlan> {
    let snapshot = fixture_snapshot();
    let request = DirectRouteRequest::new(start, goal, "1");
    plan_direct_route(&snapshot, &request, &DirectRouteFinder::default())
}

#[test]
fn outbound_trip_serves_consecutive_stops() {
    let plan = plan("4587", "4611").expect("route exists");

    assert_eq!(plan.kind, PlanKind::Direct);
    assert_eq!(plan.trip.trip_id.as_deref(), Some("24_0"));
    assert_eq!(plan.route.route_id.as_deref(), Some("24"));
    assert_eq!(plan.route.short_name, "24");
    assert_eq!(plan.route.long_name, "Piata Victoriei - Vatra Luminoasa");
    assert_eq!(
        plan.polyline,
        vec![[44.4267, 26.1024], [44.4285, 26.106], [44.4299, 26.1099]]
    );
}

#[test]
fn longer_span_includes_intermediate_points_in_sequence_order() {
    let plan = plan("4587", "4650").expect("route exists");
    assert_eq!(plan.trip.trip_id.as_deref(), Some("24_0"));
    assert_eq!(plan.point_count(), 5);
    assert_eq!(plan.polyline.first(), Some(&[44.4267, 26.1024]));
    assert_eq!(plan.polyline.last(), Some(&[44.4399, 26.1299]));
}

#[test]
fn return_direction_uses_the_opposite_trip() {
    let plan = plan("4611", "4587").expect("route exists");
    assert_eq!(plan.trip.trip_id.as_deref(), Some("24_1"));
    assert_eq!(plan.trip.direction_id, Some(1));
    assert_eq!(plan.point_count(), 3);
}

#[test]
fn route_without_metadata_uses_placeholder_names() {
    let plan = plan("4650", "4700").expect("route exists");
    assert_eq!(plan.trip.trip_id.as_deref(), Some("99_0"));
    assert_eq!(plan.route.route_id.as_deref(), Some("99"));
    assert_eq!(plan.route.short_name, UNKNOWN_ROUTE_NAME);
    assert_eq!(plan.route.long_name, UNKNOWN_ROUTE_NAME);
}

#[test]
fn unserved_pair_is_not_found() {
    let err = plan("4587", "9001").expect_err("no trip reaches the depot");
    assert!(matches!(err, Error::RouteNotFound { .. }));
    assert!(err.is_not_found());

    let err = plan("4700", "4650").expect_err("line 99 runs one way only");
    assert!(err.is_not_found());
}

#[test]
fn unknown_stop_is_invalid_input() {
    let err = plan("4587", "123456").expect_err("stop does not exist");
    assert!(matches!(err, Error::UnknownStop { ref stop_id } if stop_id == "123456"));
}

#[test]
fn tighter_threshold_finds_nothing() {
    let snapshot = fixture_snapshot();
    let request = DirectRouteRequest::new("4587", "4611", "1");
    let finder = DirectRouteFinder::new(5.0).unwrap();
    let err = plan_direct_route(&snapshot, &request, &finder).expect_err("points are ~14 m away");
    assert!(err.is_not_found());
}

#[test]
fn plan_serialises_to_wire_shape() {
    let plan = plan("4587", "4611").expect("route exists");
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["type"], "direct");
    assert_eq!(json["trip"]["trip_id"], "24_0");
    assert_eq!(json["trip"]["route_id"], "24");
    assert_eq!(json["route"]["route_id"], "24");
    assert_eq!(json["polyline"].as_array().map(Vec::len), Some(3));
}
