//! Straight-line walking estimate over a corridor. No road network is consulted.

use plan_schema::{Coordinate, RouteEstimate};

const EARTH_RADIUS_KM: f64 = 6371.0;
pub const WALKING_SPEED_KMH: f64 = 4.5;
const MIN_ETA_MINUTES: i64 = 20;

pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();
    let h = sin_lat * sin_lat + sin_lng * sin_lng * lat1.cos() * lat2.cos();
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn corridor_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .fold(0.0, |total, leg| total + leg)
}

fn format_eta(hours: f64) -> String {
    let total_minutes = ((hours * 60.0).round() as i64).max(MIN_ETA_MINUTES);
    let h = total_minutes / 60;
    let m = total_minutes % 60;
    if h == 0 {
        format!("~{m}m on foot")
    } else {
        format!("~{h}h {m:02}m on foot")
    }
}

pub fn estimate_route(points: &[Coordinate]) -> RouteEstimate {
    let distance_km = corridor_length_km(points);
    RouteEstimate {
        distance_km,
        distance_label: format!("~{distance_km:.1} km"),
        eta_label: format_eta(distance_km / WALKING_SPEED_KMH),
    }
}
