//! Plans an optimized walking journey with the blocking client and cancels a slow call.
//!
//! Run with: `CAMINO_API_KEY=... cargo run --example journey_planning`

use camino_ai::{
    BlockingClient, CancelToken, Config, Coordinate, JourneyRequest, RouteRequest, TransportMode,
};
use std::time::Duration;

fn main() -> Result<(), camino_ai::Error> {
    tracing_subscriber::fmt()
        .with_env_filter("camino_ai=info")
        .init();

    let api_key = std::env::var("CAMINO_API_KEY").unwrap_or_default();
    let client = BlockingClient::new(
        Config::builder(api_key)
            .deadline(Duration::from_secs(60))
            .build()?,
    )?;

    let request = JourneyRequest::new(vec![
        Coordinate {
            lat: 40.7831,
            lng: -73.9712,
        }
        .into(),
        "Brooklyn Bridge".into(),
        "Times Square".into(),
        "The High Line".into(),
    ])
    .with_transport_mode(TransportMode::Walking)
    .with_max_duration(Duration::from_secs(4 * 60 * 60))
    .optimized(true);

    let plan = client.journey(&request)?;
    println!(
        "{:.1} km in {:?}",
        plan.total_distance / 1000.0,
        plan.total_time()
    );
    for (stop, waypoint) in plan.ordered(&request.waypoints).iter().enumerate() {
        println!("  {}. {:?}", stop + 1, waypoint);
    }

    // Cancel a route lookup from another thread if it takes too long
    let token = CancelToken::new();
    let cancellable = client.with_cancel_token(token.clone());
    let watchdog = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(2));
        token.cancel();
    });

    match cancellable.route(&RouteRequest::new("Times Square", "JFK Airport")) {
        Ok(route) => println!("Route: {:.0} m, {:?}", route.distance, route.travel_time()),
        Err(e) => println!("Route lookup stopped: {}", e),
    }
    let _ = watchdog.join();

    Ok(())
}
