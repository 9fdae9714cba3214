//! Basic example: search for places, then describe the area around the best match.
//!
//! Run with: `CAMINO_API_KEY=... cargo run --example basic`

use camino_ai::{Client, Config, ContextRequest, Coordinate, Error, QueryRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("camino_ai=debug,basic=info")
        .init();

    let api_key = std::env::var("CAMINO_API_KEY").unwrap_or_default();
    let config = Config::builder(api_key)
        .timeout(Duration::from_secs(15))
        .build()?;
    let client = Client::new(config)?;

    println!("=== Query ===");
    let request = QueryRequest::new("quiet coffee shops with wifi")
        .with_location(Coordinate {
            lat: 40.7831,
            lng: -73.9712,
        })
        .with_radius(1000.0)
        .with_limit(5);

    let result = client.query(&request).await?;
    println!("Query {} matched {} places", result.query_id, result.total);
    for place in &result.results {
        println!(
            "  {} [{}] confidence {:?}",
            place.name,
            place.category.as_deref().unwrap_or("-"),
            place.confidence
        );
    }

    let Some(best) = result.results.first() else {
        println!("Nothing found");
        return Ok(());
    };

    println!();
    println!("=== Context around {} ===", best.name);
    let context = client
        .context(&ContextRequest::new(best.coordinate, 300.0).with_category("restaurants"))
        .await?;
    for (key, value) in &context.context {
        println!("  {}: {}", key, value);
    }
    for nearby in &context.nearby {
        println!("  {} at {:.0} m", nearby.place.name, nearby.distance);
    }

    Ok(())
}
