//! Example showing how to branch on the error taxonomy.
//!
//! Run with: `cargo run --example error_handling`

use camino_ai::{Client, Config, Coordinate, Error, QueryRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("camino_ai=info").init();

    // Configuration problems are caught before any client exists
    match Config::new("") {
        Err(Error::Config(message)) => println!("Config rejected: {}", message),
        other => println!("Unexpected: {:?}", other.map(|_| ())),
    }

    let client = Client::new(Config::builder("not-a-real-key").max_retries(1).build()?)?;

    // Validation failures never touch the network
    let request = QueryRequest::new("coffee").with_location(Coordinate {
        lat: 123.0,
        lng: 0.0,
    });
    match client.query(&request).await {
        Err(Error::Validation { field, message }) => {
            println!("Invalid `{}`: {}", field, message)
        }
        other => println!("Unexpected: {:?}", other),
    }

    // A bad key comes back as an authentication error and is not retried
    match client.search("coffee").await {
        Ok(result) => println!("Got {} results", result.total),
        Err(Error::Authentication { status, message }) => {
            println!("Auth failed ({}): {}", status, message)
        }
        Err(Error::RateLimit { retry_after, .. }) => {
            println!("Rate limited, retry after {:?}", retry_after)
        }
        Err(e @ (Error::Network { .. } | Error::Timeout { .. })) => {
            println!("Transport failure after retries: {}", e)
        }
        Err(Error::Decode { reason, raw_response, .. }) => {
            println!("Unexpected body ({}): {}", reason, raw_response)
        }
        Err(e) => println!("Other error ({:?}): {}", e.kind(), e),
    }

    Ok(())
}
