//! Basic usage example
//!
//! Usage:
//!   cargo run --example basic_usage

use talentgrid_client::endpoints::jobs::JobFilter;
use talentgrid_client::{ApiClient, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Configuration
    let base_url = std::env::var("TALENTGRID_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());

    let email = std::env::var("TALENTGRID_EMAIL")
        .unwrap_or_else(|_| "demo@example.com".to_string());

    let password = std::env::var("TALENTGRID_PASSWORD")
        .unwrap_or_else(|_| "demo-password".to_string());

    println!("=== TalentGrid Client Example ===");
    println!("API: {}", base_url);
    println!();

    let client = ApiClient::new(ClientConfig::new(base_url))?;

    // React to session expiry the way a UI would (navigate to login)
    let mut events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("! session event: {:?}", event);
        }
    });

    println!("Logging in as {}...", email);
    client.login(&email, &password).await?;
    println!("✓ Logged in");
    println!();

    println!("Searching remote engineering jobs...");
    let filter = JobFilter {
        query: Some("engineer".to_string()),
        remote: Some(true),
        ..Default::default()
    };
    let page = client.jobs().search(&filter).await?;
    println!("✓ {} jobs matched", page.total);
    for job in page.items.iter().take(5) {
        println!("  - [{}] {}", job.id, job.title);
    }
    println!();

    println!("Fetching recommendations...");
    match client.jobs().recommended().await {
        Ok(jobs) => {
            println!("✓ {} recommended jobs", jobs.len());
        }
        Err(e) => {
            println!("! Recommendations unavailable: {}", e);
        }
    }
    println!();

    println!("Current profile:");
    let profile = client.users().profile().await?;
    println!("  {} <{}>", profile.name, profile.email);
    println!();

    client.logout().await;
    println!("Done!");

    Ok(())
}
