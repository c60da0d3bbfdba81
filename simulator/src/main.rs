mod reading;

use rand::Rng;
use reading::ReadingReport;
use std::env;
use std::time::Duration;
use tracing::{error, info, warn};

// Placeholder point the relay starts from; the walk wanders around it.
const BASE_LAT: f64 = -6.2;
const BASE_LON: f64 = 106.8;

#[tokio::main]
async fn main() {
    let relay_url = env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let api_key = env::var("API_KEY").unwrap_or_else(|_| "SECRET_ESP32_KEY".to_string());
    let interval_ms: u64 = env::var("INTERVAL_MS")
        .unwrap_or_else(|_| "2000".to_string())
        .parse()
        .unwrap_or(2000);
    let alert_ratio: f64 = env::var("ALERT_RATIO")
        .unwrap_or_else(|_| "0.05".to_string())
        .parse()
        .unwrap_or(0.05);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting device simulator");
    info!(
        "Relay: {}, interval: {}ms, alert ratio: {}",
        relay_url, interval_ms, alert_ratio
    );

    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/data", relay_url);
    let interval = Duration::from_millis(interval_ms);

    let mut rng = rand::thread_rng();
    let mut lat = BASE_LAT;
    let mut lon = BASE_LON;
    let mut counter = 0u64;

    loop {
        let report = next_report(&mut rng, &api_key, &mut lat, &mut lon, alert_ratio);

        match client.post(&endpoint).json(&report).send().await {
            Ok(res) if res.status().is_success() => {
                counter += 1;
                if counter % 100 == 0 {
                    info!("Pushed {} readings", counter);
                }
            }
            Ok(res) => {
                warn!("Relay rejected reading: {}", res.status());
            }
            Err(e) => {
                error!("Failed to push reading: {}", e);
            }
        }

        tokio::time::sleep(interval).await;
    }
}

fn next_report(
    rng: &mut impl Rng,
    api_key: &str,
    lat: &mut f64,
    lon: &mut f64,
    alert_ratio: f64,
) -> ReadingReport {
    // Small random walk, like a tracker carried on foot
    *lat += rng.gen_range(-0.0005..0.0005);
    *lon += rng.gen_range(-0.0005..0.0005);

    let status = if rng.gen_bool(alert_ratio) {
        "alert"
    } else {
        "normal"
    };

    ReadingReport {
        api_key: api_key.to_string(),
        status: status.to_string(),
        lat: format!("{:.6}", *lat),
        lon: format!("{:.6}", *lon),
    }
}
