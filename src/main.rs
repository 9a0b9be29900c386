#[tokio::main]
async fn main() {
    if let Err(e) = event_tracker_backend::run().await {
        tracing::error!("Startup failed: {}", e);
        eprintln!("event-tracker: {}", e);
        std::process::exit(1);
    }
}
