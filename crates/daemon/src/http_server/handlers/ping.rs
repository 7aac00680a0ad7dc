/// Plain text liveness check kept for existing clients
pub async fn handler() -> &'static str {
    "Pong 🏓"
}
