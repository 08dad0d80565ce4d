#[tokio::main]
async fn main() {
    fleet_backend::run().await;
}
