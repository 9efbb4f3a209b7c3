#[tokio::main]
async fn main() {
    if let Err(e) = binder_backend::run().await {
        log::error!("binder-backend failed: {}", e);
        std::process::exit(1);
    }
}
