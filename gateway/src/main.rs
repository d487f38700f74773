//! IMS HTTP Gateway

mod dto;
mod error;
mod handlers;
mod routing;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 文件可选
    dotenvy::dotenv().ok();

    ims_bootstrap::run("config", |infra, metrics| async move {
        routing::app(AppState::from_infrastructure(&infra, metrics))
    })
    .await
}
