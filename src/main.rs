//! LimeScope Proxy
//!
//! Backend-for-frontend for the LimeScope token launch site.

use anyhow::Result;

use limescope_proxy::adapters::cli;
use limescope_proxy::config::should_load_dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Hosted deployments inject their environment directly
    if should_load_dotenv(|key| std::env::var(key).ok()) {
        dotenvy::dotenv().ok();
    }

    let app = cli::init();
    cli::execute(app).await
}
