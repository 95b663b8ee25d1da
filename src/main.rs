/*
 * Responsibility
 * - boot the tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rest_jwt_auth::app::run().await
}
