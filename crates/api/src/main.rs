use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    storefront_observability::init();

    let app = storefront_api::app::build_app().await?;

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
