//! characters-service binary
//!
//! Configuration is read from `config.toml` files and `CHARACTERS_*`
//! environment variables (see [`characters_service::config`]).
//!
//! Test with:
//!   curl http://localhost:8080/health
//!   curl http://localhost:8080/characters
//!   curl -X POST http://localhost:8080/characters \
//!     -H 'content-type: application/json' \
//!     -d '{"name":"Luke Skywalker","episodes":["NEWHOPE"],"planet":"Tatooine"}'

use anyhow::Context;
use characters_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config).context("failed to initialize tracing")?;

    let state = AppState::connect(config)
        .await
        .context("failed to connect to the document store")?;

    ServiceBuilder::new(state)
        .build()
        .serve()
        .await
        .context("server error")?;

    Ok(())
}
