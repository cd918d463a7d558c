//! Demo parts catalog — `buildmate serve`.

use anyhow::Result;

use buildmate::catalog::{ServeConfig, start_server};

pub async fn cmd_serve(port: u16, dev: bool) -> Result<()> {
    start_server(ServeConfig {
        port,
        dev_mode: dev,
    })
    .await
}
