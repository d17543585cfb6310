//! Example of common NetStorage operations.
//!
//! Configure the client with:
//!
//! - `AKAMAI_NETSTORAGE_KEY`
//! - `AKAMAI_NETSTORAGE_KEY_NAME`
//! - `AKAMAI_NETSTORAGE_HOST`
//! - `AKAMAI_NETSTORAGE_SSL` (optional)
//!
//! and pass the upload directory as first argument, for example `/12345`.

use log::{info, warn};
use netstorage_akamai::{Client, Config, Response};
use netstorage_core::{Context, OsEnv, Result};
use netstorage_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let Some(dir) = std::env::args().nth(1) else {
        warn!("usage: netstorage_operations <upload dir>");
        return Ok(());
    };

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    info!("loaded config: {config:?}");

    let client = Client::new(ctx).with_config(config);

    let path = format!("{}/netstorage-example.txt", dir.trim_end_matches('/'));
    if client.file_exists(&path).await? {
        info!("{path} exists, deleting it first");
        client.delete(&path).await?;
    }

    client.upload("hello netstorage", &path).await?;
    info!("uploaded {path}");

    match client.stat(&path).await? {
        Response::Decoded(v) => info!("stat {path}: {v}"),
        Response::Status(status) => info!("stat {path}: {status}"),
    }

    if let Some(v) = client.du(&dir).await?.decoded() {
        info!("du {dir}: {v}");
    }

    client.delete(&path).await?;
    info!("deleted {path}");

    Ok(())
}
