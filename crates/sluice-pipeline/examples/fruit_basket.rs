//! Runs a timer + cache pipeline over a handful of toy async services.
//!
//! ```sh
//! cargo run --example fruit_basket
//! ```
//!
//! The second fruit lookup is served from the cache: its service log line
//! and delay happen only once, while the timer reports both calls.

use sluice_core::SluiceError;
use sluice_pipeline::{CachePipe, PipelineBuilderFactory, TimerPipe};
use std::convert::Infallible;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Hero {
    name: String,
}

async fn get_fruit() -> Result<String, Infallible> {
    tracing::info!("fetching fruit...");
    tokio::time::sleep(Duration::from_millis(250)).await;
    Ok("strawberry".to_string())
}

async fn get_hero() -> Result<Hero, Infallible> {
    tracing::info!("fetching hero...");
    tokio::time::sleep(Duration::from_millis(250)).await;
    Ok(Hero {
        name: "Rexxar".to_string(),
    })
}

async fn set_fruit() -> Result<(), Infallible> {
    tracing::info!("storing fruit...");
    tokio::time::sleep(Duration::from_millis(100)).await;
    tracing::info!("fruit stored");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SluiceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let pipeline = PipelineBuilderFactory::new()
        .create()
        .add(TimerPipe::new())
        .add(CachePipe::new())
        .build();

    let first = pipeline
        .run(get_fruit, |opts| {
            opts.set_cache("get-fruit");
        })
        .await?;
    let second = pipeline
        .run(get_fruit, |opts| {
            opts.set_cache("get-fruit");
        })
        .await?;
    let hero = pipeline
        .run(get_hero, |opts| {
            opts.set_cache("get-hero");
        })
        .await?;
    pipeline
        .run(set_fruit, |opts| {
            opts.set_no_cache();
        })
        .await?;

    tracing::info!(%first, %second, hero = ?hero, "pipeline results");
    Ok(())
}
