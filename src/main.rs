#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod engine;
mod model;
mod prelude;
mod processor;
mod reference;
mod repository;
mod tables;
mod watcher;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    Args::parse().command.run().await?;

    info!("done!");
    Ok(())
}
