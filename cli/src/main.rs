//! `bookrec`: command-line client for the book-recommendation service.
//!
//! The session (profile and token) is kept in files under the data
//! directory so it survives between invocations.

#![forbid(unsafe_code)]

mod app;
mod args;
mod transport;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bookrec_core::{BookRecClient, FileStorage, SessionStore};
use clap::Parser;
use directories::ProjectDirs;

use app::{App, Output};
use args::Args;
use transport::HttpTransport;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    log::debug!("Using API at {}", args.api_url);

    let data_dir = resolve_data_dir(args.data_dir)?;
    let client = BookRecClient::new(&args.api_url)
        .with_context(|| format!("Invalid API URL {:?}", args.api_url))?;
    let session = SessionStore::load(FileStorage::new(data_dir));

    let mut app = App::new(client, HttpTransport::new(), session);
    match app.run(args.command)? {
        Output::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Output::Message(text) => println!("{text}"),
    }
    Ok(())
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("", "", "bookrec")
        .map(|dirs| dirs.data_dir().join("session"))
        .context("No home directory found; pass --data-dir")
}
