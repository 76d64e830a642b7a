//! Runs a JSON `FilterRequest` against a customer list and prints the
//! JSON `FilterResponse`.
//!
//! ```text
//! sifter-demo --request data/request.json
//! RUST_LOG=sifter=debug sifter-demo --data data/customers.json --request data/request.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use sifter::{FilterOptions, FilterRequest, FilterResponse};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod customer;

use customer::Customer;

#[derive(Parser, Debug)]
#[command(
    name = "sifter-demo",
    version,
    about = "Filter, sort, select and page a customer list"
)]
struct Args {
    /// JSON filter request. Without one, every customer is printed unpaged.
    #[arg(long)]
    request: Option<PathBuf>,

    /// JSON paging options (defaultPage, defaultPageSize, maxPageSize)
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON array of customers (default: built-in sample)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let customers: Vec<Customer> = match &args.data {
        Some(path) => read_json(path)?,
        None => customer::sample(),
    };
    let options: FilterOptions = match &args.options {
        Some(path) => read_json(path)?,
        None => FilterOptions::default(),
    };
    info!(customers = customers.len(), "loaded data");

    let response = match &args.request {
        Some(path) => {
            let request: FilterRequest = read_json(path)?;
            request
                .apply_with(&customers, &options)
                .with_context(|| format!("cannot apply request {}", path.display()))?
        }
        None => FilterResponse::unpaged(customers),
    };
    info!(
        returned = response.data.len(),
        total = ?response.total_count,
        page = response.page,
        page_count = response.page_count(),
        "request applied"
    );

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{output}");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
