//! Scans a property blob given as a hex string and prints the recovered
//! fields.
//!
//! ```sh
//! cargo run --example scan_blob -- 4a616e6520446f654d0548656c6c6f
//! ```

use anyhow::{bail, Context};

use exchange_edb::codec::property_blob::scan_property_blob;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let hex = std::env::args()
        .nth(1)
        .context("usage: scan_blob <hex-encoded property blob>")?;
    let blob = decode_hex(&hex)?;

    let fields = scan_property_blob(&blob)?;
    println!("{fields:#?}");
    Ok(())
}

fn decode_hex(hex: &str) -> anyhow::Result<Vec<u8>> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if hex.len() % 2 != 0 {
        bail!("hex string has an odd number of digits");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte at offset {i}"))
        })
        .collect()
}
