//! Example: List the keys the workflow would offer for export or deletion
//!
//! Run with: cargo run --example list_keys

use gpg_keyflow::{GpgCli, GpgTool, KeyRecord};

#[tokio::main]
async fn main() -> gpg_keyflow::Result<()> {
    let gpg = GpgCli::new();
    let keys = gpg.list_keys().await?;

    println!("Found {} secret keys\n", keys.len());

    for key in &keys {
        println!("{}", format_key_output(key));
    }

    Ok(())
}

fn format_key_output(key: &KeyRecord) -> String {
    let created = key
        .created
        .map(|d| format!(" created {}", d))
        .unwrap_or_default();

    format!("{}{}", key.label(), created)
}
