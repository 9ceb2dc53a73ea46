//! Loads config files and prints the merged result as TOML.
//!
//! ```text
//! RUST_LOG=flatcfg=debug cargo run --example dump -- app.conf local.conf
//! ```

use flatcfg::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut builder = Config::builder().with_default("app", "workers", "4");
    for path in std::env::args().skip(1) {
        builder = builder.with_file(path, true);
    }
    let config = builder.build()?;

    println!("{}", toml::to_string(&config)?);
    println!(
        "# app.workers resolves to {}",
        config.get_u32_min("app", "workers", 1)
    );

    Ok(())
}
