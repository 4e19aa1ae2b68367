mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = platform::AppConfig::parse();
    platform::run_app(config)
}
