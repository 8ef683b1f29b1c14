mod analysis;
mod data;
mod pipeline;
mod plot;
mod report;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    pipeline::run(&pipeline::Config::default())
}
