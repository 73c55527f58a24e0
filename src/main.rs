use anyhow::Result;
use clap::Parser;

use pulsetalk::app::App;
use pulsetalk::config::{Cli, Config};
use pulsetalk::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Cli::parse());
    init_logging(config.debug);

    let mut app = App::new(config);
    app.run().await
}
