//! CLI argument parsing definitions

use clap::Parser;
use envlayer::ProcessSettings;

#[derive(Parser)]
#[command(author, version, about = "Load the application config and print the merged result", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: ProcessSettings,
}
