use clap::Parser;
use pagekit::cli::{self, Cli};
use pagekit::logging;

fn main() {
    let cli = Cli::parse();

    let site = match cli::load_site_config(cli.config.as_deref()) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&site.logging) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = cli::run(&cli.command, &site) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
