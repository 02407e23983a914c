//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommands:
//! - `expand` -- expand an ad hoc URI template
//! - `url` -- print the absolute URL of a configured page
//! - `check` -- validate page declarations and list them
//! - `version` -- print build/version info

use crate::browser::SessionDriver;
use crate::config::{self, SiteConfig};
use crate::template::{Bindings, Template};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Page object tooling for browser-driven test suites.
#[derive(Parser, Debug)]
#[command(
    name = "pagekit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Expand page URL templates and validate page declarations"
)]
pub struct Cli {
    /// Site configuration file (default: $PAGEKIT_CONFIG_PATH or the user config dir).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand a URI template with the given variables.
    Expand {
        /// Template, e.g. "/users{/username}{?query*}".
        template: String,

        #[command(flatten)]
        vars: VarArgs,
    },

    /// Print the absolute URL of a declared page.
    Url {
        /// Page name as declared in the configuration.
        page: String,

        #[command(flatten)]
        vars: VarArgs,

        /// Print the expanded template without resolving it against the app host.
        #[arg(long)]
        relative: bool,
    },

    /// Validate every page declaration and list pages with their variables.
    Check,

    /// Print version, build date, and git commit information.
    Version,
}

/// Variable bindings given on the command line.
#[derive(clap::Args, Debug, Default)]
pub struct VarArgs {
    /// Scalar binding as name=value (repeatable).
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE")]
    pub pairs: Vec<String>,

    /// Bindings as a JSON object; lists and objects allowed.
    #[arg(long = "vars", value_name = "JSON")]
    pub json: Option<String>,
}

impl VarArgs {
    /// JSON bindings first, then `--var` pairs on top.
    pub fn bindings(&self) -> Result<Bindings, Box<dyn Error>> {
        let mut bindings = match &self.json {
            Some(raw) => Bindings::from_json(&serde_json::from_str(raw)?)?,
            None => Bindings::new(),
        };
        for pair in &self.pairs {
            bindings.insert_pair(pair)?;
        }
        Ok(bindings)
    }
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

/// Load the site configuration. A missing file at the default location is
/// not an error; an explicitly named one is.
pub fn load_site_config(explicit: Option<&Path>) -> Result<SiteConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config(path),
        None => {
            let path = config::get_config_path();
            if path.exists() {
                config::load_config(&path)
            } else {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(SiteConfig::default())
            }
        }
    }
}

/// Dispatch a parsed command.
pub fn run(command: &Command, site: &SiteConfig) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Expand { template, vars } => {
            println!("{}", expand_template(template, &vars.bindings()?)?);
        }
        Command::Url {
            page,
            vars,
            relative,
        } => {
            println!("{}", page_url(site, page, &vars.bindings()?, *relative)?);
        }
        Command::Check => {
            print!("{}", check_report(site)?);
        }
        Command::Version => handle_version(),
    }
    Ok(())
}

/// Run the `expand` subcommand.
pub fn expand_template(template: &str, bindings: &Bindings) -> Result<String, Box<dyn Error>> {
    Ok(Template::parse(template)?.expand(bindings))
}

/// Run the `url` subcommand.
pub fn page_url(
    site: &SiteConfig,
    page: &str,
    bindings: &Bindings,
    relative: bool,
) -> Result<String, Box<dyn Error>> {
    let registry = site.build_registry()?;
    let descriptor = registry
        .get(page)
        .ok_or_else(|| format!("Unknown page: {}", page))?;
    let url = descriptor
        .url(bindings)
        .ok_or_else(|| format!("Page {} has no URL", page))?;

    if relative {
        return Ok(url);
    }
    let driver = SessionDriver::new(site.driver_config());
    Ok(driver.resolve(&url)?.to_string())
}

/// Run the `check` subcommand.
pub fn check_report(site: &SiteConfig) -> Result<String, Box<dyn Error>> {
    let registry = site.build_registry()?;
    let mut report = String::new();

    for descriptor in registry.iter() {
        let url = descriptor
            .template()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "-".to_string());
        let matcher = descriptor
            .url_matcher()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let variables = descriptor
            .template()
            .map(|t| t.variables().join(","))
            .unwrap_or_default();

        report.push_str(&format!(
            "{}\turl={}\tmatcher={}\tvars={}\n",
            descriptor.name(),
            url,
            matcher,
            variables
        ));
    }
    report.push_str(&format!("{} page(s) OK\n", registry.len()));
    Ok(report)
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("pagekit {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("PAGEKIT_BUILD_DATE"));
    println!("  Git commit: {}", env!("PAGEKIT_GIT_HASH"));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
