use clap::{Parser, Subcommand};
use course_site::config::{self, ServerConfig};
use course_site::course::Course;
use course_site::{check, output, resolve, server};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `COURSE_SITE_LOG` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "course_site=info,tower_http=info";

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "course-site")]
#[command(about = "Web server for a multi-level programming course")]
#[command(long_about = "\
Web server for a multi-level programming course

Serves the course pages (home, one page per level, one page per module) and
the raw module files under /course-content/. Module files live in the content
root, one folder per module:

  content root/
  ├── level-1-foundations/
  │   ├── module-1-http/
  │   │   ├── README.md
  │   │   ├── theory.md
  │   │   ├── exercises.md
  │   │   ├── solutions.md
  │   │   ├── project.md
  │   │   └── code/
  │   └── module-2-jvm/
  └── level-2-scaling/
      └── ...

Settings are layered: built-in defaults, then the config file, then the
environment (PORT, COURSE_SITE_ENV=production), then command-line flags.
Logging is controlled by COURSE_SITE_LOG or RUST_LOG.

Run 'course-site gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: course-site.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server
    Serve {
        /// Port to listen on (overrides PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
        /// Serve static assets from the production root
        #[arg(long)]
        production: bool,
    },
    /// Compare the course document with the module folders on disk
    Check,
    /// Show which file a /course-content/ request resolves to
    Resolve {
        /// Request path, with or without the content prefix
        request_path: String,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve { port, production } => {
            let mut config = load_config(cli.config.as_deref())?;
            config.apply_cli(port, production);
            config.validate()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&config))?;
        }
        Command::Check => {
            let config = load_config(cli.config.as_deref())?;
            let course = Course::load(config.course_file.as_deref().map(Path::new))?;
            println!("==> Checking {}", config.content_root);
            let report = check::check_content(&course, &config.content_root_path())?;
            output::print_check(&report);
            if report.is_complete() {
                println!("==> Content is complete");
            }
        }
        Command::Resolve { request_path } => {
            let config = load_config(cli.config.as_deref())?;
            let root = std::fs::canonicalize(config.content_root_path())?;
            let relative = resolve::strip_prefix(&config.content_prefix, &request_path)
                .unwrap_or(&request_path);
            let result = resolve::inspect(&root, relative);
            output::print_resolve(&request_path, &result);
            if result.is_err() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// File layer plus environment overlay.
fn load_config(path: Option<&Path>) -> Result<ServerConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("COURSE_SITE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
