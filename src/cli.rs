use clap::Parser;
use std::path::PathBuf;

const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Animated portfolio viewer
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Path to a portfolio catalog (JSON) - optional, falls back to the built-in demo catalog
    #[arg(value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Start in fullscreen mode
    #[arg(short = 'F', long = "fullscreen")]
    pub fullscreen: bool,

    /// Open directly on a project by id
    #[arg(long = "project", value_name = "ID")]
    pub project: Option<String>,

    /// Start muted (default: true)
    #[arg(short = 'm', long = "muted", value_name = "0|1", default_value = "1")]
    pub muted: u8,

    /// Enable debug logging to file (default: vitrine.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["vitrine"]);
        assert!(args.catalog.is_none());
        assert_eq!(args.muted, 1);
        assert_eq!(args.verbosity, 0);
        assert!(!args.fullscreen);
    }

    #[test]
    fn test_full_invocation() {
        let args = Args::parse_from([
            "vitrine",
            "work.json",
            "-F",
            "--project",
            "neon-district",
            "-m",
            "0",
            "-vv",
            "--log",
        ]);
        assert_eq!(args.catalog.as_deref(), Some(std::path::Path::new("work.json")));
        assert!(args.fullscreen);
        assert_eq!(args.project.as_deref(), Some("neon-district"));
        assert_eq!(args.muted, 0);
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.log_file, Some(None));
    }
}
