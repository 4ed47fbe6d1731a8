use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "notch",
    version = notch_core::version(),
    about = "Notch - drives a notch-shaped window over a JSON-lines method channel",
)]
pub struct Args {
    /// Specify custom configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Validate configuration and exit without starting
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Use default configuration and ignore config files
    #[arg(long = "defaults")]
    pub use_defaults: bool,

    /// Only log info, warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log everything, including per-frame traces
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Width of the simulated primary display
    #[arg(long = "screen-width", value_name = "POINTS", default_value_t = 1440.0)]
    pub screen_width: f64,

    /// Height of the simulated primary display
    #[arg(long = "screen-height", value_name = "POINTS", default_value_t = 900.0)]
    pub screen_height: f64,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["notch"]).unwrap();
        assert!(args.config_path.is_none());
        assert!(!args.dry_run);
        assert_eq!(args.screen_width, 1440.0);
        assert_eq!(args.screen_height, 900.0);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["notch", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "notch",
            "--config",
            "/tmp/notch.yaml",
            "--dry-run",
            "--screen-width",
            "1728",
        ])
        .unwrap();
        assert_eq!(args.config_path, Some(PathBuf::from("/tmp/notch.yaml")));
        assert!(args.dry_run);
        assert_eq!(args.screen_width, 1728.0);
    }
}
