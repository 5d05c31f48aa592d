//! Command-line argument parsing for the demo host
//!
//! Values given on the command line override the config file.

use clap::Parser;

use crate::config::PanelConfig;

/// Live view of one or more text files
#[derive(Parser, Debug, Default)]
#[command(name = "textpane", version, about = "Live view of one or more text files")]
pub struct CliArgs {
    /// Files to display; cycle with `n` / `p`
    #[arg(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Enable syntax highlighting
    #[arg(short = 'f', long, conflicts_with = "no_format")]
    pub format: bool,

    /// Disable syntax highlighting
    #[arg(long)]
    pub no_format: bool,

    /// Highlighting style name
    #[arg(short = 's', long, value_name = "NAME")]
    pub style: Option<String>,

    /// Output formatter (terminal256, terminal16m, terminal16, noop)
    #[arg(long, value_name = "NAME")]
    pub formatter: Option<String>,

    /// How often to poll the files for changes
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Print the available styles and exit
    #[arg(long)]
    pub list_styles: bool,
}

impl CliArgs {
    /// Overlay the command-line values on `config`
    pub fn apply_to(&self, config: &mut PanelConfig) {
        if !self.paths.is_empty() {
            config.file_path = None;
            config.file_paths = self.paths.clone();
        }
        if self.format {
            config.format = true;
        }
        if self.no_format {
            config.format = false;
        }
        if let Some(style) = &self.style {
            config.format_style = style.clone();
        }
        if let Some(formatter) = &self.formatter {
            config.formatter = formatter.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("textpane").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_args() {
        let args = parse(&[]);
        assert!(args.paths.is_empty());
        assert!(!args.format);
        assert!(!args.list_styles);
    }

    #[test]
    fn test_paths_replace_config_sources() {
        let mut config = PanelConfig {
            file_path: Some("/etc/hosts".to_string()),
            ..PanelConfig::default()
        };
        parse(&["a.go", "b.txt"]).apply_to(&mut config);
        assert_eq!(config.sources(), vec!["a.go", "b.txt"]);
    }

    #[test]
    fn test_no_paths_keep_config_sources() {
        let mut config = PanelConfig {
            file_path: Some("/etc/hosts".to_string()),
            ..PanelConfig::default()
        };
        parse(&["--format"]).apply_to(&mut config);
        assert_eq!(config.sources(), vec!["/etc/hosts"]);
        assert!(config.format);
    }

    #[test]
    fn test_no_format_overrides_config() {
        let mut config = PanelConfig {
            format: true,
            ..PanelConfig::default()
        };
        parse(&["--no-format"]).apply_to(&mut config);
        assert!(!config.format);
    }

    #[test]
    fn test_format_conflicts_with_no_format() {
        let result = CliArgs::try_parse_from(["textpane", "--format", "--no-format"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_style_formatter_interval() {
        let mut config = PanelConfig::default();
        parse(&[
            "-s",
            "github-dark",
            "--formatter",
            "terminal16m",
            "--poll-interval-ms",
            "250",
            "x.rs",
        ])
        .apply_to(&mut config);

        assert_eq!(config.format_style, "github-dark");
        assert_eq!(config.formatter, "terminal16m");
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn test_list_styles_flag() {
        assert!(parse(&["--list-styles"]).list_styles);
    }
}
