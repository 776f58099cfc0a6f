use clap::{ArgAction, Parser};

use crate::error::FormatError;
use crate::format::CustomFormat;
use crate::render::OutputMode;

#[derive(Parser)]
#[command(name = "zwt")]
#[command(about = "List toplevel windows on Wayland compositors")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Output data in JSON format.
    #[arg(short = 'j', long, conflicts_with_all = ["tsv", "custom"])]
    pub json: bool,

    /// Output data as tab separated values.
    #[arg(short = 't', long, conflicts_with = "custom")]
    pub tsv: bool,

    /// Custom output format: the first character is the field delimiter,
    /// followed by field codes t (title), a (app-id), i (identifier),
    /// A (activated), f (fullscreen), m (minimized), M (maximized).
    #[arg(short = 'c', long, value_name = "FORMAT", allow_hyphen_values = true)]
    pub custom: Option<String>,

    /// Print version and exit.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    /// Resolve the selected output format, validating a custom format
    /// string before any connection is opened.
    pub fn output_mode(&self) -> Result<OutputMode, FormatError> {
        if self.json {
            Ok(OutputMode::Json)
        } else if self.tsv {
            Ok(OutputMode::Tsv)
        } else if let Some(spec) = &self.custom {
            Ok(OutputMode::Custom(CustomFormat::parse(spec)?))
        } else {
            Ok(OutputMode::Human)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_default_mode_is_human() {
        let cli = Cli::try_parse_from(["zwt"]).unwrap();
        assert_eq!(cli.output_mode().unwrap(), OutputMode::Human);
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::try_parse_from(["zwt", "--json"]).unwrap();
        assert_eq!(cli.output_mode().unwrap(), OutputMode::Json);
    }

    #[test]
    fn test_custom_format_is_parsed() {
        let cli = Cli::try_parse_from(["zwt", "-c", ",Aa"]).unwrap();
        match cli.output_mode().unwrap() {
            OutputMode::Custom(format) => assert_eq!(format.delimiter, ','),
            mode => panic!("expected custom mode, got {mode:?}"),
        }
    }

    #[test]
    fn test_invalid_custom_format_is_fatal() {
        let cli = Cli::try_parse_from(["zwt", "-c", "|"]).unwrap();
        assert_eq!(cli.output_mode(), Err(FormatError::NoFields));
    }

    #[test]
    fn test_format_selectors_conflict() {
        let err = Cli::try_parse_from(["zwt", "-j", "-t"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        let err = Cli::try_parse_from(["zwt", "-j", "-c", ",t"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["zwt", "--frobnicate"]).is_err());
    }
}
