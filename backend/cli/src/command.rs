//! Harness input lines.
//!
//! One command per line; each maps onto a single controller action.

use std::path::PathBuf;
use std::str::FromStr;

use vizassist_core::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick an image file from disk.
    Select(PathBuf),
    Camera,
    Capture,
    Retake,
    Analyze(Operation),
    Repeat,
    Status,
    Health,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "select" | "open" | "file" => {
                if rest.is_empty() {
                    return Err("usage: select <path>".into());
                }
                Self::Select(PathBuf::from(rest))
            }
            "camera" => Self::Camera,
            "capture" | "snap" => Self::Capture,
            "retake" | "clear" => Self::Retake,
            "repeat" | "say" => Self::Repeat,
            "status" => Self::Status,
            "health" => Self::Health,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "" => return Err("empty command".into()),
            other => Self::Analyze(other.parse::<Operation>()?),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
commands:
  select <path>   use an image file
  camera          open the camera
  capture         take a photo from the camera
  retake          discard the current image
  ocr | detect | caption
                  analyze the current image
  repeat          speak the current status again
  status          print the current screen state
  health          ping the analysis service
  quit            exit";
