//! Terminal rendering for the harness: notes and the screen summary.

use vizassist_core::{AnalysisPhase, Mode};
use vizassist_workflow::Snapshot;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::NoImage => "no image",
        Mode::CameraOpen => "camera",
        Mode::ImageReady => "image ready",
    }
}

fn phase_label(phase: &AnalysisPhase) -> String {
    match phase {
        AnalysisPhase::Idle => "idle".into(),
        AnalysisPhase::Loading { operation } => format!("loading ({operation})"),
        AnalysisPhase::Result { operation, .. } => format!("result ({operation})"),
        AnalysisPhase::Error { operation } => format!("error ({operation})"),
    }
}

/// One-line summary of the screen, e.g. `[image ready | loading (ocr)] photo.jpg`.
pub fn render_screen(snapshot: &Snapshot, color: bool) -> String {
    let mut head = mode_label(snapshot.mode).to_string();
    if let Some(phase) = &snapshot.analysis {
        head.push_str(" | ");
        head.push_str(&phase_label(phase));
    }
    if snapshot.camera_live {
        head.push_str(" | live");
    }
    let subject = snapshot.image_name.as_deref().unwrap_or("");
    let line = if color {
        format!("{DIM}[{head}]{RESET} {BOLD}{subject}{RESET}")
    } else {
        format!("[{head}] {subject}")
    };
    line.trim_end().to_string()
}

/// Multi-line dump used by the `status` command.
pub fn render_details(snapshot: &Snapshot) -> String {
    let rows = [
        ("mode", mode_label(snapshot.mode).to_string()),
        (
            "analysis",
            snapshot
                .analysis
                .as_ref()
                .map(phase_label)
                .unwrap_or_else(|| "-".into()),
        ),
        ("image", snapshot.image_name.clone().unwrap_or_else(|| "-".into())),
        ("preview", snapshot.preview_url.clone().unwrap_or_else(|| "-".into())),
        ("camera", if snapshot.camera_live { "live" } else { "off" }.into()),
        ("status", snapshot.status.clone()),
    ];
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("  {k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn loading() -> Snapshot {
        Snapshot {
            mode: Mode::ImageReady,
            analysis: Some(AnalysisPhase::Loading {
                operation: vizassist_core::Operation::Ocr,
            }),
            status: "Reading text...".into(),
            image_name: Some("photo.jpg".into()),
            preview_url: Some("blob:vizassist/1".into()),
            camera_live: false,
        }
    }

    #[test]
    fn screen_line_shows_mode_and_phase() {
        assert_eq!(
            render_screen(&loading(), false),
            "[image ready | loading (ocr)] photo.jpg"
        );
        assert_eq!(
            strip_ansi(&render_screen(&loading(), true)),
            "[image ready | loading (ocr)] photo.jpg"
        );
    }

    #[test]
    fn empty_screen_has_no_trailing_space() {
        let snap = Snapshot {
            mode: Mode::NoImage,
            analysis: None,
            status: String::new(),
            image_name: None,
            preview_url: None,
            camera_live: false,
        };
        assert_eq!(render_screen(&snap, false), "[no image]");
    }

    #[test]
    fn details_list_every_field() {
        let details = render_details(&loading());
        assert!(details.contains("photo.jpg"));
        assert!(details.contains("blob:vizassist/1"));
        assert!(details.contains("Reading text..."));
    }
}
