//! Text rendering for session views and classification cards.
//!
//! Everything writes to a caller-supplied `io::Write` so the REPL can target
//! stdout and tests can target a buffer. Image locations are printed as
//! absolute URLs built from the service base URL.

use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use skinsight_client::http::join_url;
use skinsight_core::{ClassificationResult, format_percent};

use crate::session::{Preview, View};

// ── Public API ──

pub fn print_banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=== Welcome to SkinSight ===")?;
    writeln!(out, "An AI-powered application to classify skin images")?;
    writeln!(out)
}

/// Render whatever the session currently shows.
pub fn print_view(out: &mut impl Write, view: &View<'_>, base_url: &str) -> io::Result<()> {
    match view {
        View::Upload { selection } => print_upload_form(out, *selection),
        View::Classifying => print_classifying(out),
        View::Result { result, history } => {
            print_result_card(out, result, base_url)?;
            writeln!(out, "  [another] Classify another image")?;
            writeln!(out)?;
            print_history(out, history, base_url)
        }
    }
}

pub fn print_upload_form(out: &mut impl Write, selection: Option<&Preview>) -> io::Result<()> {
    writeln!(out, "Upload an image")?;
    writeln!(out, "  Select a skin image to be classified: open <path>")?;
    if let Some(preview) = selection {
        writeln!(out)?;
        print_preview(out, preview)?;
    }
    writeln!(out)?;
    let state = if selection.is_some() { "" } else { " (disabled)" };
    writeln!(out, "  [classify] Classify image{state}")?;
    writeln!(out, "  [clear]    Clear{state}")
}

fn print_classifying(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Classifying image...")
}

/// Card for a single classification: image, prediction and per-class scores.
pub fn print_result_card(
    out: &mut impl Write,
    result: &ClassificationResult,
    base_url: &str,
) -> io::Result<()> {
    writeln!(out, "=== Classification Result ===")?;
    print_classification(out, result, base_url)?;
    writeln!(out)
}

/// Previous classifications in the order given (callers pass newest first).
pub fn print_history(
    out: &mut impl Write,
    history: &[&ClassificationResult],
    base_url: &str,
) -> io::Result<()> {
    writeln!(out, "=== Previous classifications ===")?;
    if history.is_empty() {
        return writeln!(out, "No previous classifications available.");
    }
    for (i, result) in history.iter().enumerate() {
        writeln!(out, "#{}", i + 1)?;
        print_classification(out, result, base_url)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Steady-ticking spinner on stderr, hidden when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Sections ──

fn print_preview(out: &mut impl Write, preview: &Preview) -> io::Result<()> {
    writeln!(out, "Preview:")?;
    writeln!(out, "  {:<20} {}", "file", preview.file_name)?;
    writeln!(out, "  {:<20} {}", "type", preview.mime)?;
    if let Some((w, h)) = preview.dimensions {
        writeln!(out, "  {:<20} {w} x {h}", "dimensions")?;
    }
    writeln!(out, "  {:<20} {}", "size", human_bytes(preview.size_bytes))
}

fn print_classification(
    out: &mut impl Write,
    result: &ClassificationResult,
    base_url: &str,
) -> io::Result<()> {
    writeln!(out, "  {:<20} {}", "image", join_url(base_url, &result.image_url))?;
    writeln!(out, "  {:<20} {}", "Predicted:", result.predicted_label())?;
    writeln!(out, "  Probabilities")?;
    for (label, p) in result.scores() {
        writeln!(out, "    {:<20} {:>8}", format!("{label}:"), format_percent(p))?;
    }
    Ok(())
}

// ── Helpers ──

fn human_bytes(n: usize) -> String {
    const KIB: f64 = 1024.0;
    let n = n as f64;
    if n < KIB {
        format!("{n} B")
    } else if n < KIB * KIB {
        format!("{:.1} KiB", n / KIB)
    } else {
        format!("{:.1} MiB", n / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000";

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn melanoma() -> ClassificationResult {
        ClassificationResult {
            class_idx: 2,
            image_url: "/uploads/mole.jpg".into(),
            probabilities: vec![0.0512, 0.1, 0.8488],
        }
    }

    fn eczema() -> ClassificationResult {
        ClassificationResult {
            class_idx: 1,
            image_url: "/uploads/elbow.jpg".into(),
            probabilities: vec![0.3, 0.6, 0.1],
        }
    }

    #[test]
    fn result_card_shows_prediction_and_percentages() {
        let text = render(|b| print_result_card(b, &melanoma(), BASE));
        assert!(text.contains("http://127.0.0.1:8000/uploads/mole.jpg"));
        assert!(text.contains("Predicted:"));
        assert!(text.contains("melanoma"));
        assert!(text.contains("atopic dermatitis:"));
        assert!(text.contains("5.12%"));
        assert!(text.contains("84.88%"));
    }

    #[test]
    fn empty_history_message() {
        let text = render(|b| print_history(b, &[], BASE));
        assert!(text.contains("No previous classifications available."));
    }

    #[test]
    fn history_keeps_given_order() {
        let (a, b) = (melanoma(), eczema());
        let text = render(|buf| print_history(buf, &[&b, &a], BASE));
        let elbow = text.find("elbow.jpg").unwrap();
        let mole = text.find("mole.jpg").unwrap();
        assert!(elbow < mole);
        assert!(text.contains("#2"));
    }

    #[test]
    fn upload_form_disables_actions_without_selection() {
        let text = render(|b| print_upload_form(b, None));
        assert!(text.contains("Classify image (disabled)"));
        assert!(!text.contains("Preview:"));
    }

    #[test]
    fn upload_form_shows_preview() {
        let preview = Preview {
            file_name: "hand.png".into(),
            mime: "image/png",
            dimensions: Some((640, 480)),
            size_bytes: 2048,
        };
        let text = render(|b| print_upload_form(b, Some(&preview)));
        assert!(text.contains("Preview:"));
        assert!(text.contains("hand.png"));
        assert!(text.contains("640 x 480"));
        assert!(text.contains("2.0 KiB"));
        assert!(!text.contains("(disabled)"));
    }

    #[test]
    fn result_view_includes_history() {
        let (a, b) = (melanoma(), eczema());
        let view = View::Result {
            result: &a,
            history: vec![&b, &a],
        };
        let text = render(|buf| print_view(buf, &view, BASE));
        assert!(text.contains("=== Classification Result ==="));
        assert!(text.contains("=== Previous classifications ==="));
        assert!(text.contains("Classify another image"));
    }

    #[test]
    fn classifying_view() {
        let text = render(|b| print_view(b, &View::Classifying, BASE));
        assert_eq!(text, "Classifying image...\n");
    }

    #[test]
    fn unknown_index_is_labelled() {
        let odd = ClassificationResult {
            class_idx: 5,
            ..eczema()
        };
        let text = render(|b| print_result_card(b, &odd, BASE));
        assert!(text.contains("unknown"));
    }

    #[test]
    fn byte_sizes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
