//! Output Rendering
//!
//! Renders build reports and watch events as text or JSON.

use std::fmt::Write as _;

use crate::application::{BlobState, BuildReport};
use crate::config::MergeKind;
use crate::watcher::WatchEvent;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Icons for output rendering
#[derive(Debug, Clone, Copy)]
struct Icons {
    check: &'static str,
    cross: &'static str,
    write: &'static str,
    skip: &'static str,
    trash: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            write: "→",
            skip: "○",
            trash: "-",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            write: "->",
            skip: "[ ]",
            trash: "[DEL]",
        }
    }

    fn pick(unicode: bool) -> Self {
        if unicode {
            Self::unicode()
        } else {
            Self::ascii()
        }
    }
}

/// Trait for rendering build reports
pub trait BuildReportRenderer {
    fn render(&self, report: &BuildReport, kind: MergeKind) -> String;
}

/// Text renderer for build reports
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub unicode: bool,
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl BuildReportRenderer for TextRenderer {
    fn render(&self, report: &BuildReport, kind: MergeKind) -> String {
        let icons = Icons::pick(self.unicode);
        let mut out = String::new();
        let mode = if report.incremental {
            "incremental"
        } else {
            "full"
        };
        let _ = writeln!(out, "{} Merged {kind} ({mode})", icons.check);
        if let Some(reason) = &report.fallback {
            let _ = writeln!(out, "  {} rescanned: {reason}", icons.skip);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "  {} sets", report.sets);
        if report.incremental {
            let _ = writeln!(
                out,
                "  {} changes applied, {} skipped",
                report.applied, report.skipped
            );
        }
        let _ = writeln!(out, "  {} {} added", icons.write, report.merge.added);
        let _ = writeln!(out, "  {} {} removed", icons.trash, report.merge.removed);
        if self.verbose > 0 {
            let _ = writeln!(out, "  {} {} kept", icons.skip, report.merge.kept);
            let _ = writeln!(out, "  {} ms", report.duration_ms);
        }
        out
    }
}

/// JSON renderer for build reports
pub struct JsonRenderer;

impl BuildReportRenderer for JsonRenderer {
    fn render(&self, report: &BuildReport, kind: MergeKind) -> String {
        let json = serde_json::json!({
            "command": "merge",
            "kind": kind.as_str(),
            "incremental": report.incremental,
            "fallback": report.fallback,
            "sets": report.sets,
            "applied": report.applied,
            "skipped": report.skipped,
            "added": report.merge.added,
            "removed": report.merge.removed,
            "kept": report.merge.kept,
            "duration_ms": report.duration_ms,
        });
        serde_json::to_string(&json).unwrap_or_default()
    }
}

/// Create a renderer based on format
pub fn create_renderer(
    format: OutputFormat,
    unicode: bool,
    verbose: u8,
) -> Box<dyn BuildReportRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { unicode, verbose }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// One line describing a blob state.
pub fn render_blob_state(state: BlobState, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({
            "command": "check-blob",
            "state": state.as_str(),
            "reusable": state == BlobState::Reusable,
        })
        .to_string(),
        OutputFormat::Text => match state {
            BlobState::Missing => "No merge blob; the next build is a full build".to_string(),
            BlobState::Unusable => {
                "Merge blob is unreadable or incompatible; the next build is a full build"
                    .to_string()
            }
            BlobState::Stale => {
                "Merge blob declares different sets; the next build is a full build".to_string()
            }
            BlobState::Reusable => "Merge blob is reusable".to_string(),
        },
    }
}

/// One text line for a watch event, prefixed with `timestamp`.
pub fn render_watch_event(timestamp: &str, event: &WatchEvent, unicode: bool) -> String {
    let icons = Icons::pick(unicode);
    let body = match event {
        WatchEvent::WatchStarted { sets, watching } => format!(
            "Watching {} folders of {} sets (Ctrl+C to stop)",
            watching.len(),
            sets.len()
        ),
        WatchEvent::FileChanged { path, status } => {
            format!("{} {status}: {path}", icons.write)
        }
        WatchEvent::FileSkipped { path, validity } => {
            format!("{} {validity}: {path}", icons.skip)
        }
        WatchEvent::BuildStarted { changes } => format!("Merging {changes} changes..."),
        WatchEvent::BuildComplete {
            incremental,
            added,
            removed,
            fallback,
            duration_ms,
            ..
        } => {
            let mode = if *incremental { "incremental" } else { "full" };
            let mut line = format!(
                "{} {mode} merge: {added} added, {removed} removed ({duration_ms} ms)",
                icons.check
            );
            if let Some(reason) = fallback {
                let _ = write!(line, " after rescan: {reason}");
            }
            line
        }
        WatchEvent::Error { message } => format!("{} {message}", icons.cross),
        WatchEvent::Shutdown => "Stopped watching".to_string(),
    };
    format!("[{timestamp}] {body}\n")
}
