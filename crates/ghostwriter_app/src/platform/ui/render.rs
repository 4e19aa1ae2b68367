use std::fmt::Write as _;
use std::path::Path;

use ghostwriter_core::{AppViewModel, SubmissionState, MODEL_CATALOG};

pub fn render(view: &AppViewModel, preview: Option<&Path>) -> String {
    let mut out = String::new();

    let status = match (&view.submission, &view.generating_label) {
        (_, Some(label)) => label.clone(),
        (SubmissionState::Settled(_), None) if view.last_failure.is_some() => {
            "Last generation failed".to_string()
        }
        _ if view.can_generate => "Ready to generate".to_string(),
        _ => "Add screenshots to begin".to_string(),
    };
    let _ = writeln!(out, "== Ghostwriter | {} ==", status);
    let _ = writeln!(out, "Model: {}", view.selected_model_label);

    if view.queue.is_empty() {
        let _ = writeln!(out, "Queue: empty");
    } else {
        let _ = writeln!(out, "Queue ({}):", view.queue.len());
        for (pos, row) in view.queue.iter().enumerate() {
            let marker = if view.enlarged == Some(row.file_id) {
                "*"
            } else {
                " "
            };
            let _ = writeln!(
                out,
                " {}{:>2}. {} ({})",
                marker,
                pos + 1,
                row.name,
                format_bytes(row.bytes)
            );
        }
    }
    if let Some(path) = preview {
        let _ = writeln!(out, "Preview: {}", path.display());
    }

    if let Some(result) = &view.result {
        let copy_label = if view.copied { "Copied!" } else { "copy" };
        let _ = writeln!(
            out,
            "Result: {} lines ready [{}]",
            result.lines().count(),
            copy_label
        );
    }

    if view.history_open {
        out.push_str(&render_history(view));
    } else if !view.history.is_empty() {
        let _ = writeln!(out, "History: {} entries (history to open)", view.history.len());
    }

    out
}

pub fn render_history(view: &AppViewModel) -> String {
    let mut out = String::new();
    if view.history.is_empty() {
        let _ = writeln!(out, "History: nothing generated yet");
        return out;
    }
    let _ = writeln!(out, "History:");
    for (pos, row) in view.history.iter().enumerate() {
        let _ = writeln!(
            out,
            " {:>2}. [{}] {} ({})",
            pos + 1,
            row.model_badge,
            row.summary,
            row.date
        );
    }
    out
}

pub fn render_result(view: &AppViewModel) -> String {
    match &view.result {
        Some(result) => format!("----- result -----\n{}\n------------------\n", result),
        None => "No result yet.\n".to_string(),
    }
}

pub fn render_models(selected: &str) -> String {
    let mut out = String::new();
    for model in MODEL_CATALOG {
        let marker = if model.id == selected { "*" } else { " " };
        let _ = writeln!(out, " {} {:<28} {}", marker, model.id, model.name);
    }
    out
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ghostwriter_core::{AppViewModel, HistoryRowView, QueueRowView, SubmissionState};
    use uuid::Uuid;

    use super::{format_bytes, render, render_history, render_models, render_result};

    fn view_with_queue() -> AppViewModel {
        AppViewModel {
            queue: vec![
                QueueRowView {
                    file_id: 1,
                    name: "one.png".to_string(),
                    bytes: 512,
                },
                QueueRowView {
                    file_id: 2,
                    name: "two.png".to_string(),
                    bytes: 4096,
                },
            ],
            enlarged: Some(2),
            selected_model: "solar-pro3".to_string(),
            selected_model_label: "Solar Pro 3 (Powerful MoE 102B)".to_string(),
            can_generate: true,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn queue_rows_are_numbered_and_enlarged_is_marked() {
        let text = render(&view_with_queue(), Some(Path::new("/tmp/p/2-two.png")));
        assert!(text.contains("Ready to generate"));
        assert!(text.contains("   1. one.png (512 B)"));
        assert!(text.contains(" * 2. two.png (4.0 KiB)"));
        assert!(text.contains("Preview: /tmp/p/2-two.png"));
    }

    #[test]
    fn pending_shows_generating_label() {
        let view = AppViewModel {
            submission: SubmissionState::Pending,
            generating_label: Some("Writing with Solar Pro 3...".to_string()),
            ..view_with_queue()
        };
        assert!(render(&view, None).starts_with("== Ghostwriter | Writing with Solar Pro 3... =="));
    }

    #[test]
    fn copied_flag_changes_result_line() {
        let mut view = AppViewModel {
            result: Some("# T\n\nbody".to_string()),
            ..AppViewModel::default()
        };
        assert!(render(&view, None).contains("Result: 3 lines ready [copy]"));
        view.copied = true;
        assert!(render(&view, None).contains("[Copied!]"));
        assert!(render_result(&view).contains("# T\n\nbody"));
    }

    #[test]
    fn history_rows_show_badge_and_date() {
        let view = AppViewModel {
            history: vec![HistoryRowView {
                id: Uuid::new_v4(),
                summary: "Hello world.".to_string(),
                model_badge: "Solar Pro 2".to_string(),
                date: "2026-10-17".to_string(),
            }],
            history_open: true,
            ..AppViewModel::default()
        };
        assert_eq!(
            render_history(&view),
            "History:\n  1. [Solar Pro 2] Hello world. (2026-10-17)\n"
        );
        assert!(render_history(&AppViewModel::default()).contains("nothing generated yet"));
    }

    #[test]
    fn models_list_marks_selection() {
        let text = render_models("solar-pro2");
        assert!(text.contains(" * solar-pro2"));
        assert!(text.contains("   solar-pro3"));
    }

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(10), "10 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
