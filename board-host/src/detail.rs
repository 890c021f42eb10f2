//! Detail view that reports to the log and the host's output stream

use std::sync::mpsc::Sender;

use applicant_board::{DetailView, Item};
use log::info;
use serde_json::json;

/// Forwards detail notifications as JSON lines
pub struct LineDetailView {
    out: Sender<String>,
}

impl LineDetailView {
    pub fn new(out: Sender<String>) -> Self {
        Self { out }
    }

    fn emit(&self, value: serde_json::Value) {
        // Receiver gone means the host is shutting down
        let _ = self.out.send(value.to_string());
    }
}

impl DetailView for LineDetailView {
    fn close(&self, id: &str) {
        info!("detail view closed for deleted card {}", id);
        self.emit(json!({"detail": "closed", "id": id}));
    }

    fn refresh(&self, item: &Item) {
        self.emit(json!({"detail": "refreshed", "item": item}));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applicant_board::ApplicantStatus;

    #[test]
    fn test_emits_lines() {
        let (tx, rx) = std::sync::mpsc::channel();
        let view = LineDetailView::new(tx);
        view.close("a");
        view.refresh(&Item::new("b", ApplicantStatus::Passed, 1.0));

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"detail":"closed","id":"a"}"#);
        assert!(lines[1].contains(r#""status":"passed""#));
    }
}
