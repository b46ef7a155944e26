use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn coordinator_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/coordinator.log")
}

/// Appends a structured JSON line to the coordinator log. Logging must never
/// fail a run, so every error here is swallowed.
pub fn append_run_log_line(state_root: &Path, level: &str, event: &str, run_id: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": chrono::Utc::now().timestamp(),
        "level": level,
        "event": event,
        "runId": run_id,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    let path = coordinator_log_path(state_root);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
