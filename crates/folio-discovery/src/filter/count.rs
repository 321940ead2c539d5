// crates/folio-discovery/src/filter/count.rs

/// Results-count line shown next to the filter controls
pub fn results_count_message(visible: usize, total: usize, has_active: bool, label: &str) -> String {
    if has_active {
        format!("{} of {} {}s", visible, total, label)
    } else {
        format!("{} {}s total", total, label)
    }
}
