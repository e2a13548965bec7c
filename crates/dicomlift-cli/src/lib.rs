use dicomlift_core::Study;

/// Truncate a field to max_len characters, appending "..." if truncated.
pub fn truncate_field(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Render the aggregated studies as a fixed-width table.
pub fn render_study_table(studies: &[Study]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<12} {:<28} {:<10} {:>6} {:>9}  {}\n",
        "PATIENT", "ID", "DESCRIPTION", "DATE", "SERIES", "INSTANCES", "STATUS"
    ));
    for study in studies {
        out.push_str(&format!(
            "{:<24} {:<12} {:<28} {:<10} {:>6} {:>9}  {}\n",
            truncate_field(&study.patient_name, 24),
            truncate_field(&study.patient_id, 12),
            truncate_field(&study.study_description, 28),
            truncate_field(&study.study_date, 10),
            study.series.len(),
            study.total_instances(),
            study.status
        ));
    }
    out
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
