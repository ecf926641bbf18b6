//! Table display for enriched assignments.

use rolecall_graph::EnrichedAssignment;

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len`, it is truncated with "..." appended.
/// Uses character boundaries to avoid panicking on multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Prints the default summary projection: resource display name and role
/// name, one row per assignment.
pub fn print_assignment_table(assignments: &[EnrichedAssignment]) {
    println!("{:<42} {}", "RESOURCE", "ROLE");
    for assignment in assignments {
        let resource = assignment.resource_display_name.as_deref().unwrap_or("-");
        println!("{:<42} {}", truncate(resource, 40), assignment.role_name);
    }
    println!(
        "\n{} assignment{}",
        assignments.len(),
        if assignments.len() == 1 { "" } else { "s" }
    );
}
