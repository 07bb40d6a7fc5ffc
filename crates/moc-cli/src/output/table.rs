use moc_core::enums::{ChangeStatus, RiskTier};

const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";

/// Render an aligned table for string rows. Numeric cells are right-aligned.
#[must_use]
pub fn render_entity_table(headers: &[&str], rows: &[Vec<String>], color: bool) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .fold(header.len(), usize::max)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let header_line = header_line.trim_end().to_string();
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = vec![header_line, divider];
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                pad_cell(value, *width, color)
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn pad_cell(value: &str, width: usize, color: bool) -> String {
    let pad = " ".repeat(width.saturating_sub(value.chars().count()));
    if looks_numeric(value) {
        return format!("{pad}{value}");
    }
    let shown = match color.then(|| colour_for(value)).flatten() {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    };
    format!("{shown}{pad}")
}

fn looks_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Workflow statuses and risk tiers get a colour; everything else prints plain.
fn colour_for(value: &str) -> Option<&'static str> {
    if let Some(status) = ChangeStatus::ALL.iter().find(|s| s.as_str() == value) {
        return match status {
            ChangeStatus::Approved | ChangeStatus::Completed => Some(GREEN),
            ChangeStatus::Rejected => Some(RED),
            ChangeStatus::Submitted
            | ChangeStatus::UnderEvaluation
            | ChangeStatus::UnderRevision => Some(YELLOW),
            ChangeStatus::Draft | ChangeStatus::Implementation => None,
        };
    }
    [RiskTier::Low, RiskTier::Medium, RiskTier::High, RiskTier::Critical]
        .into_iter()
        .find(|tier| tier.as_str() == value || tier.label() == value)
        .and_then(|tier| match tier {
            RiskTier::Critical => Some(RED),
            RiskTier::High => Some(YELLOW),
            RiskTier::Low | RiskTier::Medium => None,
        })
}
