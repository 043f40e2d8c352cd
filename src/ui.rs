use std::io::{self, IsTerminal};

use crate::board::{GridView, ListView, TripCard, Unplaced};
use crate::classifier::Highlights;
use crate::domain::dates::format_instant;
use crate::metrics::{MetricsPanel, StatusColor};
use crate::pipeline::DateRange;
use crate::state_store::TripOverride;

pub fn print_grid(grid: &GridView, range: &DateRange) {
    let palette = Palette::auto();
    for line in format_grid(grid, range, &palette) {
        println!("{line}");
    }
}

pub fn print_list(list: &ListView, range: &DateRange) {
    let palette = Palette::auto();
    for line in format_list(list, range, &palette) {
        println!("{line}");
    }
}

pub fn print_metrics(panel: &MetricsPanel) {
    let palette = Palette::auto();
    for line in format_metrics(panel, &palette) {
        println!("{line}");
    }
}

pub fn print_trip_card(card: &TripCard) {
    let palette = Palette::auto();
    for line in format_trip_card(card, &palette) {
        println!("{line}");
    }
}

pub fn print_override(trip_id: &str, state: &TripOverride) {
    let palette = Palette::auto();
    println!("{}", palette.id(trip_id));
    if state.is_empty() {
        println!("  {}", palette.dim("no override stored"));
        return;
    }
    println!(
        "  status: {}",
        state.status.as_deref().unwrap_or("(from file)")
    );
    println!(
        "  assigned: {}",
        state.assigned_name.as_deref().unwrap_or("(none)")
    );
}

pub fn print_missing_columns(columns: &[String]) {
    if columns.is_empty() {
        return;
    }
    let palette = Palette::auto();
    println!(
        "{}",
        palette.dim(&format!("missing columns read as blank: {}", columns.join(", ")))
    );
}

fn format_grid(grid: &GridView, range: &DateRange, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.heading("Trip board")];
    if let Some(summary) = range_summary(range) {
        lines.push(palette.dim(&summary));
    }

    for row in &grid.rows {
        let count: usize = row.cells.iter().map(Vec::len).sum();
        if count == 0 {
            continue;
        }
        lines.push(format!(
            "{} {}",
            palette.status(&row.status),
            palette.dim(&format!("({count})"))
        ));
        for (column, cell) in grid.columns.iter().zip(&row.cells) {
            if cell.is_empty() {
                continue;
            }
            let header = match column.date_label.as_deref() {
                Some(label) => format!("{} {}", column.name, label),
                None => column.name.to_string(),
            };
            lines.push(format!("  {}", palette.dim(&header)));
            for card in cell {
                lines.push(format!("    {}", format_tile(card, palette)));
            }
        }
    }

    if grid.placed_count() == 0 {
        lines.push(palette.dim("no trips on the board"));
    }
    if let Some(note) = unplaced_summary(&grid.unplaced) {
        lines.push(palette.dim(&note));
    }
    lines
}

fn format_tile(card: &TripCard, palette: &Palette) -> String {
    let mut line = format!(
        "{} {} {} accepted={}",
        palette.id(&card.trip_id),
        card.traveler,
        palette.dim(&format!("({})", card.usa_dest)),
        card.items_accepted
    );
    if !card.assigned_name.is_empty() {
        line.push_str(&format!(" @{}", card.assigned_name));
    }
    if let Some(flags) = highlight_flags(card.highlights, palette) {
        line.push(' ');
        line.push_str(&flags);
    }
    line
}

fn format_list(list: &ListView, range: &DateRange, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette.heading("Trips")];
    if let Some(summary) = range_summary(range) {
        lines.push(palette.dim(&summary));
    }
    if list.rows.is_empty() {
        lines.push(palette.dim("no trips matched"));
        return lines;
    }

    for card in &list.rows {
        let mut line = [
            palette.id(&card.trip_id),
            card.traveler.clone(),
            card.ship_bundle.clone(),
            card.max_usa_date.clone(),
            card.usa_dest.clone(),
            card.items_accepted.clone(),
            palette.status(&card.status),
            card.items_ready_to_process.clone(),
            card.assigned_name.clone(),
        ]
        .join(" | ");
        if let Some(flags) = highlight_flags(card.highlights, palette) {
            line.push(' ');
            line.push_str(&flags);
        }
        lines.push(line);
    }
    lines.push(palette.dim(&format!("{} trip(s)", list.rows.len())));
    lines
}

fn format_metrics(panel: &MetricsPanel, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        palette.heading("Metrics"),
        format!("total trips: {}", panel.metrics.total_trips),
        format!("total items: {}", panel.metrics.total_items),
    ];
    for entry in &panel.distribution {
        lines.push(format!(
            "  {} {} {}",
            palette.status(&entry.status),
            entry.count,
            palette.dim(entry.color.hex())
        ));
    }
    lines
}

fn format_trip_card(card: &TripCard, palette: &Palette) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        palette.id(&card.trip_id),
        palette.status(&card.status)
    )];
    let fields = [
        ("Traveler", card.traveler.as_str()),
        ("Ship Bundle", card.ship_bundle.as_str()),
        ("Dest", card.usa_dest.as_str()),
        ("Accepted", card.items_accepted.as_str()),
        ("Max USA Date", card.max_usa_date.as_str()),
        ("Items Ready", card.items_ready_to_process.as_str()),
        ("Total Weight", card.total_bundle_weight.as_str()),
        ("User ID", card.user_id.as_str()),
        ("Assigned", card.assigned_name.as_str()),
    ];
    for (label, value) in fields {
        lines.push(format!("  {}: {}", palette.dim(label), value));
    }
    if let Some(flags) = highlight_flags(card.highlights, palette) {
        lines.push(format!("  {}", flags));
    }
    lines
}

fn highlight_flags(highlights: Highlights, palette: &Palette) -> Option<String> {
    if !highlights.any() {
        return None;
    }
    let mut flags = Vec::new();
    if highlights.not_approved {
        flags.push(palette.paint("33", "!not-approved"));
    }
    if highlights.dest_flagged {
        flags.push(palette.paint("31", "!dest"));
    }
    if highlights.traveler_flagged {
        flags.push(palette.paint("35", "!traveler"));
    }
    Some(flags.join(" "))
}

fn range_summary(range: &DateRange) -> Option<String> {
    match (range.start, range.end) {
        (Some(start), Some(end)) => Some(format!(
            "range: {} .. {}",
            format_instant(start),
            format_instant(end)
        )),
        _ => None,
    }
}

fn unplaced_summary(unplaced: &Unplaced) -> Option<String> {
    if unplaced.total() == 0 {
        return None;
    }
    Some(format!(
        "{} trip(s) not on the grid: weekend={} undated={} unmapped_status={}",
        unplaced.total(),
        unplaced.weekend,
        unplaced.undated,
        unplaced.unmapped_status
    ))
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn status(&self, status: &str) -> String {
        self.paint(status_color_code(status), &format!("[{status}]"))
    }
}

fn status_color_code(status: &str) -> &'static str {
    match StatusColor::for_status(status) {
        StatusColor::Approved => "32",
        StatusColor::InFlight => "33",
        StatusColor::Rejected => "31",
        StatusColor::Neutral => "37",
    }
}

#[cfg(test)]
#[path = "ui_tests_ext.rs"]
mod tests;
