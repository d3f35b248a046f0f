//! TUI rendering for rooster types.
//!
//! Extension traits that add colored terminal output to rooster-core types
//! using owo_colors. Department colours are drawn as truecolor backgrounds.

use chrono::Timelike;
use owo_colors::OwoColorize;
use rooster_core::admin::ResolvedBlock;
use rooster_core::palette::{DepartmentPalette, hex_to_rgb};
use rooster_core::{Event, ScheduleView, VolunteerProfile};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", self.name.bold(), self.render_span().dimmed());
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        line
    }
}

impl Render for VolunteerProfile {
    fn render(&self) -> String {
        match &self.email {
            Some(email) => format!("{} {}", self.display_name(), format!("<{email}>").dimmed()),
            None => self.display_name().to_string(),
        }
    }
}

impl Render for ResolvedBlock {
    fn render(&self) -> String {
        let when = match (self.start, self.end) {
            (Some(s), Some(e)) => format!("{} {}–{}", s.format("%a %d %b"), s.format("%H:%M"), e.format("%H:%M")),
            (Some(s), None) => format!("{} {}–?", s.format("%a %d %b"), s.format("%H:%M")),
            _ => "no time".to_string(),
        };
        format!(
            "{:<22} {:<20} {:<12} {} {}",
            when,
            self.volunteer,
            self.department,
            self.event.dimmed(),
            self.id.dimmed()
        )
    }
}

/// A coloured block of `width` spaces.
pub fn swatch(hex: &str, width: usize) -> String {
    let cell = " ".repeat(width);
    match hex_to_rgb(hex) {
        Some((r, g, b)) => cell.on_truecolor(r, g, b).to_string(),
        None => cell,
    }
}

pub fn render_legend(palette: &DepartmentPalette) -> String {
    let entries: Vec<String> = palette
        .legend()
        .map(|(name, color)| format!("{} {}", swatch(color, 2), name))
        .collect();
    if entries.is_empty() {
        return "No departments".dimmed().to_string();
    }
    entries.join("  ")
}

const NAME_WIDTH: usize = 18;
const CELL_WIDTH: usize = 3;

/// The volunteer × hour grid for the selected day, followed by a legend and
/// each volunteer's blocks.
pub fn render_schedule(view: &ScheduleView) -> String {
    let mut lines = Vec::new();
    lines.push(view.event().render());

    let Some(matrix) = view.matrix() else {
        lines.push("   This event has no dates yet".dimmed().to_string());
        return lines.join("\n");
    };

    let days: Vec<String> = view
        .days()
        .iter()
        .map(|d| {
            let label = d.format("%a %d %b").to_string();
            if *d == matrix.day {
                format!("[{label}]").bold().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect();
    lines.push(days.join("  "));
    lines.push(String::new());

    if matrix.is_empty() {
        lines.push("   Nobody is rostered on this day".dimmed().to_string());
        return lines.join("\n");
    }

    let header: String = matrix
        .slots
        .times()
        .iter()
        .map(|t| format!("{:<width$}", format!("{:02}", t.hour()), width = CELL_WIDTH))
        .collect();
    lines.push(format!("{:<NAME_WIDTH$}{}", "", header.dimmed()));

    let palette = view.palette();
    for row in &matrix.rows {
        let name = truncate(&view.names().volunteer(row.volunteer_id.as_deref()), NAME_WIDTH - 1);
        let cells: String = (0..matrix.slots.len())
            .map(|i| match row.blocks_at(i).as_slice() {
                [] => format!("{:<CELL_WIDTH$}", "·").dimmed().to_string(),
                [only] => swatch(palette.color(&only.department), CELL_WIDTH),
                [first, rest @ ..] => {
                    let marker = format!("{:<CELL_WIDTH$}", format!("+{}", rest.len()));
                    match hex_to_rgb(palette.color(&first.department)) {
                        Some((r, g, b)) => marker.black().on_truecolor(r, g, b).to_string(),
                        None => marker,
                    }
                }
            })
            .collect();
        lines.push(format!("{name:<NAME_WIDTH$}{cells}"));
    }

    lines.push(String::new());
    lines.push(render_legend(palette));
    lines.push(String::new());

    for row in &matrix.rows {
        let name = view.names().volunteer(row.volunteer_id.as_deref());
        for block in &row.blocks {
            lines.push(format!(
                "  {} {:<NAME_WIDTH$} {:<12} {} {}",
                swatch(palette.color(&block.department), 2),
                name,
                block.department,
                block.render_interval(),
                block.id.dimmed()
            ));
        }
    }

    lines.join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
