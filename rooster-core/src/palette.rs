//! Department colours for the roster grid.

use std::collections::HashMap;

use crate::model::Department;

pub const PALETTE: [&str; 15] = [
    "#e57373", "#64b5f6", "#81c784", "#ffd54f", "#ba68c8", "#4db6ac", "#f06292", "#a1887f",
    "#90a4ae", "#ff8a65", "#9fa8da", "#80cbc4", "#ffcc02", "#ab47bc", "#26a69a",
];

/// Colour for labels that no longer match any department.
pub const FALLBACK_COLOR: &str = "#e9ecef";

/// Colour of `department` given the current ordered department list.
///
/// Position in the list modulo the palette size; stale labels get
/// [`FALLBACK_COLOR`]. When a name appears twice, the first entry wins.
pub fn color_for(department: &str, departments: &[Department]) -> &'static str {
    departments
        .iter()
        .position(|d| d.name == department)
        .map(|i| PALETTE[i % PALETTE.len()])
        .unwrap_or(FALLBACK_COLOR)
}

/// Name → colour lookup computed once per render.
#[derive(Debug, Clone, Default)]
pub struct DepartmentPalette {
    colors: HashMap<String, &'static str>,
    order: Vec<String>,
}

impl DepartmentPalette {
    pub fn new(departments: &[Department]) -> Self {
        let mut colors = HashMap::new();
        let mut order = Vec::new();
        for (i, dep) in departments.iter().enumerate() {
            if !colors.contains_key(&dep.name) {
                colors.insert(dep.name.clone(), PALETTE[i % PALETTE.len()]);
                order.push(dep.name.clone());
            }
        }
        DepartmentPalette { colors, order }
    }

    pub fn color(&self, department: &str) -> &'static str {
        self.colors.get(department).copied().unwrap_or(FALLBACK_COLOR)
    }

    /// (name, colour) pairs in department-list order, for a legend.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.order.iter().map(|n| (n.as_str(), self.color(n)))
    }
}

/// Parse "#rrggbb" into components.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
