//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! ## Check
//!
//! ```text
//! Layouts themes/custom/northwind/northwind.responsive_image_layouts.yml
//! one_column
//!     full
//!         hero: hero_wide
//!         teaser: teaser_large
//! two_column
//!     halves
//!         teaser: zone1 teaser_half, zone2 teaser_half
//!
//! Fallback: one_column → full
//! 2 layouts, 2 section layouts, 3 image styles
//! ```

use crate::document::{FallbackError, StyleCell, StyleConfigDocument};
use std::path::Path;

const INDENT: &str = "    ";

/// Render a cell value: the style itself, or each style labelled by zone.
pub fn format_cell(cell: &StyleCell) -> String {
    match cell {
        StyleCell::Scalar(style) if style.is_empty() => "(empty)".to_string(),
        StyleCell::Scalar(style) => style.clone(),
        StyleCell::Sequence(styles) if styles.is_empty() => "(empty list)".to_string(),
        StyleCell::Sequence(styles) => styles
            .iter()
            .enumerate()
            .map(|(i, style)| format!("zone{} {}", i + 1, style))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Describe the fallback entry, flagging pairs that point nowhere.
pub fn format_fallback(doc: &StyleConfigDocument) -> String {
    match doc.fallback() {
        Ok((layout, section)) => {
            let defined = doc
                .layouts()
                .get(layout)
                .is_some_and(|sections| sections.contains_key(section));
            if defined {
                format!("Fallback: {layout} → {section}")
            } else {
                format!("Fallback: {layout} → {section} (not defined in this file)")
            }
        }
        Err(FallbackError::Missing) => "Fallback: missing".to_string(),
        Err(FallbackError::Ambiguous(layouts)) => {
            format!("Fallback: ambiguous ({})", layouts.join(", "))
        }
    }
}

/// Inventory of a layout document for the `check` command.
pub fn format_check_output(path: &Path, doc: &StyleConfigDocument) -> Vec<String> {
    let mut lines = vec![format!("Layouts {}", path.display())];

    if doc.layouts().is_empty() {
        lines.push(format!("{INDENT}(no layouts defined)"));
    }

    let mut sections = 0;
    let mut slots = 0;
    for (layout, layout_sections) in doc.layouts() {
        lines.push(layout.clone());
        for (section, cells) in layout_sections {
            sections += 1;
            lines.push(format!("{INDENT}{section}"));
            for (slot, cell) in cells {
                slots += 1;
                lines.push(format!("{INDENT}{INDENT}{slot}: {}", format_cell(cell)));
            }
        }
    }

    lines.push(String::new());
    lines.push(format_fallback(doc));
    lines.push(format!(
        "{} {}, {} {}, {} {}",
        doc.layouts().len(),
        plural(doc.layouts().len(), "layout", "layouts"),
        sections,
        plural(sections, "section layout", "section layouts"),
        slots,
        plural(slots, "image style", "image styles"),
    ));
    lines
}

pub fn print_check_output(path: &Path, doc: &StyleConfigDocument) {
    for line in format_check_output(path, doc) {
        println!("{}", line);
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
