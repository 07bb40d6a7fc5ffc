use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

static TABLE_COLOR: OnceLock<bool> = OnceLock::new();

/// Decide once whether table output is coloured.
pub fn init(flags: &GlobalFlags) {
    let table_color = flags.format == OutputFormat::Table
        && match flags.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::io::stdout().is_terminal()
                    && !flags.quiet
                    && std::env::var_os("NO_COLOR").is_none()
            }
        };
    let _ = TABLE_COLOR.set(table_color);
}

#[must_use]
pub fn table_color() -> bool {
    TABLE_COLOR.get().copied().unwrap_or(false)
}
