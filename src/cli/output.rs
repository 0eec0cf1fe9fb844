//! Terminal output for `--list-tools`
//!
//! Colored output respects the NO_COLOR env var.

use crate::mcp::ToolRegistry;

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Style for labels/headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    /// Style for tool names
    pub fn tool_name(s: &str) -> ColoredString {
        s.cyan()
    }

    /// Style for numbers/counts
    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for write tool markers
    pub fn write_marker(s: &str) -> ColoredString {
        s.red()
    }

    /// Style for dim/secondary text
    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }

    /// Style for error messages
    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }
}

/// One catalog line: name, write marker and description
pub fn format_tool_line(name: &str, description: &str, is_write: bool) -> String {
    let marker = if is_write {
        format!(" {}", colors::write_marker("[write]"))
    } else {
        String::new()
    };
    format!(
        "  {}{}\n      {}",
        colors::tool_name(name),
        marker,
        colors::dim(description)
    )
}

/// Print the registered tools, in registration order
pub fn print_tool_list(registry: &ToolRegistry) {
    println!(
        "{} ({})",
        colors::label("Available tools"),
        colors::number(&registry.len().to_string())
    );
    for handler in registry.handlers() {
        let schema = handler.schema();
        println!(
            "{}",
            format_tool_line(&schema.name, &schema.description, handler.is_write())
        );
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}: {}", colors::error("Error"), message);
}
