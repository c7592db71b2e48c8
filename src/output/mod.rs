//! Terminal styling for the nexcess client
//!
//! Soft truecolor palette; errors go to stderr, everything else to stdout.

use owo_colors::OwoColorize;

/// Indentation unit for summary trees
const INDENT: &str = "  ";

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    println!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

pub fn info(message: &str) {
    // Pastel sky blue: RGB(160, 200, 255)
    println!(
        "{} {}",
        "ℹ".truecolor(160, 200, 255).bold(),
        message.bright_white()
    );
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    // Pastel lavender: RGB(181, 174, 254)
    println!("\n{}", title.truecolor(181, 174, 254).bold());
    println!("{}", "─".repeat(50).truecolor(160, 160, 160));
}

/// Print one `key: value` line of a summary tree at `depth`
pub fn key_value(depth: usize, key: &str, value: &str) {
    println!(
        "{}{} {}",
        INDENT.repeat(depth + 1),
        format!("{}:", key).truecolor(160, 160, 160),
        value.bright_white()
    );
}

/// Print the key of a nested object; its children follow one level deeper
pub fn branch(depth: usize, key: &str) {
    // Softer pastel teal: RGB(120, 180, 195)
    println!(
        "{}{}",
        INDENT.repeat(depth + 1),
        format!("{}:", key).truecolor(120, 180, 195)
    );
}

/// Print a list item with a bullet
pub fn list_item(text: &str) {
    println!("  {} {}", "•".truecolor(160, 160, 160), text.bright_white());
}

/// Print a follow-up command the user may want to run
pub fn command_suggestion(description: &str, command: &str) {
    println!(
        "  {} {}",
        description.truecolor(160, 160, 160),
        command.truecolor(255, 230, 160).bold()
    );
}

/// Print unstyled text, used for machine-readable output
pub fn plain(text: &str) {
    println!("{}", text);
}

pub fn blank() {
    println!();
}
