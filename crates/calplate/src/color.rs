use calplate_core::Warning;
use colored::Colorize;

/// Respects NO_COLOR
pub fn init_color() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }
}

pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{} {warning}", "Warning:".yellow());
    }
}
