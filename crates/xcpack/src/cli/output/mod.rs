//! Output formatting utilities

use console::style;

use xcpack_core::Reporter;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Terminal reporter for pipeline progress
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        info(message);
    }

    fn success(&self, message: &str) {
        success(message);
    }

    fn warning(&self, message: &str) {
        warning(message);
    }

    fn error(&self, message: &str) {
        error(message);
    }

    fn blank(&self) {
        println!();
    }
}
