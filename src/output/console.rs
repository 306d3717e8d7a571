//! Console output utilities.

use console::{style, Term};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Clear the terminal screen.
pub fn clear_terminal() {
    let _ = Term::stdout().clear_screen();
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════╗
║     Hanime Downloader                         ║
║     Episode download and decryption tool      ║
╚═══════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}
