//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     twitter-media-dl                                  ║
║     Likes and timeline media downloader               ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(user: &str, download_mode: &str, copy_mode: &str, download_dir: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Account:   {}", user);
    println!("  Mode:      {}", download_mode);
    println!("  Copies:    {}", copy_mode);
    println!("  Directory: {}", download_dir);
    println!();
}
