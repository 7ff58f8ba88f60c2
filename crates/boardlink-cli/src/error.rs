use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("arduino-cli not found") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Install arduino-cli and make sure it is on your PATH:");
        eprintln!("  {}", "https://arduino.github.io/arduino-cli/".dimmed());
    }

    if msg.contains("could not auto-detect fqbn") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check connected boards with:");
        eprintln!("  {} boardlink ports", "$".dimmed());
        eprintln!("  or pass the board explicitly with --fqbn (e.g. arduino:avr:uno).");
    }

    if msg.contains("permission denied") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  You may lack permission to open the serial port.");
        eprintln!("  On Linux, add yourself to the dialout group and log in again.");
    }

    std::process::exit(1);
}
