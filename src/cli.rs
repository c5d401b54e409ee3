//! Command-line interface and REPL
//!
//! Replaces the window keybindings of a camera overlay UI: commands are typed
//! into a rustyline prompt and forwarded to the control loop over a channel.
//! Single-character aliases (`c` calibrate, `9` accelerate, `0` brake,
//! `q` quit) keep the commands usable mid-drive.

use crate::pipeline::Command;
use colored::Colorize;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::debug;

/// Parse one REPL line into a command.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "calibrate" | "cal" | "c" => Some(Command::Calibrate),
        "accel" | "gas" | "9" => Some(Command::Accelerate),
        "brake" | "0" => Some(Command::Brake),
        "status" | "s" => Some(Command::Status),
        "quit" | "exit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

fn print_usage() {
    println!("{}", "Commands:".bold());
    println!("  {}  start the 3s center-pose countdown", "calibrate (c)".cyan());
    println!("  {}      full throttle", "accel (9)".green());
    println!("  {}      full brake", "brake (0)".red());
    println!("  {}     show pipeline status", "status (s)".cyan());
    println!("  {}       stop the control loop", "quit (q)".yellow());
}

/// Run the blocking REPL, forwarding commands to the control loop.
///
/// Runs on its own thread (rustyline blocks); returns when the user quits,
/// input is closed, or the control loop has gone away.
pub fn run_repl(commands: mpsc::Sender<Command>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            debug!("REPL unavailable: {}", e);
            return;
        }
    };

    print_usage();
    loop {
        let line = match rl.readline("handwheel> ") {
            Ok(line) => line,
            Err(_) => {
                let _ = commands.blocking_send(Command::Quit);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&line);

        match parse_command(&line) {
            Some(command) => {
                let quit = command == Command::Quit;
                if commands.blocking_send(command).is_err() || quit {
                    break;
                }
            }
            None => {
                println!("{} {}", "Unknown command:".red(), line.trim());
                print_usage();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_command("calibrate"), Some(Command::Calibrate));
        assert_eq!(parse_command(" C "), Some(Command::Calibrate));
        assert_eq!(parse_command("9"), Some(Command::Accelerate));
        assert_eq!(parse_command("gas"), Some(Command::Accelerate));
        assert_eq!(parse_command("0"), Some(Command::Brake));
        assert_eq!(parse_command("status"), Some(Command::Status));
        assert_eq!(parse_command("QUIT"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(parse_command("drift"), None);
        assert_eq!(parse_command(""), None);
    }
}
