//! Interactive shell
//!
//! Reads one command line at a time with rustyline, completes command names
//! from the command table and hints at their arguments.

use std::borrow::Cow;
use std::path::PathBuf;

use colored::Colorize;
use directories::ProjectDirs;
use mfrc522_core::command::COMMAND_TABLE;
use mfrc522_core::device::Driver;
use mfrc522_core::transport::SpiTransport;
use mfrc522_core::MEM_SIZE;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::format_answer;

/// Completion and hints for command lines
#[derive(Helper)]
struct ShellHelper;

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if typed.contains(':') {
            return Ok((0, Vec::new()));
        }

        let candidates = COMMAND_TABLE
            .iter()
            .filter(|entry| entry.name.starts_with(typed))
            .map(|entry| Pair {
                display: entry.name.to_string(),
                replacement: if entry.expected_arg_count == 0 {
                    entry.name.to_string()
                } else {
                    format!("{}:", entry.name)
                },
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let hint = match line {
            "mem_write" => ":<len>:<data>",
            "mem_write:" => "<len>:<data>",
            "debug" => ":<on|off>",
            "debug:" => "<on|off>",
            _ => return None,
        };
        Some(hint.to_string())
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ShellHelper {}

fn history_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mfrc522") {
        let mut path = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&path).ok();
        path.push("shell_history");
        path
    } else {
        PathBuf::from(".mfrc522_history")
    }
}

fn print_help() {
    println!("Commands:");
    for entry in &COMMAND_TABLE {
        let usage = match entry.expected_arg_count {
            0 => entry.name.to_string(),
            1 => format!("{}:<on|off>", entry.name),
            _ => format!("{}:<len>:<data>", entry.name),
        };
        println!("  {}", usage.bright_cyan());
    }
    println!();
    println!(
        "  {}  -- show statistics\n  {}   -- this help\n  {}   -- exit",
        ":stats".bright_cyan(),
        ":help".bright_cyan(),
        ":quit".bright_cyan()
    );
}

/// Run the interactive shell until EOF or `:quit`
pub fn run_shell<T: SpiTransport>(
    driver: &mut Driver<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rl = Editor::<ShellHelper, FileHistory>::new()?;
    rl.set_helper(Some(ShellHelper));

    let history_path = history_path();
    if rl.load_history(&history_path).is_err() {
        log::debug!("No shell history at {}", history_path.display());
    }

    println!(
        "Type {} for available commands, {} to exit.",
        ":help".bright_cyan(),
        ":quit".bright_cyan()
    );

    let prompt = format!("{} ", "mfrc522>".bright_green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim_end_matches(['\r', '\n']);
                if input.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                match input.trim() {
                    ":q" | ":quit" => break,
                    ":?" | ":help" => {
                        print_help();
                        continue;
                    }
                    ":stats" => {
                        let stats = driver.state().stats();
                        println!(
                            "bytes read: {}, bytes written: {}, debug: {}",
                            stats.bytes_read,
                            stats.bytes_written,
                            if driver.state().debug_on() { "on" } else { "off" }
                        );
                        continue;
                    }
                    _ => {}
                }

                match driver.write(input.as_bytes()) {
                    Ok(_) => {
                        let mut answer = [0u8; MEM_SIZE];
                        let len = driver.read(&mut answer);
                        if len > 0 {
                            println!(
                                "{} {}",
                                "=>".bright_blue().bold(),
                                format_answer(&answer[..len])
                            );
                        } else {
                            println!("{}", "ok".green());
                        }
                    }
                    Err(e) => {
                        eprintln!(
                            "{}: {} (status {})",
                            "Error".bright_red().bold(),
                            e,
                            e.status()
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}: {:?}", "Error".bright_red().bold(), err);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        eprintln!(
            "{}: Failed to save history: {}",
            "Warning".bright_yellow(),
            e
        );
    }

    Ok(())
}
