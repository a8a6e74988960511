//! Speedlog CLI
//!
//! Usage:
//!   speedlog                                  # Interactive timer log (default)
//!   speedlog --scramble --length 25           # Print a scramble
//!   speedlog --validate <CUBE>                # Validate a 54-symbol cube string
//!   speedlog --serve                          # HTTP API server
//!   speedlog --interactive --json             # JSON statistics output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use speedlog::core::{
    run_server, CubeStateCodec, ScrambleGenerator, ServerConfig, SolveLog, StatisticsEngine,
};
use speedlog::types::{SolveRecord, StatisticsSnapshot};
use speedlog::{DEFAULT_SCRAMBLE_LENGTH, DEFAULT_SOLVER_TIMEOUT_MS, MAX_SCRAMBLE_LENGTH, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "speedlog",
    version = VERSION,
    about = "Speedcubing solve log, statistics and cube state tools",
    long_about = "Speedlog keeps a log of speedcube solve times and derives rolling\n\
                  averages (mo3, ao5, ao12, ao50, ao100, ao1000) from it.\n\n\
                  Modes:\n  \
                  --interactive  Terminal session over an in-memory log (default)\n  \
                  --scramble     Print a random scramble\n  \
                  --validate     Check a 54-symbol cube string\n  \
                  --serve        HTTP API server mode"
)]
struct Args {
    /// Interactive mode - log times from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Print a scramble and exit
    #[arg(long)]
    scramble: bool,

    /// Scramble length in moves
    #[arg(long, default_value_t = DEFAULT_SCRAMBLE_LENGTH)]
    length: usize,

    /// Seed for a reproducible scramble
    #[arg(long)]
    seed: Option<u64>,

    /// Validate a cube string (URFDLB order, 54 symbols)
    #[arg(long, value_name = "CUBE")]
    validate: Option<String>,

    /// Server address
    #[arg(long, env = "SPEEDLOG_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// External solver command (cube string is appended as last argument)
    #[arg(long, env = "SPEEDLOG_SOLVER_CMD")]
    solver: Option<String>,

    /// Solver timeout in milliseconds
    #[arg(long, env = "SPEEDLOG_SOLVER_TIMEOUT_MS", default_value_t = DEFAULT_SOLVER_TIMEOUT_MS)]
    solver_timeout_ms: u64,

    /// Header carrying the user id
    #[arg(long, env = "SPEEDLOG_USER_HEADER", default_value = "x-user-id")]
    user_header: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        tracing_subscriber::fmt::init();
        run_serve(&args).await;
    } else if args.scramble {
        run_scramble(&args);
    } else if let Some(ref cube) = args.validate {
        run_validate(cube, &args);
    } else {
        run_interactive(&args);
    }
}

fn run_scramble(args: &Args) {
    if args.length == 0 || args.length > MAX_SCRAMBLE_LENGTH {
        eprintln!("length must be between 1 and {}", MAX_SCRAMBLE_LENGTH);
        std::process::exit(2);
    }
    let mut generator = match args.seed {
        Some(seed) => ScrambleGenerator::with_seed(seed),
        None => ScrambleGenerator::new(),
    };
    println!("{}", generator.generate(args.length));
}

fn run_validate(cube: &str, args: &Args) {
    match CubeStateCodec::new().validate(cube) {
        Ok(canonical) => {
            if args.json {
                println!("{}", serde_json::json!({ "valid": true, "cube": canonical }));
            } else {
                println!("{} {}", "valid".green(), canonical);
            }
        }
        Err(e) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "valid": false, "kind": e.kind(), "error": e.to_string() })
                );
            } else {
                println!("{} [{}] {}", "invalid".red(), e.kind(), e);
            }
            std::process::exit(1);
        }
    }
}

/// One line of interactive input
#[derive(Debug, PartialEq)]
enum Command {
    Time { seconds: f64, dnf: bool, plus_two: bool },
    Dnf,
    PlusTwo,
    Delete(usize),
    Stats,
    List,
    Scramble,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    match head.as_str() {
        "quit" | "exit" => Ok(Command::Quit),
        "stats" => Ok(Command::Stats),
        "list" => Ok(Command::List),
        "scramble" => Ok(Command::Scramble),
        "dnf" => Ok(Command::Dnf),
        "+2" => Ok(Command::PlusTwo),
        "del" | "delete" => rest
            .first()
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .map(Command::Delete)
            .ok_or_else(|| "usage: del N (N as shown by 'list')".to_string()),
        _ => {
            let seconds: f64 = head
                .parse()
                .map_err(|_| format!("unknown command '{}'", head))?;
            let mut dnf = false;
            let mut plus_two = false;
            for flag in rest {
                match flag.to_ascii_lowercase().as_str() {
                    "dnf" => dnf = true,
                    "+2" => plus_two = true,
                    other => return Err(format!("unknown penalty '{}'", other)),
                }
            }
            Ok(Command::Time { seconds, dnf, plus_two })
        }
    }
}

/// Run interactive mode over an in-memory log
fn run_interactive(args: &Args) {
    let mut log = SolveLog::new();
    let engine = StatisticsEngine::new();
    let mut generator = ScrambleGenerator::new();
    let mut scramble = generator.generate_default();

    print_header();
    println!("Enter a time in seconds (optionally followed by dnf or +2).");
    println!("Commands: dnf, +2, del N, stats, list, scramble, quit");
    println!();
    println!("Scramble: {}", scramble.bold());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("[{}] > ", log.len());
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg.yellow());
                continue;
            }
        };

        match command {
            Command::Quit => {
                println!("\nSession ended. Solves: {}", log.len());
                break;
            }
            Command::Time { seconds, dnf, plus_two } => {
                match SolveRecord::create(seconds, scramble.clone()) {
                    Ok(record) => {
                        let record = record.with_penalty(dnf, plus_two);
                        let shown = record.display_time();
                        let appended = log.append(record);
                        println!("#{} {}", appended.index + 1, shown.cyan());
                        if appended.evicted() {
                            println!("{}", "oldest solve dropped (log is full)".bright_black());
                        }
                        print_stats(&engine.compute(log.records()), args.json);
                        scramble = generator.generate_default();
                        println!("Scramble: {}", scramble.bold());
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Command::Dnf | Command::PlusTwo => {
                let Some(last) = log.len().checked_sub(1) else {
                    println!("{}", "no solves yet".yellow());
                    continue;
                };
                let Some(record) = log.get(last) else { continue };
                let (dnf, plus_two) = if command == Command::Dnf {
                    (!record.is_dnf(), record.has_plus_two())
                } else {
                    (record.is_dnf(), !record.has_plus_two())
                };
                if let Ok(record) = log.set_penalty(last, dnf, plus_two) {
                    println!("#{} {}", last + 1, record.display_time().cyan());
                }
                print_stats(&engine.compute(log.records()), args.json);
            }
            Command::Delete(n) => match log.delete_at(n - 1) {
                Ok(removed) => {
                    println!("deleted #{} ({})", n, removed.display_time());
                    print_stats(&engine.compute(log.records()), args.json);
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            Command::Stats => print_stats(&engine.compute(log.records()), args.json),
            Command::List => {
                if log.is_empty() {
                    println!("{}", "no solves yet".bright_black());
                }
                for (i, record) in log.records().enumerate() {
                    println!("{:>4}. {:<16} {}", i + 1, record.display_time(), record.scramble().bright_black());
                }
            }
            Command::Scramble => {
                scramble = generator.generate_default();
                println!("Scramble: {}", scramble.bold());
            }
        }
    }
}

fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Speedlog v{}", VERSION).bold());
    println!("{}", "========================================".bold());
    println!();
}

fn print_stats(snapshot: &StatisticsSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("could not serialize statistics: {}", e),
        }
        return;
    }

    println!(
        "{} {}   {} {}   {} {}",
        "best".bright_black(),
        snapshot.best_single.to_string().green(),
        "worst".bright_black(),
        snapshot.worst_single.to_string().red(),
        "mean".bright_black(),
        snapshot.session_mean,
    );
    let averages: Vec<String> = snapshot
        .averages
        .iter()
        .filter(|a| a.value.is_available())
        .map(|a| format!("{} {}", a.label.bright_black(), a.value))
        .collect();
    if !averages.is_empty() {
        println!("{}", averages.join("   "));
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args) {
    let config = ServerConfig {
        addr: args.addr.clone(),
        solver_command: args.solver.clone(),
        solver_timeout: Duration::from_millis(args.solver_timeout_ms),
        user_header: args.user_header.clone(),
    };

    println!();
    println!("{}", format!("Speedlog API Server v{}", VERSION).bold());
    println!();

    if let Err(e) = run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_with_penalties() {
        assert_eq!(
            parse_command("12.5 +2").unwrap(),
            Command::Time { seconds: 12.5, dnf: false, plus_two: true }
        );
        assert_eq!(
            parse_command("9 DNF").unwrap(),
            Command::Time { seconds: 9.0, dnf: true, plus_two: false }
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("del 3").unwrap(), Command::Delete(3));
        assert_eq!(parse_command("stats").unwrap(), Command::Stats);
        assert_eq!(parse_command("+2").unwrap(), Command::PlusTwo);
        assert!(parse_command("del 0").is_err());
        assert!(parse_command("hello").is_err());
        assert!(parse_command("10 +3").is_err());
    }
}
