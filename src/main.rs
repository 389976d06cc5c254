// Interactive terminal front-end over the gacha session
use dialoguer::{Confirm, Input, Select};
use gacha_core::{
    GachaConfig, GachaSession, JsonFileStore, PullOutcome, PullRejection, RandomSource, StoreError,
    config::CONFIG_FILE, rng, ui,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

struct Args {
    reset: bool,
    config: PathBuf,
}

fn parse_args() -> Args {
    let mut args = Args { reset: false, config: PathBuf::from(CONFIG_FILE) };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--reset" => args.reset = true,
            "--config" => {
                match it.next() {
                    Some(path) => args.config = PathBuf::from(path),
                    None => println!("⚠️  Ignoring '--config' without a path"),
                }
            }
            other => println!("⚠️  Ignoring unknown argument '{}'", other),
        }
    }
    args
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let config = match GachaConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let table = match config.load_catalog() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if args.reset {
        match JsonFileStore::remove(&config.save_file) {
            Ok(()) => println!("Save data cleared."),
            Err(e) => println!("⚠️  Failed to clear save data: {}", e),
        }
    }
    let store = match JsonFileStore::open(&config.save_file) {
        Ok(s) => s,
        Err(e) => {
            println!("⚠️  Could not read save data ({}), starting fresh!", e);
            match open_fresh_store(&config.save_file) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Save storage unavailable: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let mut session = match GachaSession::new(&config, table, rng::from_entropy(), store) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };
    run(&mut session);
    ExitCode::SUCCESS
}

// Drop the unreadable main file first so a good backup is picked up; clear both
// only when the backup is unreadable too.
fn open_fresh_store(path: &Path) -> Result<JsonFileStore, StoreError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    match JsonFileStore::open(path) {
        Ok(s) => Ok(s),
        Err(_) => {
            JsonFileStore::remove(path)?;
            JsonFileStore::open(path)
        }
    }
}

fn run<R: RandomSource>(session: &mut GachaSession<R>) {
    loop {
        let snap = session.snapshot();
        ui::print_simple_header("Gacha");
        ui::print_status(&snap);
        let options = [
            ui::pull_label(snap.tickets.available),
            "Add Tickets".to_string(),
            "Reset Tickets".to_string(),
            "View History".to_string(),
            "Exit".to_string(),
        ];
        let Ok(choice) = Select::new().items(&options).default(0).interact() else {
            println!("Goodbye!");
            return;
        };
        match choice {
            0 => pull(session),
            1 => add_tickets(session),
            2 => {
                session.reset_tickets(None);
                println!("🎟️  Tickets reset to {}.", session.ticket_balance().available);
            }
            3 => ui::print_history(session.history(), session.engine().table()),
            4 => {
                println!("Goodbye!");
                return;
            }
            _ => unreachable!(),
        }
    }
}

fn pull<R: RandomSource>(session: &mut GachaSession<R>) {
    match session.request_pull() {
        PullOutcome::Accepted => {}
        PullOutcome::Rejected(PullRejection::InsufficientTickets) => {
            println!("🚫 Not enough tickets. Add some first.");
            return;
        }
        PullOutcome::Rejected(PullRejection::Busy(phase)) => {
            println!("⏳ A pull is still in progress ({:?}).", phase);
            return;
        }
    }
    if let Some(result) = session.current_result() {
        ui::print_reveal(result, session.engine().table());
    }
    let _ = Confirm::new().with_prompt("Close").default(true).interact();
    session.acknowledge_result();
}

fn add_tickets<R: RandomSource>(session: &mut GachaSession<R>) {
    let amount = Input::<u32>::new().with_prompt("How many tickets?").default(10).interact_text();
    match amount {
        Ok(0) => println!("Nothing added."),
        Ok(n) => {
            session.add_tickets(n);
            println!("➕ Added {} ticket(s).", n);
        }
        Err(e) => println!("Cancelled: {}", e),
    }
}
