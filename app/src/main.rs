//! `raffle`: terminal front end for the raffle engine.
//!
//! Arguments are `key=value` tokens (`raffle.fps=30 raffle.data=./state`).
//! Lines typed on stdin are commands; an empty line is the trigger.

mod app;
mod commands;
mod file_storage;
mod terminal;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use raffle_lib::{
    KlogLevel, config_from_cmdline, frame_period_ms, klog_info, klog_init, klog_register_backend,
    klog_set_level, random_seed,
};

use crate::app::{App, Flow};
use crate::file_storage::FileStorage;
use crate::terminal::{TerminalBackend, terminal_size};

fn stderr_backend(level: KlogLevel, args: fmt::Arguments<'_>) {
    eprintln!("[{:<5}] {}", level.as_str(), args);
}

fn time_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ (u64::from(std::process::id()) << 32)
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> ExitCode {
    let cmdline = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let config = config_from_cmdline(Some(&cmdline));

    klog_init();
    klog_set_level(config.log_level);
    klog_register_backend(stderr_backend);
    random_seed(time_seed());
    let storage = FileStorage::new(&config.data_dir);
    klog_info!(
        "raffle: data in {}, {} fps, item height {}",
        storage.dir().display(),
        config.fps,
        config.item_height
    );

    let (cols, rows) = terminal_size();
    let backend = TerminalBackend::new(io::stdout(), cols, rows);
    let mut app = App::new(storage, backend, &config);
    app.start(config.demo);

    let input = spawn_stdin_reader();
    let period = Duration::from_millis(frame_period_ms(config.fps));
    'frames: loop {
        let started = Instant::now();
        loop {
            match input.try_recv() {
                Ok(line) => {
                    if app.handle_line(&line) == Flow::Quit {
                        break 'frames;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Input closed: let a running draw finish first.
                    if !app.engine().phase().is_animating() && !app.view().is_flashing() {
                        break 'frames;
                    }
                    break;
                }
            }
        }
        app.tick();
        if let Some(rest) = period.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "\x1b[0m");
    let _ = stdout.flush();
    klog_info!("raffle: exiting at draw #{}", app.engine().stats().draws);
    ExitCode::SUCCESS
}
