use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use crate::pool::loader::normalize_label;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Tap(String),
    /// Enter on an empty line: submit, continue or retry.
    Primary,
    Retry,
    Continue,
    Clear,
    Visibility { hidden: bool },
    Help,
    Quit,
}

/// Map one input line to an event. A bare word that is not a command is a tile tap.
/// Tap tokens are normalized the same way as pool labels.
pub fn parse_command(line: &str) -> AppEvent {
    let line = line.trim();
    if let Some(token) = line.strip_prefix("tap ") {
        return AppEvent::Tap(normalize_label(token));
    }
    match line {
        "" | "check" => AppEvent::Primary,
        "retry" => AppEvent::Retry,
        "next" | "continue" => AppEvent::Continue,
        "clear" => AppEvent::Clear,
        "hide" => AppEvent::Visibility { hidden: true },
        "show" => AppEvent::Visibility { hidden: false },
        "help" | "?" => AppEvent::Help,
        "quit" | "exit" => AppEvent::Quit,
        token => AppEvent::Tap(normalize_label(token)),
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    /// Reads stdin on a background thread; end of input becomes `Quit`.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(parse_command(&line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::Quit);
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
