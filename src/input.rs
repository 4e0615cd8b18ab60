//! Keyboard command surface, polled once per tick.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

/// The three commands the loop understands. Every other key is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `q`: terminate after the current tick.
    Quit,
    /// `+`: narrow the accepted color band by one step.
    SensitivityUp,
    /// `-`: widen the accepted color band by one step.
    SensitivityDown,
}

/// Map a key to its command, if any.
pub fn command_for_key(key: char) -> Option<Command> {
    match key {
        'q' => Some(Command::Quit),
        '+' => Some(Command::SensitivityUp),
        '-' => Some(Command::SensitivityDown),
        _ => None,
    }
}

/// Delivers at most one command per tick, waiting at most `timeout`.
pub trait InputSource {
    fn poll(&mut self, timeout: Duration) -> Option<Command>;
}

/// Headless runs: never delivers a command, but still honors the bounded
/// wait so tick pacing matches an interactive run.
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, timeout: Duration) -> Option<Command> {
        std::thread::sleep(timeout);
        None
    }
}

/// A pre-recorded command sequence, one entry consumed per tick.
/// Useful in tests and demos.
pub struct ScriptedInput {
    script: VecDeque<Option<Command>>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = Option<Command>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> Option<Command> {
        self.script.pop_front().flatten()
    }
}

/// Reads lines from stdin on a helper thread; the first character of each
/// line is interpreted as a key press. The loop thread polls the channel
/// with a bounded wait, so command handling stays synchronous with ticks.
pub struct StdinInput {
    receiver: mpsc::Receiver<Command>,
}

impl StdinInput {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let Some(command) = line.chars().next().and_then(command_for_key) else {
                    continue;
                };
                if sender.send(command).is_err() {
                    break;
                }
            }
        });
        Self { receiver }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    fn poll(&mut self, timeout: Duration) -> Option<Command> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
