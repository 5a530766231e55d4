//! Feedback cues (attack, hit, faint...) handed to an injected sink.
//!
//! The session owns its sink and tears it down explicitly through
//! [`CueSink::shutdown`]; there is no process-wide output device.
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Start,
    Attack,
    Hit,
    Faint,
    Win,
}

pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue);

    fn shutdown(&self) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play(&self, _cue: Cue) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingCues;

impl CueSink for TracingCues {
    fn play(&self, cue: Cue) {
        tracing::trace!(?cue, "cue");
    }
}

/// Rings the terminal bell on hits and faints. The output handle is opened
/// on first use and flushed on shutdown.
#[derive(Debug, Default)]
pub struct TerminalBell {
    out: Mutex<Option<Stdout>>,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }

    fn ring(&self, times: usize) {
        let Ok(mut guard) = self.out.lock() else {
            return;
        };
        let out = guard.get_or_insert_with(io::stdout);
        for _ in 0..times {
            let _ = out.write_all(b"\x07");
        }
        let _ = out.flush();
    }
}

impl CueSink for TerminalBell {
    fn play(&self, cue: Cue) {
        match cue {
            Cue::Hit => self.ring(1),
            Cue::Faint => self.ring(2),
            Cue::Start | Cue::Attack | Cue::Win => {}
        }
    }

    fn shutdown(&self) {
        if let Ok(mut guard) = self.out.lock() {
            if let Some(mut out) = guard.take() {
                let _ = out.flush();
            }
        }
    }
}
