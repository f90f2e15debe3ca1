use crate::state::Event;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyEventKind},
};
use log::*;
use std::{
    thread,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Specify terminal event poll rate in milliseconds.
///
pub const TICK_RATE_IN_MS: u64 = 100;

/// Spawn the input polling thread. It forwards key presses and emits a tick
/// every `TICK_RATE_IN_MS`, and stops once the receiver is gone.
///
pub fn spawn(tx: mpsc::Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(raw) => {
                        if let Some(event) = translate(raw) {
                            if tx.blocking_send(event).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            if last_tick.elapsed() >= tick_rate {
                if tx.blocking_send(Event::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
        debug!("Terminal event thread stopped");
    })
}

/// Keep key presses only. Resizes need no event since every loop iteration
/// redraws at the current size.
///
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::empty(),
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn translate_keeps_key_presses() {
        assert!(matches!(
            translate(key(KeyEventKind::Press)),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('j'),
                ..
            }))
        ));
    }

    #[test]
    fn translate_drops_releases_and_resizes() {
        assert!(translate(key(KeyEventKind::Release)).is_none());
        assert!(translate(CrosstermEvent::Resize(80, 24)).is_none());
    }
}
