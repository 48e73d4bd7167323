use anyhow::{Context, Result};
use crossterm::event::{KeyEvent, KeyEventKind};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Blocking terminal event source with a fixed tick.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait up to one tick for input
    pub fn next(&self) -> Result<Event> {
        if crossterm::event::poll(self.tick_rate).context("Failed to poll terminal events")? {
            let evt = crossterm::event::read().context("Failed to read terminal event")?;
            if let crossterm::event::Event::Key(key) = evt {
                // Filter for Press only (Windows compatibility)
                if key.kind == KeyEventKind::Press {
                    return Ok(Event::Key(key));
                }
            }
        }
        Ok(Event::Tick)
    }
}
