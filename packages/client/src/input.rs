//! Keyboard input.
//!
//! Terminal events are read on a dedicated blocking thread and translated
//! into key actions for the app loop. Terminals that report key releases get
//! true press/hold/release keying; the rest fall back to toggling the key on
//! each Space press.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use ratatui::crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use tokio::sync::mpsc;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How Space maps onto the key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Press holds the key down until release
    PressRelease,
    /// Each press flips the key state
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Quit,
}

/// Stateful translation from terminal events to key actions.
#[derive(Debug, Clone)]
pub struct KeyTranslator {
    mode: KeyMode,
    held: bool,
}

impl KeyTranslator {
    pub fn new(mode: KeyMode) -> Self {
        Self { mode, held: false }
    }

    pub fn translate(&mut self, event: &Event) -> Option<KeyAction> {
        match event {
            Event::Key(key) => {
                if key.code == KeyCode::Char(' ') {
                    return self.space(key.kind);
                }
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                let quit = key.code == KeyCode::Esc
                    || key.code == KeyCode::Char('q')
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                quit.then_some(KeyAction::Quit)
            }
            // a key held while the terminal loses focus would never see its release
            Event::FocusLost => self.release(),
            _ => None,
        }
    }

    fn space(&mut self, kind: KeyEventKind) -> Option<KeyAction> {
        match (self.mode, kind) {
            (KeyMode::PressRelease, KeyEventKind::Press) if !self.held => {
                self.held = true;
                Some(KeyAction::Press)
            }
            (KeyMode::PressRelease, KeyEventKind::Release) => self.release(),
            (KeyMode::Toggle, KeyEventKind::Press) if self.held => self.release(),
            (KeyMode::Toggle, KeyEventKind::Press) => {
                self.held = true;
                Some(KeyAction::Press)
            }
            _ => None,
        }
    }

    fn release(&mut self) -> Option<KeyAction> {
        if !self.held {
            return None;
        }
        self.held = false;
        Some(KeyAction::Release)
    }
}

/// Ask the terminal for release events and focus changes.
///
/// Returns the key mode the terminal can support.
pub fn enable_key_reporting() -> KeyMode {
    let mut stdout = io::stdout();

    if let Err(e) = execute!(stdout, EnableFocusChange) {
        tracing::warn!("Failed to enable focus reporting: {}", e);
    }

    match supports_keyboard_enhancement() {
        Ok(true) => match execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        ) {
            Ok(()) => {
                tracing::info!("Terminal reports key releases, Space is held to key");
                KeyMode::PressRelease
            }
            Err(e) => {
                tracing::warn!("Failed to enable key release reporting: {}", e);
                KeyMode::Toggle
            }
        },
        Ok(false) => {
            tracing::info!("Terminal cannot report key releases, Space toggles the key");
            KeyMode::Toggle
        }
        Err(e) => {
            tracing::warn!("Failed to query keyboard enhancement support: {}", e);
            KeyMode::Toggle
        }
    }
}

/// Undo [`enable_key_reporting`].
pub fn disable_key_reporting(mode: KeyMode) {
    let mut stdout = io::stdout();
    if mode == KeyMode::PressRelease {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, DisableFocusChange);
}

/// Spawns the event reading loop in a separate thread.
///
/// The thread stops when `running` is cleared or the receiver is dropped.
pub fn spawn_input_thread(
    mode: KeyMode,
    tx: mpsc::UnboundedSender<KeyAction>,
    running: Arc<AtomicBool>,
) -> JoinHandle<io::Result<()>> {
    std::thread::spawn(move || {
        let mut translator = KeyTranslator::new(mode);

        while running.load(Ordering::SeqCst) {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let event = event::read()?;
            if let Some(action) = translator.translate(&event)
                && tx.send(action).is_err()
            {
                break;
            }
        }
        tracing::debug!("input loop finished");

        Ok(())
    })
}
