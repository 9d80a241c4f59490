// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// Everything runs on one thread: wait for stdin with `poll(2)`, decode the
// bytes, hand each event to the application, and repaint when something
// changed. There is no reader thread and no timer.
//
// # Escape timeout
//
// A lone ESC might be the Escape key or the first byte of a sequence. The
// decoder holds it; if the next poll times out with it still pending, the
// loop flushes it as the Escape key. The poll timeout therefore bounds the
// Escape latency.
//
// # SIGWINCH
//
// The signal handler only sets an atomic flag. The loop checks the flag after
// every wakeup (poll returns early with EINTR when the signal lands), resizes
// the frame, and forces a full redraw.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::color::CellColor;
use crate::frame::FrameBuffer;
use crate::input::{Decoder, Event};
use crate::render::DiffRenderer;
use crate::terminal::{self, Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Where and how to draw the hardware cursor after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub x: u16,
    pub y: u16,
    pub shape: CursorShape,
    /// `CellColor::Default` leaves the terminal's own color.
    pub color: CellColor,
}

/// What the loop drives.
pub trait App {
    /// Handle one decoded event. Return [`Action::Quit`] to stop the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The frame has already been resized when this is called.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint into a cleared frame.
    fn paint(&mut self, frame: &mut FrameBuffer);

    /// Hardware cursor after [`paint`](App::paint); `None` hides it.
    fn cursor(&self) -> Option<CursorState> {
        None
    }

    /// Window title. Sent only when it changes.
    fn title(&self) -> Option<String> {
        None
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for input before flushing a pending ESC.
    pub escape_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout: Duration::from_millis(25),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

pub struct EventLoop {
    terminal: Terminal,
    decoder: Decoder,
    renderer: DiffRenderer,
    config: LoopConfig,
    last_title: Option<String>,
    last_cursor_color: Option<CellColor>,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            decoder: Decoder::new(),
            renderer: DiffRenderer::new(),
            config,
            last_title: None,
            last_cursor_color: None,
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Take over the terminal and run `app` until it quits or stdin closes.
    /// The terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Terminal setup, input and output failures.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();
        let result = self.pump(app);
        self.terminal.leave()?;
        result
    }

    fn pump(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;

        loop {
            if dirty {
                self.present(app, &mut frame)?;
                dirty = false;
            }

            // Block indefinitely unless an ESC is waiting to be resolved.
            let timeout = if self.decoder.has_pending() {
                self.config.escape_timeout
            } else {
                Duration::from_secs(3600)
            };

            let events = match terminal::read_input(timeout)? {
                Some(bytes) if bytes.is_empty() => {
                    tracing::info!("stdin closed");
                    return Ok(());
                }
                Some(bytes) => self.decoder.feed(&bytes),
                None if self.decoder.has_pending() => self.decoder.flush(),
                None => Vec::new(),
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
                dirty = true;
            }

            if RESIZED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
                dirty = true;
            }
        }
    }

    fn present(&mut self, app: &mut impl App, frame: &mut FrameBuffer) -> io::Result<()> {
        frame.clear();
        app.paint(frame);
        self.renderer.render(frame)?;

        let mut out = io::stdout().lock();
        self.renderer.flush_to(&mut out)?;

        let title = app.title();
        if title != self.last_title {
            if let Some(t) = &title {
                ansi::set_title(&mut out, t)?;
            }
            self.last_title = title;
        }

        match app.cursor() {
            Some(c) => {
                if self.last_cursor_color != Some(c.color) {
                    ansi::set_cursor_color(&mut out, c.color)?;
                    self.last_cursor_color = Some(c.color);
                }
                ansi::cursor_to(&mut out, c.x, c.y)?;
                ansi::set_cursor_shape(&mut out, c.shape)?;
                ansi::cursor_show(&mut out)?;
            }
            None => ansi::cursor_hide(&mut out)?,
        }
        out.flush()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl App for Blank {
        fn paint(&mut self, _frame: &mut FrameBuffer) {}
    }

    #[test]
    fn app_defaults() {
        let mut app = Blank;
        assert_eq!(app.on_event(&Event::Paste(String::new())), Action::Continue);
        assert!(app.cursor().is_none());
        assert!(app.title().is_none());
        app.on_resize(Size { cols: 10, rows: 5 });
    }

    #[test]
    fn default_escape_timeout_is_short() {
        assert!(LoopConfig::default().escape_timeout <= Duration::from_millis(50));
    }

    #[test]
    fn new_loop_reports_size() {
        let l = EventLoop::new();
        assert!(l.size().cols > 0 && l.size().rows > 0);
    }

    #[test]
    fn resize_flag_swaps_once() {
        RESIZED.store(true, Ordering::Relaxed);
        assert!(RESIZED.swap(false, Ordering::Relaxed));
        assert!(!RESIZED.swap(false, Ordering::Relaxed));
    }
}
