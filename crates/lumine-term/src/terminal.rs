// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal control: raw mode, alternate screen, input polling, cleanup.
//
// The unsafe blocks are the POSIX calls with no safe std equivalent:
// tcgetattr/tcsetattr, ioctl(TIOCGWINSZ), isatty, poll and read on fd 0,
// and a raw write(2) from the panic hook. Each block is one call.
//
// If the editor panics while the screen is in raw mode the user is left
// with a terminal that does not echo. The panic hook writes a fixed restore
// sequence straight to fd 1 (the stdout lock may be held mid-frame) and
// puts the saved termios back before the default hook prints the message.

use std::io::{self, Write};
use std::sync::{Mutex, Once};
use std::time::Duration;

use crate::ansi;

// ─── Size ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the size cannot be queried (not a TTY, tests).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Current size of the terminal on stdout, via `TIOCGWINSZ`.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

#[cfg(unix)]
#[must_use]
pub fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn stdin_is_tty() -> bool {
    false
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Wait up to `timeout` for stdin to become readable, then read what is there.
///
/// Returns `Ok(None)` on timeout or signal interruption and `Ok(Some(vec![]))`
/// at end of input.
///
/// # Errors
///
/// Propagates `poll(2)` and `read(2)` failures other than `EINTR`.
#[cfg(unix)]
pub fn read_input(timeout: Duration) -> io::Result<Option<Vec<u8>>> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
    let ready = unsafe { libc::poll(&raw mut pfd, 1, millis) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(None);
    }

    let mut buf = [0u8; 4096];
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    #[allow(clippy::cast_sign_loss)]
    Ok(Some(buf[..n as usize].to_vec()))
}

#[cfg(not(unix))]
pub fn read_input(_timeout: Duration) -> io::Result<Option<Vec<u8>>> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "terminal input requires unix"))
}

// ─── Panic Restore ───────────────────────────────────────────────────────────

#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

static HOOK: Once = Once::new();

#[rustfmt::skip]
const RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?2004l\
    \x1b[0m\
    \x1b]112\x07\
    \x1b[0 q\
    \x1b[?25h\
    \x1b[?1049l";

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            unsafe {
                let _ = libc::write(libc::STDOUT_FILENO, RESTORE.as_ptr().cast(), RESTORE.len());
            }
            #[cfg(unix)]
            if let Ok(saved) = SAVED_TERMIOS.lock() {
                if let Some(t) = saved.as_ref() {
                    unsafe {
                        libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, t);
                    }
                }
            }
            previous(info);
        }));
    });
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Owns the terminal's TUI state and restores it on drop.
pub struct Terminal {
    #[cfg(unix)]
    saved: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Query the size; does not touch terminal modes yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            saved: None,
            size: query_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-read the size after SIGWINCH.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = query_size() {
            self.size = size;
        }
        self.size
    }

    /// Raw mode, alternate screen, hidden cursor, bracketed paste.
    ///
    /// # Errors
    ///
    /// Fails if termios or the initial writes fail.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw_mode_on()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_bracketed_paste(&mut out)?;
        out.flush()?;

        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Undo everything [`enter`](Self::enter) did.
    ///
    /// # Errors
    ///
    /// Fails if the restore writes or termios fail.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        ansi::end_sync(&mut out)?;
        ansi::disable_bracketed_paste(&mut out)?;
        ansi::reset(&mut out)?;
        ansi::reset_cursor_color(&mut out)?;
        ansi::set_cursor_shape(&mut out, ansi::CursorShape::Default)?;
        ansi::cursor_show(&mut out)?;
        ansi::exit_alt_screen(&mut out)?;
        out.flush()?;
        drop(out);

        self.raw_mode_off()?;
        self.active = false;
        tracing::debug!("terminal restored");
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        if !stdin_is_tty() {
            return Ok(());
        }
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut t) } != 0 {
            return Err(io::Error::last_os_error());
        }
        self.saved = Some(t);
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(t);
        }

        unsafe { libc::cfmakeraw(&raw mut t) };
        t.c_cc[libc::VMIN] = 1;
        t.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const t) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn raw_mode_on(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        let Some(t) = self.saved.take() else {
            return Ok(());
        };
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const t) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn raw_mode_off(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
