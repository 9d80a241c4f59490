// SPDX-License-Identifier: MIT
//
// Lumine IDE: a small syntax-coloring code editor for the terminal.
//
// This is the main binary that wires the crates together:
//
//   lumine-term   → terminal control, rendering, input decoding, event loop
//   lumine-theme  → the light and dark palettes
//   lumine-editor → buffer, cursor, history, highlighter, settings, locale, view
//
// The Editor struct implements lumine-term's App trait. Each keypress flows
// through:
//
//   stdin → decoder → on_event → overlay or text dispatch → buffer/cursor
//   buffer change → Highlighter over the whole text → fresh span set
//   paint → view::render_* → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────────────────┐
//   │ File  Edit  Settings  Help   Lumine IDE  │  ← menu bar
//   │ [ New ] [ Open ] [ Save ]                │  ← toolbar
//   │   1 text area + gutter                   │  ← h - 3 rows (View)
//   │ Line: 1, Column: 0 | Total Lines: 1      │  ← status line / prompt
//   └──────────────────────────────────────────┘
//
// Drop-down menus and message boxes are painted over the frame last.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use lumine_editor::buffer::{Buffer, BufferError};
use lumine_editor::cursor::Cursor;
use lumine_editor::highlight::{Highlighter, Span};
use lumine_editor::history::History;
use lumine_editor::locale::{Language, LocaleKey, LocaleMap, strings_for};
use lumine_editor::menu::{Menu, MenuCommand, MenuState, menu_bar};
use lumine_editor::position::{Position, Range};
use lumine_editor::prompt::{PathPrompt, PromptOutcome, PromptPurpose};
use lumine_editor::settings::{Settings, SettingsStore};
use lumine_editor::view::{self, Document, Layout, MessageBox, View};
use lumine_term::ansi::CursorShape;
use lumine_term::event_loop::{Action, App, CursorState, EventLoop};
use lumine_term::frame::FrameBuffer;
use lumine_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use lumine_term::terminal::Size;
use lumine_theme::{Theme, ThemeName};

const APP_NAME: &str = "Lumine IDE";

// ─── CLI ────────────────────────────────────────────────────────────────────

/// Lumine IDE command line.
///
/// Examples:
///   lumine                          # empty document
///   lumine app.py                   # open a file
///   lumine --settings ~/lumine.json # keep settings elsewhere
#[derive(Parser, Debug)]
#[command(name = "lumine", version, about = "A minimal syntax-coloring code editor")]
struct Cli {
    /// File to open at startup.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Settings file. Defaults to `settings.json` in the working directory.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

// ─── Overlays ───────────────────────────────────────────────────────────────

/// Whatever currently sits on top of the text area and takes the keys.
#[derive(Debug, Clone)]
enum Overlay {
    Menu(MenuState),
    Prompt(PathPrompt),
    Message(MessageBox),
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The application state. Nothing lives outside this struct.
struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    view: View,
    history: History,

    highlighter: Highlighter,
    /// Spans from the last highlight pass. Replaced wholesale, never patched.
    spans: Vec<Span>,
    /// Highlight passes run so far.
    highlight_passes: u64,

    settings: Settings,
    store: SettingsStore,
    theme: Theme,
    strings: &'static LocaleMap,

    menus: Vec<Menu>,
    overlay: Option<Overlay>,

    /// Screen position of the caret from the last paint.
    cursor_screen: Option<(u16, u16)>,
    /// Text rows from the last paint, for PageUp/PageDown.
    text_height: u16,
}

impl Editor {
    /// An empty document with settings read from `store`.
    fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        info!(theme = %settings.theme, language = %settings.language, "settings applied");
        let mut editor = Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            view: View::new(),
            history: History::new(),
            highlighter: Highlighter::new(),
            spans: Vec::new(),
            highlight_passes: 0,
            theme: Theme::for_name(settings.theme),
            strings: strings_for(settings.language),
            settings,
            store,
            menus: menu_bar(),
            overlay: None,
            cursor_screen: None,
            text_height: 20,
        };
        editor.rehighlight();
        editor
    }

    fn window_title(&self) -> String {
        let name = self
            .buffer
            .file_name()
            .unwrap_or_else(|| self.strings.get(LocaleKey::NewFile).to_string());
        format!("{APP_NAME} - {name}")
    }

    /// Full rescan. Called exactly once after every buffer change.
    fn rehighlight(&mut self) {
        self.spans = self.highlighter.highlight(&self.buffer.contents());
        self.highlight_passes += 1;
        debug!(pass = self.highlight_passes, spans = self.spans.len(), "highlighted");
    }

    fn show_info(&mut self, body: &str) {
        let title = self.strings.get(LocaleKey::Info);
        self.overlay = Some(Overlay::Message(MessageBox::info(title, body)));
    }

    fn show_error(&mut self, body: impl Into<String>) {
        let title = self.strings.get(LocaleKey::Error);
        self.overlay = Some(Overlay::Message(MessageBox::error(title, body)));
    }

    // ── Commands ────────────────────────────────────────────────────────

    fn run_command(&mut self, cmd: MenuCommand) -> Action {
        debug!(?cmd, "command");
        match cmd {
            MenuCommand::New => self.new_file(),
            MenuCommand::Open => {
                self.overlay = Some(Overlay::Prompt(PathPrompt::new(PromptPurpose::Open)));
            }
            MenuCommand::Save => self.save(),
            MenuCommand::SaveAs => self.prompt_save_as(),
            MenuCommand::Exit => {
                info!("exit requested");
                return Action::Quit;
            }
            MenuCommand::Undo => self.undo(),
            MenuCommand::Redo => self.redo(),
            MenuCommand::SetTheme(name) => self.set_theme(name),
            MenuCommand::SetLanguage(lang) => self.set_language(lang),
            MenuCommand::About => {
                let title = self.strings.get(LocaleKey::About);
                let body = self.strings.get(LocaleKey::AboutText);
                self.overlay = Some(Overlay::Message(MessageBox::info(title, body)));
            }
        }
        Action::Continue
    }

    /// Swap in `buffer` as the document, with fresh caret and history.
    fn load_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.cursor = Cursor::new();
        self.history.clear();
        self.view.reset();
        self.rehighlight();
    }

    fn new_file(&mut self) {
        self.load_buffer(Buffer::new());
        info!("new document");
    }

    /// Load `path`, leaving the current document alone when that fails.
    fn open_path(&mut self, path: &Path) {
        match Buffer::from_file(path) {
            Ok(buffer) => {
                info!(path = %path.display(), lines = buffer.line_count(), "opened file");
                self.load_buffer(buffer);
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "open failed");
                self.show_error(err.to_string());
            }
        }
    }

    fn save(&mut self) {
        if self.buffer.path().is_none() {
            self.prompt_save_as();
            return;
        }
        let result = self.buffer.save();
        self.finish_save(result);
    }

    fn prompt_save_as(&mut self) {
        let current = self
            .buffer
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.overlay = Some(Overlay::Prompt(PathPrompt::with_text(
            PromptPurpose::SaveAs,
            &current,
        )));
    }

    fn save_as(&mut self, path: &Path) {
        let result = self.buffer.save_as(path);
        self.finish_save(result);
    }

    fn finish_save(&mut self, result: Result<(), BufferError>) {
        match result {
            Ok(()) => {
                info!(path = ?self.buffer.path(), "saved file");
                self.history.seal();
                self.show_info(self.strings.get(LocaleKey::FileSaved));
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.show_error(err.to_string());
            }
        }
    }

    fn set_theme(&mut self, name: ThemeName) {
        self.settings.theme = name;
        self.theme = Theme::for_name(name);
        info!(theme = %name, "theme changed");
        self.persist_settings();
    }

    fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.strings = strings_for(language);
        info!(%language, "language changed");
        self.persist_settings();
    }

    /// Write the settings out. The in-memory change stands either way.
    fn persist_settings(&mut self) {
        if let Err(err) = self.store.save(&self.settings) {
            error!(path = %self.store.path().display(), %err, "failed to save settings");
            self.show_error(err.to_string());
        }
    }

    // ── Editing ─────────────────────────────────────────────────────────

    /// Run one edit and rehighlight if it changed the buffer.
    fn apply_edit(&mut self, edit: impl FnOnce(&mut Self) -> Result<bool, BufferError>) {
        match edit(self) {
            Ok(true) => self.rehighlight(),
            Ok(false) => {}
            Err(err) => {
                error!(%err, "edit failed");
                self.cursor.clamp(&self.buffer);
                self.rehighlight();
                self.show_error(err.to_string());
            }
        }
    }

    /// Put the caret at `pos` with no selection.
    fn place_cursor(&mut self, pos: Position) {
        self.cursor.clear_anchor();
        self.cursor.set_position(pos, &self.buffer);
    }

    /// Replace the selection, or insert at the caret, as one undo step.
    fn replace_selection(&mut self, text: &str) -> Result<bool, BufferError> {
        let before = self.cursor.position();
        let selection = self.cursor.selection();
        if selection.is_none() && text.is_empty() {
            return Ok(false);
        }
        self.history.begin(before);
        let mut at = before;
        if let Some(range) = selection {
            let removed = self.buffer.delete(range)?;
            self.history.record_delete(range.start, &removed);
            at = range.start;
        }
        let end = if text.is_empty() {
            at
        } else {
            let end = self.buffer.insert(at, text)?;
            self.history.record_insert(at, text);
            end
        };
        self.place_cursor(end);
        self.history.commit(end);
        Ok(true)
    }

    /// A printable key. Consecutive keystrokes undo together.
    fn type_char(&mut self, ch: char) -> Result<bool, BufferError> {
        let mut utf8 = [0u8; 4];
        let text = ch.encode_utf8(&mut utf8);
        if self.cursor.selection().is_some() {
            return self.replace_selection(text);
        }
        let before = self.cursor.position();
        let end = self.buffer.insert(before, text)?;
        self.history.record_typed(before, text, before, end);
        self.place_cursor(end);
        Ok(true)
    }

    fn delete_range(&mut self, range: Range) -> Result<bool, BufferError> {
        self.history.begin(self.cursor.position());
        let removed = self.buffer.delete(range)?;
        self.history.record_delete(range.start, &removed);
        self.place_cursor(range.start);
        self.history.commit(range.start);
        Ok(true)
    }

    fn backspace(&mut self) -> Result<bool, BufferError> {
        if self.cursor.selection().is_some() {
            return self.replace_selection("");
        }
        let pos = self.cursor.position();
        let prev = if pos.col > 0 {
            Position::new(pos.line, pos.col - 1)
        } else if pos.line > 0 {
            let line = pos.line - 1;
            Position::new(line, self.buffer.line_content_len(line).unwrap_or(0))
        } else {
            return Ok(false);
        };
        self.delete_range(Range::ordered(prev, pos))
    }

    fn delete_forward(&mut self) -> Result<bool, BufferError> {
        if self.cursor.selection().is_some() {
            return self.replace_selection("");
        }
        let pos = self.cursor.position();
        let line_len = self.buffer.line_content_len(pos.line).unwrap_or(0);
        let next = if pos.col < line_len {
            Position::new(pos.line, pos.col + 1)
        } else if pos.line + 1 < self.buffer.line_count() {
            Position::new(pos.line + 1, 0)
        } else {
            return Ok(false);
        };
        self.delete_range(Range::ordered(pos, next))
    }

    fn undo(&mut self) {
        self.apply_edit(|ed| {
            let Some(pos) = ed.history.undo(&mut ed.buffer)? else {
                return Ok(false);
            };
            ed.place_cursor(pos);
            Ok(true)
        });
    }

    fn redo(&mut self) {
        self.apply_edit(|ed| {
            let Some(pos) = ed.history.redo(&mut ed.buffer)? else {
                return Ok(false);
            };
            ed.place_cursor(pos);
            Ok(true)
        });
    }

    fn paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.apply_edit(|ed| ed.replace_selection(&text));
    }

    // ── Keys ────────────────────────────────────────────────────────────

    /// Caret motions, extending the selection with Shift. Returns false for
    /// keys that are not motions.
    fn move_cursor(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let page = usize::from(self.text_height.max(1));
        let buf = &self.buffer;
        let motion: fn(&mut Cursor, &Buffer, usize) = match key.code {
            KeyCode::Left => |c, b, _| c.move_left(b),
            KeyCode::Right => |c, b, _| c.move_right(b),
            KeyCode::Up | KeyCode::PageUp => |c, b, n| c.move_up(n, b),
            KeyCode::Down | KeyCode::PageDown => |c, b, n| c.move_down(n, b),
            KeyCode::Home if ctrl => |c, _, _| c.move_to_start(),
            KeyCode::End if ctrl => |c, b, _| c.move_to_end(b),
            KeyCode::Home => |c, _, _| c.move_to_line_start(),
            KeyCode::End => |c, b, _| c.move_to_line_end(b),
            _ => return false,
        };
        let count = if matches!(key.code, KeyCode::PageUp | KeyCode::PageDown) {
            page
        } else {
            1
        };
        self.history.seal();
        self.cursor.prepare_motion(key.shift());
        motion(&mut self.cursor, buf, count);
        true
    }

    fn handle_text_key(&mut self, key: &KeyEvent) -> Action {
        if let Some(cmd) = shortcut_command(key) {
            return self.run_command(cmd);
        }
        if key.code == KeyCode::F(10) {
            self.overlay = Some(Overlay::Menu(MenuState::open(&self.menus, 0)));
            return Action::Continue;
        }
        if key.modifiers.contains(Modifiers::ALT) {
            if let KeyCode::Char(ch) = key.code {
                if let Some(state) = MenuState::for_hotkey(&self.menus, ch) {
                    self.overlay = Some(Overlay::Menu(state));
                }
            }
            return Action::Continue;
        }
        if self.move_cursor(key) {
            return Action::Continue;
        }
        match key.code {
            KeyCode::Enter => self.apply_edit(|ed| ed.replace_selection("\n")),
            KeyCode::Tab if !key.shift() => self.apply_edit(|ed| ed.type_char('\t')),
            KeyCode::Backspace => self.apply_edit(Self::backspace),
            KeyCode::Delete => self.apply_edit(Self::delete_forward),
            KeyCode::Escape => self.cursor.clear_anchor(),
            KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::CTRL) => {
                self.apply_edit(|ed| ed.type_char(ch));
            }
            _ => {}
        }
        Action::Continue
    }

    fn handle_menu_key(&mut self, mut state: MenuState, key: &KeyEvent) -> Action {
        match key.code {
            KeyCode::Left => state.prev_menu(&self.menus),
            KeyCode::Right => state.next_menu(&self.menus),
            KeyCode::Up => state.prev_entry(&self.menus),
            KeyCode::Down => state.next_entry(&self.menus),
            KeyCode::Enter => {
                let Some(item) = state.selected(&self.menus).copied() else {
                    return Action::Continue;
                };
                return self.run_command(item.command);
            }
            KeyCode::Escape | KeyCode::F(10) => return Action::Continue,
            KeyCode::Char(ch) if key.modifiers.contains(Modifiers::ALT) => {
                if let Some(other) = MenuState::for_hotkey(&self.menus, ch) {
                    state = other;
                }
            }
            _ => {
                if let Some(cmd) = shortcut_command(key) {
                    return self.run_command(cmd);
                }
            }
        }
        self.overlay = Some(Overlay::Menu(state));
        Action::Continue
    }

    fn handle_prompt_key(&mut self, mut prompt: PathPrompt, key: &KeyEvent) {
        match prompt.handle_key(key) {
            PromptOutcome::Pending => self.overlay = Some(Overlay::Prompt(prompt)),
            PromptOutcome::Cancel => debug!(purpose = ?prompt.purpose(), "prompt cancelled"),
            PromptOutcome::Submit(path) => match prompt.purpose() {
                PromptPurpose::Open => self.open_path(&path),
                PromptPurpose::SaveAs => self.save_as(&path),
            },
        }
    }

    fn handle_message_key(&mut self, msg: MessageBox, key: &KeyEvent) {
        if !matches!(key.code, KeyCode::Enter | KeyCode::Escape | KeyCode::Char(' ')) {
            self.overlay = Some(Overlay::Message(msg));
        }
    }
}

/// The global keyboard shortcuts.
fn shortcut_command(key: &KeyEvent) -> Option<MenuCommand> {
    if key.modifiers != Modifiers::CTRL {
        return None;
    }
    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    match ch.to_ascii_lowercase() {
        'n' => Some(MenuCommand::New),
        'o' => Some(MenuCommand::Open),
        's' => Some(MenuCommand::Save),
        'z' => Some(MenuCommand::Undo),
        'y' => Some(MenuCommand::Redo),
        'q' => Some(MenuCommand::Exit),
        _ => None,
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        match (self.overlay.take(), event) {
            (None, Event::Key(key)) => self.handle_text_key(key),
            (None, Event::Paste(text)) => {
                self.paste(text);
                Action::Continue
            }
            (Some(Overlay::Menu(state)), Event::Key(key)) => self.handle_menu_key(state, key),
            (Some(Overlay::Prompt(prompt)), Event::Key(key)) => {
                self.handle_prompt_key(prompt, key);
                Action::Continue
            }
            (Some(Overlay::Prompt(mut prompt)), Event::Paste(text)) => {
                prompt.insert_str(text);
                self.overlay = Some(Overlay::Prompt(prompt));
                Action::Continue
            }
            (Some(Overlay::Message(msg)), Event::Key(key)) => {
                self.handle_message_key(msg, key);
                Action::Continue
            }
            (overlay, Event::Paste(_)) => {
                self.overlay = overlay;
                Action::Continue
            }
        }
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "resized");
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let layout = Layout::new(frame.width(), frame.height());
        if frame.height() < 4 {
            // No room for the chrome; just the text.
            let doc = Document {
                buf: &self.buffer,
                cursor: &self.cursor,
                spans: &self.spans,
                theme: &self.theme,
            };
            self.cursor_screen = self.view.render(frame, &doc, 0, 0, layout.width, frame.height());
            return;
        }

        self.text_height = layout.text_height;
        let doc = Document {
            buf: &self.buffer,
            cursor: &self.cursor,
            spans: &self.spans,
            theme: &self.theme,
        };
        self.cursor_screen = self.view.render(
            frame,
            &doc,
            0,
            layout.text_y,
            layout.width,
            layout.text_height,
        );

        let status = view::status_text(&self.cursor, &self.buffer, self.strings);
        view::render_status_line(frame, layout.status_y, &status, &self.theme);
        view::render_toolbar(frame, layout.toolbar_y, self.strings, &self.theme);

        let open_menu = match &self.overlay {
            Some(Overlay::Menu(state)) => Some(*state),
            _ => None,
        };
        view::render_menu_bar(
            frame,
            layout.menu_y,
            &self.menus,
            open_menu,
            self.strings,
            &self.theme,
            &self.window_title(),
        );

        match &self.overlay {
            Some(Overlay::Menu(state)) => {
                view::render_drop_down(
                    frame,
                    layout.menu_y + 1,
                    &self.menus,
                    *state,
                    self.strings,
                    &self.theme,
                    (self.settings.theme, self.settings.language),
                );
                self.cursor_screen = None;
            }
            Some(Overlay::Prompt(prompt)) => {
                self.cursor_screen = Some(view::render_prompt(
                    frame,
                    layout.status_y,
                    prompt,
                    self.strings,
                    &self.theme,
                ));
            }
            Some(Overlay::Message(msg)) => {
                view::render_message_box(frame, msg, self.strings, &self.theme);
                self.cursor_screen = None;
            }
            None => {}
        }
    }

    fn cursor(&self) -> Option<CursorState> {
        let (x, y) = self.cursor_screen?;
        Some(CursorState {
            x,
            y,
            shape: CursorShape::SteadyBar,
            color: self.theme.cursor,
        })
    }

    fn title(&self) -> Option<String> {
        Some(self.window_title())
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

/// File logging under the cache directory. Returns the guard that flushes
/// the writer on drop, or `None` when logging could not be set up.
fn init_logging() -> Option<WorkerGuard> {
    let dir = dirs::cache_dir().map_or_else(|| PathBuf::from("."), |d| d.join("lumine"));
    std::fs::create_dir_all(&dir).ok()?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("lumine.log")
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("LUMINE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "lumine starting");

    let store = cli
        .settings
        .map_or_else(SettingsStore::default, SettingsStore::new);
    let mut editor = Editor::new(store);
    if let Some(path) = &cli.file {
        editor.open_path(path);
    }

    EventLoop::new()
        .run(&mut editor)
        .context("terminal session failed")?;
    info!("lumine exiting");
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn press(ch: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(ch)))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn shift(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, Modifiers::SHIFT))
    }

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::ctrl(ch))
    }

    fn alt(ch: char) -> Event {
        Event::Key(KeyEvent::alt(ch))
    }

    /// Type every char of `s` as a plain key press.
    fn feed(e: &mut Editor, s: &str) {
        for ch in s.chars() {
            let event = match ch {
                '\n' => key(KeyCode::Enter),
                _ => press(ch),
            };
            assert_eq!(e.on_event(&event), Action::Continue);
        }
    }

    /// An editor whose settings live in a fresh temp dir.
    fn editor() -> (Editor, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let e = Editor::new(SettingsStore::new(dir.path().join("settings.json")));
        (e, dir)
    }

    fn editor_with(text: &str) -> (Editor, TempDir) {
        let (mut e, dir) = editor();
        e.load_buffer(Buffer::from_text(text));
        (e, dir)
    }

    fn status(e: &Editor) -> String {
        view::status_text(&e.cursor, &e.buffer, e.strings)
    }

    fn message(e: &Editor) -> Option<&MessageBox> {
        match &e.overlay {
            Some(Overlay::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    fn prompt(e: &Editor) -> Option<&PathPrompt> {
        match &e.overlay {
            Some(Overlay::Prompt(p)) => Some(p),
            _ => None,
        }
    }

    fn row_text(frame: &FrameBuffer, y: u16) -> String {
        frame
            .row(y)
            .unwrap()
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch.unwrap_or(' '))
            .collect()
    }

    // ── Startup ───────────────────────────────────────────────────────────

    #[test]
    fn starts_empty_with_defaults() {
        let (e, dir) = editor();
        assert_eq!(e.buffer.contents(), "");
        assert_eq!(e.settings, Settings::default());
        assert_eq!(e.theme, Theme::for_name(ThemeName::Dark));
        assert_eq!(e.window_title(), "Lumine IDE - New File");
        assert_eq!(status(&e), "Line: 1, Column: 0 | Total Lines: 1");
        // Loading defaults writes nothing.
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn starts_with_stored_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme": "light", "language": "tr"}"#).unwrap();
        let e = Editor::new(SettingsStore::new(&path));
        assert_eq!(e.theme, Theme::for_name(ThemeName::Light));
        assert_eq!(e.window_title(), "Lumine IDE - Yeni Dosya");
    }

    // ── Typing ────────────────────────────────────────────────────────────

    #[test]
    fn typing_inserts_and_updates_status() {
        let (mut e, _dir) = editor();
        feed(&mut e, "def f(x):\n    return x");
        assert_eq!(e.buffer.contents(), "def f(x):\n    return x");
        assert_eq!(status(&e), "Line: 2, Column: 12 | Total Lines: 2");
    }

    #[test]
    fn every_change_runs_exactly_one_pass() {
        let (mut e, _dir) = editor();
        let start = e.highlight_passes;
        feed(&mut e, "ab");
        assert_eq!(e.highlight_passes, start + 2);
        e.on_event(&key(KeyCode::Left));
        assert_eq!(e.highlight_passes, start + 2);
        e.on_event(&key(KeyCode::Backspace));
        assert_eq!(e.highlight_passes, start + 3);
        e.on_event(&ctrl('z'));
        assert_eq!(e.highlight_passes, start + 4);
    }

    #[test]
    fn spans_follow_the_buffer() {
        let (mut e, _dir) = editor();
        feed(&mut e, "def");
        assert_eq!(e.spans, e.highlighter.highlight("def"));
        assert_eq!(e.spans.len(), 1);
        e.on_event(&key(KeyCode::Backspace));
        assert!(e.spans.is_empty());
    }

    #[test]
    fn enter_splits_the_line() {
        let (mut e, _dir) = editor_with("abcd");
        e.on_event(&key(KeyCode::Right));
        e.on_event(&key(KeyCode::Right));
        e.on_event(&key(KeyCode::Enter));
        assert_eq!(e.buffer.contents(), "ab\ncd");
        assert_eq!(e.cursor.position(), Position::new(1, 0));
    }

    #[test]
    fn tab_inserts_a_tab() {
        let (mut e, _dir) = editor();
        e.on_event(&key(KeyCode::Tab));
        assert_eq!(e.buffer.contents(), "\t");
    }

    #[test]
    fn backspace_joins_lines() {
        let (mut e, _dir) = editor_with("ab\ncd");
        e.on_event(&key(KeyCode::Down));
        e.on_event(&key(KeyCode::Home));
        e.on_event(&key(KeyCode::Backspace));
        assert_eq!(e.buffer.contents(), "abcd");
        assert_eq!(e.cursor.position(), Position::new(0, 2));
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let (mut e, _dir) = editor_with("x");
        let passes = e.highlight_passes;
        e.on_event(&key(KeyCode::Backspace));
        assert_eq!(e.buffer.contents(), "x");
        assert_eq!(e.highlight_passes, passes);
    }

    #[test]
    fn delete_joins_with_next_line() {
        let (mut e, _dir) = editor_with("ab\ncd");
        e.on_event(&key(KeyCode::End));
        e.on_event(&key(KeyCode::Delete));
        assert_eq!(e.buffer.contents(), "abcd");
        e.on_event(&Event::Key(KeyEvent::new(KeyCode::End, Modifiers::CTRL)));
        e.on_event(&key(KeyCode::Delete));
        assert_eq!(e.buffer.contents(), "abcd");
    }

    // ── Selection ─────────────────────────────────────────────────────────

    #[test]
    fn typing_replaces_the_selection() {
        let (mut e, _dir) = editor_with("hello world");
        for _ in 0..5 {
            e.on_event(&shift(KeyCode::Right));
        }
        feed(&mut e, "bye");
        assert_eq!(e.buffer.contents(), "bye world");
        assert_eq!(e.cursor.selection(), None);
    }

    #[test]
    fn backspace_deletes_the_selection() {
        let (mut e, _dir) = editor_with("one\ntwo\nthree");
        e.on_event(&key(KeyCode::Down));
        e.on_event(&shift(KeyCode::Down));
        e.on_event(&key(KeyCode::Backspace));
        assert_eq!(e.buffer.contents(), "one\nthree");
    }

    #[test]
    fn plain_motion_drops_the_selection() {
        let (mut e, _dir) = editor_with("abc");
        e.on_event(&shift(KeyCode::End));
        assert!(e.cursor.selection().is_some());
        e.on_event(&key(KeyCode::Left));
        assert_eq!(e.cursor.selection(), None);
    }

    #[test]
    fn escape_clears_the_selection() {
        let (mut e, _dir) = editor_with("abc");
        e.on_event(&shift(KeyCode::Right));
        e.on_event(&key(KeyCode::Escape));
        assert_eq!(e.cursor.selection(), None);
    }

    // ── Undo / redo ───────────────────────────────────────────────────────

    #[test]
    fn undo_reverts_a_typing_run() {
        let (mut e, _dir) = editor();
        feed(&mut e, "abc");
        e.on_event(&key(KeyCode::Left));
        feed(&mut e, "X");
        assert_eq!(e.buffer.contents(), "abXc");

        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "abc");
        assert_eq!(e.cursor.position(), Position::new(0, 2));

        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "");

        e.on_event(&ctrl('y'));
        assert_eq!(e.buffer.contents(), "abc");
        assert_eq!(e.cursor.position(), Position::new(0, 3));
    }

    #[test]
    fn undo_with_nothing_to_undo() {
        let (mut e, _dir) = editor_with("x");
        let passes = e.highlight_passes;
        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "x");
        assert_eq!(e.highlight_passes, passes);
    }

    #[test]
    fn new_edit_discards_redo() {
        let (mut e, _dir) = editor();
        feed(&mut e, "a");
        e.on_event(&ctrl('z'));
        feed(&mut e, "b");
        e.on_event(&key(KeyCode::Left));
        e.on_event(&ctrl('y'));
        assert_eq!(e.buffer.contents(), "b");
    }

    #[test]
    fn paste_is_one_undo_step() {
        let (mut e, _dir) = editor();
        e.on_event(&Event::Paste("x = 1\r\ny = 2".to_string()));
        assert_eq!(e.buffer.contents(), "x = 1\ny = 2");
        assert_eq!(e.cursor.position(), Position::new(1, 5));
        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "");
    }

    #[test]
    fn form_feed_paste_stays_on_one_line_and_undoes() {
        let (mut e, _dir) = editor();
        e.on_event(&Event::Paste("a\x0cb".to_string()));
        assert_eq!(e.cursor.position(), Position::new(0, 3));
        assert_eq!(status(&e), "Line: 1, Column: 3 | Total Lines: 1");
        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "");
        assert!(message(&e).is_none());
    }

    // ── Files ─────────────────────────────────────────────────────────────

    #[test]
    fn new_clears_document_and_history() {
        let (mut e, _dir) = editor();
        feed(&mut e, "abc");
        e.on_event(&ctrl('n'));
        assert_eq!(e.buffer.contents(), "");
        assert_eq!(e.buffer.path(), None);
        assert_eq!(e.window_title(), "Lumine IDE - New File");
        e.on_event(&ctrl('z'));
        assert_eq!(e.buffer.contents(), "");
    }

    #[test]
    fn open_through_the_prompt() {
        let (mut e, dir) = editor();
        let path = dir.path().join("app.py");
        fs::write(&path, "@dec\ndef main():\n    pass\n").unwrap();

        e.on_event(&ctrl('o'));
        assert_eq!(prompt(&e).map(PathPrompt::purpose), Some(PromptPurpose::Open));
        let passes = e.highlight_passes;
        feed(&mut e, &path.display().to_string());
        e.on_event(&key(KeyCode::Enter));

        assert!(e.overlay.is_none());
        assert_eq!(e.buffer.contents(), "@dec\ndef main():\n    pass\n");
        assert_eq!(e.window_title(), "Lumine IDE - app.py");
        assert_eq!(e.highlight_passes, passes + 1);
        assert_eq!(e.spans, e.highlighter.highlight(&e.buffer.contents()));
        assert_eq!(status(&e), "Line: 1, Column: 0 | Total Lines: 4");
    }

    #[test]
    fn open_failure_keeps_the_document() {
        let (mut e, dir) = editor_with("keep me");
        e.open_path(&dir.path().join("missing.py"));
        assert_eq!(e.buffer.contents(), "keep me");
        let msg = message(&e).unwrap();
        assert_eq!(msg.kind, view::MessageKind::Error);
        assert_eq!(msg.title, "Error");
    }

    #[test]
    fn escape_cancels_the_prompt_silently() {
        let (mut e, _dir) = editor_with("x");
        e.on_event(&ctrl('o'));
        feed(&mut e, "nothing.py");
        e.on_event(&key(KeyCode::Escape));
        assert!(e.overlay.is_none());
        assert_eq!(e.buffer.contents(), "x");
    }

    #[test]
    fn empty_prompt_cancels() {
        let (mut e, _dir) = editor();
        e.on_event(&ctrl('o'));
        e.on_event(&key(KeyCode::Enter));
        assert!(e.overlay.is_none());
    }

    #[test]
    fn save_writes_identical_bytes() {
        let (mut e, dir) = editor();
        let path = dir.path().join("crlf.py");
        fs::write(&path, "a = 1\r\nb = 2\r\n").unwrap();
        e.open_path(&path);
        e.on_event(&ctrl('s'));
        assert_eq!(fs::read(&path).unwrap(), b"a = 1\r\nb = 2\r\n");

        let msg = message(&e).unwrap();
        assert_eq!(msg.kind, view::MessageKind::Info);
        assert_eq!(msg.title, "Info");
        assert_eq!(msg.body, "File saved.");

        e.on_event(&key(KeyCode::Enter));
        assert!(e.overlay.is_none());
    }

    #[test]
    fn message_box_swallows_other_keys() {
        let (mut e, _dir) = editor();
        e.run_command(MenuCommand::About);
        feed(&mut e, "x");
        assert_eq!(e.buffer.contents(), "");
        assert!(message(&e).is_some());
    }

    #[test]
    fn save_without_path_asks_for_one() {
        let (mut e, dir) = editor();
        feed(&mut e, "print(1)");
        e.on_event(&ctrl('s'));
        assert_eq!(prompt(&e).map(PathPrompt::purpose), Some(PromptPurpose::SaveAs));

        let path = dir.path().join("out.py");
        feed(&mut e, &path.display().to_string());
        e.on_event(&key(KeyCode::Enter));
        assert_eq!(fs::read_to_string(&path).unwrap(), "print(1)");
        assert_eq!(e.window_title(), "Lumine IDE - out.py");
        assert_eq!(message(&e).map(|m| m.body.as_str()), Some("File saved."));
    }

    #[test]
    fn save_as_prefills_the_current_path() {
        let (mut e, dir) = editor();
        let path = dir.path().join("a.py");
        fs::write(&path, "").unwrap();
        e.open_path(&path);
        e.run_command(MenuCommand::SaveAs);
        assert_eq!(prompt(&e).map(PathPrompt::input), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn save_failure_keeps_the_path() {
        let (mut e, dir) = editor();
        let good = dir.path().join("good.py");
        fs::write(&good, "x").unwrap();
        e.open_path(&good);
        e.save_as(&dir.path().join("no_such_dir").join("bad.py"));
        assert_eq!(message(&e).map(|m| m.kind), Some(view::MessageKind::Error));
        assert_eq!(e.buffer.path(), Some(good.as_path()));
    }

    // ── Settings ──────────────────────────────────────────────────────────

    #[test]
    fn theme_switch_through_the_menu_persists() {
        let (mut e, dir) = editor();
        e.on_event(&alt('s'));
        // Light Theme is highlighted first.
        e.on_event(&key(KeyCode::Enter));
        assert!(e.overlay.is_none());
        assert_eq!(e.theme, Theme::for_name(ThemeName::Light));
        assert_eq!(e.settings.theme, ThemeName::Light);

        let fresh = SettingsStore::new(dir.path().join("settings.json")).load();
        assert_eq!(fresh.theme, ThemeName::Light);
        assert_eq!(fresh.language, Language::En);
    }

    #[test]
    fn language_switch_relabels_and_persists() {
        let (mut e, dir) = editor();
        e.on_event(&alt('s'));
        for _ in 0..3 {
            e.on_event(&key(KeyCode::Down));
        }
        e.on_event(&key(KeyCode::Enter));
        assert_eq!(e.strings.language(), Language::Tr);
        assert_eq!(status(&e), "Satır: 1, Sütun: 0 | Toplam Satır: 1");
        assert_eq!(e.window_title(), "Lumine IDE - Yeni Dosya");

        let fresh = SettingsStore::new(dir.path().join("settings.json")).load();
        assert_eq!(fresh.language, Language::Tr);
    }

    #[test]
    fn settings_save_failure_keeps_the_change() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("missing").join("settings.json"));
        let mut e = Editor::new(store);
        e.run_command(MenuCommand::SetTheme(ThemeName::Light));
        assert_eq!(e.settings.theme, ThemeName::Light);
        assert_eq!(e.theme, Theme::for_name(ThemeName::Light));
        assert_eq!(message(&e).map(|m| m.kind), Some(view::MessageKind::Error));
    }

    // ── Menus ─────────────────────────────────────────────────────────────

    #[test]
    fn f10_opens_and_escape_closes() {
        let (mut e, _dir) = editor();
        e.on_event(&key(KeyCode::F(10)));
        assert!(matches!(e.overlay, Some(Overlay::Menu(MenuState { menu: 0, .. }))));
        e.on_event(&key(KeyCode::Escape));
        assert!(e.overlay.is_none());
    }

    #[test]
    fn menu_keys_do_not_edit() {
        let (mut e, _dir) = editor();
        e.on_event(&alt('e'));
        feed(&mut e, "x");
        assert_eq!(e.buffer.contents(), "");
        assert!(e.overlay.is_some());
    }

    #[test]
    fn menu_exit_quits() {
        let (mut e, _dir) = editor();
        e.on_event(&alt('f'));
        e.on_event(&key(KeyCode::Up));
        assert_eq!(e.on_event(&key(KeyCode::Enter)), Action::Quit);
    }

    #[test]
    fn about_box() {
        let (mut e, _dir) = editor();
        e.on_event(&alt('h'));
        e.on_event(&key(KeyCode::Enter));
        let msg = message(&e).unwrap();
        assert_eq!(msg.title, "About");
        assert!(msg.body.starts_with("Lumine IDE"));
    }

    #[test]
    fn ctrl_q_quits() {
        let (mut e, _dir) = editor();
        feed(&mut e, "unsaved");
        assert_eq!(e.on_event(&ctrl('q')), Action::Quit);
    }

    #[test]
    fn shortcuts_map_to_commands() {
        assert_eq!(shortcut_command(&KeyEvent::ctrl('s')), Some(MenuCommand::Save));
        assert_eq!(shortcut_command(&KeyEvent::ctrl('y')), Some(MenuCommand::Redo));
        assert_eq!(shortcut_command(&KeyEvent::ctrl('x')), None);
        assert_eq!(shortcut_command(&KeyEvent::plain(KeyCode::Char('s'))), None);
    }

    // ── Paint ─────────────────────────────────────────────────────────────

    #[test]
    fn paints_chrome_and_status() {
        let (mut e, _dir) = editor_with("x = 1");
        let mut frame = FrameBuffer::new(60, 8);
        e.paint(&mut frame);
        assert!(row_text(&frame, 0).contains("Lumine IDE - New File"));
        assert!(row_text(&frame, 1).contains("[ Open ]"));
        assert!(row_text(&frame, 2).starts_with("   1 x = 1"));
        assert_eq!(row_text(&frame, 7).trim_end(), " Line: 1, Column: 0 | Total Lines: 1");
        let cursor = e.cursor().unwrap();
        assert_eq!((cursor.x, cursor.y), (5, 2));
        assert_eq!(cursor.color, e.theme.cursor);
    }

    #[test]
    fn prompt_takes_the_cursor() {
        let (mut e, _dir) = editor();
        e.on_event(&ctrl('o'));
        let mut frame = FrameBuffer::new(60, 8);
        e.paint(&mut frame);
        assert!(row_text(&frame, 7).starts_with(" Open file:"));
        assert_eq!(e.cursor().map(|c| c.y), Some(7));
    }

    #[test]
    fn open_menu_hides_the_cursor() {
        let (mut e, _dir) = editor();
        e.on_event(&alt('f'));
        let mut frame = FrameBuffer::new(60, 10);
        e.paint(&mut frame);
        assert!(e.cursor().is_none());
        assert!(row_text(&frame, 1).contains("Ctrl+N"));
    }

    #[test]
    fn tiny_frame_does_not_panic() {
        let (mut e, _dir) = editor_with("abc");
        let mut frame = FrameBuffer::new(3, 2);
        e.paint(&mut frame);
    }
}
