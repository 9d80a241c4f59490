// SPDX-License-Identifier: MIT
//
// lumine-term — terminal backend for Lumine IDE.
//
// Raw termios, hand-written ANSI and a differential renderer, with no TUI
// framework in between. The editor paints into a `FrameBuffer`; the event
// loop diffs it against the previous frame and writes only what changed.

pub mod ansi;
pub mod cell;
pub mod color;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod render;
pub mod terminal;
