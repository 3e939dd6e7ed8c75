use std::io::{Stdout, Write, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, poll, read};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::board::Cell;
use crate::error::Result;
use crate::snake::Direction;
use crate::TermInt;

/// Longest we block on the terminal before looking at the interrupt flag again.
const INTERRUPT_CHECK: Duration = Duration::from_millis(20);

/// What the player did while we waited for the next tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Interrupt,
    Timeout,
}

/// Raised by SIGINT/SIGTERM. The handler only stores `true`; the game loop
/// picks it up and runs the normal shutdown.
#[derive(Clone, Debug, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn install() -> Result<Self> {
        let flag = InterruptFlag::default();
        for signal in [SIGINT, SIGTERM].iter() {
            signal_hook::flag::register(*signal, Arc::clone(&flag.0))?;
        }
        Ok(flag)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    active: bool,
    interrupt: InterruptFlag,
}

struct Message {
    top_left: Cell,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(width: TermInt, height: TermInt, interrupt: InterruptFlag) -> Self {
        let screen = vec![' '; width as usize * height as usize];
        TermManager {
            width, height, stdout: stdout(), screen, current_msg: None, active: false, interrupt
        }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    /// Hands the terminal back in the state we found it. Safe to call twice.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Waits for any key. Returns `true` if it was Ctrl+C or we were signalled.
    pub fn wait_for_key(&self) -> Result<bool> {
        loop {
            if self.interrupt.is_raised() {
                return Ok(true);
            }

            if self.poll_key(INTERRUPT_CHECK)? {
                if let Event::Key(ev) = read()? {
                    return Ok(is_ctrl_c(&ev));
                }
            }
        }
    }

    /// Blocks until a direction key or Ctrl+C arrives, a signal is raised, or
    /// `deadline` passes.
    pub fn read_input(&self, deadline: Instant) -> Result<Input> {
        loop {
            if self.interrupt.is_raised() {
                return Ok(Input::Interrupt);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Input::Timeout);
            }

            if self.poll_key((deadline - now).min(INTERRUPT_CHECK))? {
                if let Event::Key(ev) = read()? {
                    if let Some(input) = key_to_input(&ev) {
                        return Ok(input);
                    }
                }
            }
        }
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let end_row = height - 1;
        let end_col = width - 1;

        for col in 0..width {
            let ch = if col == 0 || col == end_col {'+'} else {'-'};
            self.draw_cell(Cell::new(0, col), ch)?;
            self.draw_cell(Cell::new(end_row, col), ch)?;
        }

        for row in 1..end_row {
            self.draw_cell(Cell::new(row, 0), '|')?;
            self.draw_cell(Cell::new(row, end_col), '|')?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        self.show_styled_message(lines, None)
    }

    /// A bold, coloured message, used for the end of game banners.
    pub fn show_banner(&mut self, lines: &[&str], color: Color) -> Result<()> {
        self.show_styled_message(lines, Some(color))
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message was covering
        for row_diff in 0..msg.height {
            for col_diff in 0..msg.width {
                let cell = Cell::new(msg.top_left.row + row_diff, msg.top_left.col + col_diff);
                let ch = self.screen[self.index(cell)];
                self.print_no_save(cell, ch)?;
            }
        }

        self.flush()
    }

    pub fn draw_cell(&mut self, cell: Cell, ch: char) -> Result<()> {
        if cell.row >= self.height || cell.col >= self.width {
            return Ok(());
        }

        self.print_no_save(cell, ch)?;
        let i = self.index(cell);
        self.screen[i] = ch;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn show_styled_message(&mut self, lines: &[&str], color: Option<Color>) -> Result<()> {
        self.hide_message()?;

        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let msg_height = (lines.len() as TermInt + 2).min(self.height);
        let msg_width = (longest as TermInt + 2).min(self.width);
        let top_left = Cell::new(
            (self.height / 2).saturating_sub(msg_height / 2),
            (self.width / 2).saturating_sub(msg_width / 2),
        );

        if let Some(color) = color {
            queue!(self.stdout, style::SetForegroundColor(color), style::SetAttribute(Attribute::Bold))?;
        }

        // Blank frame around the text
        for row in [top_left.row, top_left.row + msg_height - 1].iter() {
            for col_diff in 0..msg_width {
                self.print_no_save(Cell::new(*row, top_left.col + col_diff), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate().take(msg_height as usize - 2) {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let row = top_left.row + i as TermInt + 1;
            for (col_diff, ch) in padded_line.chars().take(msg_width as usize).enumerate() {
                self.print_no_save(Cell::new(row, top_left.col + col_diff as TermInt), ch)?;
            }
        }

        if color.is_some() {
            queue!(self.stdout, style::SetAttribute(Attribute::Reset), style::ResetColor)?;
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    fn poll_key(&self, timeout: Duration) -> Result<bool> {
        match poll(timeout) {
            Ok(ready) => Ok(ready),
            // A signal landing mid-poll may surface as an interrupted read
            Err(_) if self.interrupt.is_raised() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn print_no_save(&mut self, cell: Cell, ch: char) -> Result<()> {
        // Messages go through here so the screen buffer can restore what they cover
        queue!(self.stdout, cursor::MoveTo(cell.col, cell.row), style::Print(ch))?;
        Ok(())
    }

    fn index(&self, cell: Cell) -> usize {
        self.width as usize * cell.row as usize + cell.col as usize
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

fn key_to_input(ev: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(ev) {
        return Some(Input::Interrupt);
    }

    let dir = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Direction::Up,
        KeyCode::Char('a') | KeyCode::Left => Direction::Left,
        KeyCode::Char('s') | KeyCode::Down => Direction::Down,
        KeyCode::Char('d') | KeyCode::Right => Direction::Right,
        _ => return None,
    };

    Some(Input::Direction(dir))
}
