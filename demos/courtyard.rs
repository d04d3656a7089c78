//! Terminal courtyard demo using crossterm.
//!
//! Run: cargo run --bin courtyard
//! Logs go to stderr; set `RUST_LOG=debug` and redirect stderr to a file to
//! watch routing decisions.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use gridnav_core::Point;
use gridnav_demos::{Courtyard, GATE};

const SEED: u64 = 0x6a7d;
const MAX_TICKS: u32 = 5000;
const FRAME: Duration = Duration::from_millis(60);

fn glyph_color(ch: char) -> Color {
    match ch {
        '@' => Color::Yellow,
        '#' => Color::DarkGrey,
        '-' | '|' => Color::Blue,
        'a'..='z' => Color::Red,
        _ => Color::Grey,
    }
}

/// Raw-mode alternate screen, restored on drop.
struct Screen {
    out: Stdout,
}

impl Screen {
    fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Self { out })
    }

    fn draw(&mut self, yard: &Courtyard) -> io::Result<()> {
        let world = yard.world();
        let bounds = world.terrain().bounds();
        let route = yard.player_route();

        for y in 0..bounds.height() {
            execute!(self.out, cursor::MoveTo(0, y as u16))?;
            for x in 0..bounds.width() {
                let p = Point::new(x, y);
                let mut ch = world.glyph_at(p).unwrap_or(' ');
                let mut color = glyph_color(ch);
                if ch == '.' && p == GATE {
                    ch = '>';
                    color = Color::Green;
                } else if ch == '.' && route.contains(&p) {
                    ch = '*';
                    color = Color::Cyan;
                }
                execute!(self.out, SetForegroundColor(color))?;
                write!(self.out, "{ch}")?;
            }
        }

        execute!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, bounds.height() as u16 + 1),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        write!(self.out, "{}   q: quit", yard.status())?;
        self.out.flush()
    }

    /// Drain pending input; `true` if the user asked to quit.
    fn quit_requested(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut yard = Courtyard::new(SEED)?;
    let arrived = {
        let mut screen = Screen::open()?;
        let mut arrived = false;
        for _ in 0..MAX_TICKS {
            screen.draw(&yard)?;
            if screen.quit_requested()? {
                break;
            }
            if yard.update()? {
                screen.draw(&yard)?;
                arrived = true;
                break;
            }
            thread::sleep(FRAME);
        }
        arrived
    };

    if arrived {
        println!("reached the gate: {}", yard.status());
    } else {
        println!("stopped: {}", yard.status());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
