use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::{app::App, ui};

pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => app.insert_text(&s),
                Event::Resize(_, _) => app.dirty = true,
                Event::Mouse(me) => match me.kind {
                    MouseEventKind::ScrollUp => app.scroll_up(3),
                    MouseEventKind::ScrollDown => app.scroll_down(3),
                    _ => {}
                },
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
