use crossterm::{cursor, event, execute, terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

mod audio;
mod game;
mod input;
mod render;
mod storage;

use audio::Audio;
use game::Game;
use input::Action;
use render::PixelBuf;

fn main() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);

    let score_path = storage::default_path();
    let mut game = Game::new(storage::load(&score_path));
    let audio = Audio::new();

    let frame_dur = Duration::from_millis(16); // ~60 fps
    let mut was_over = false;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                event::Event::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                }
                ev => match input::map_event(&ev) {
                    Some(Action::Quit) => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    Some(Action::Primary) => {
                        if game.game_over {
                            game.reset();
                        } else if game.try_jump() {
                            if let Some(audio) = &audio {
                                audio.jump();
                            }
                        }
                    }
                    None => {}
                },
            }
        }

        game.tick();

        // Alive -> game-over edge: persist a new record once, play the
        // crash. A failed write only costs the stored score.
        if game.game_over && !was_over {
            if let Some(best) = game.take_new_record() {
                let _ = storage::save(&score_path, best);
            }
            if let Some(audio) = &audio {
                audio.crash();
            }
        }
        was_over = game.game_over;

        render::draw(&game, &mut buf);
        buf.render(&mut out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
