use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::game::{self, Game, Obstacle};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(56, 189, 248);
const SKY_BOT: Rgb = Rgb(125, 211, 252);
const CLOUD: Rgb = Rgb(186, 230, 253);
const GROUND: Rgb = Rgb(22, 101, 52);
const GROUND_LIGHT: Rgb = Rgb(34, 128, 66);
const PLAYER_TOP: Rgb = Rgb(14, 165, 233);
const PLAYER_BOT: Rgb = Rgb(2, 132, 199);
const OBSTACLE_TOP: Rgb = Rgb(30, 41, 59);
const OBSTACLE_BOT: Rgb = Rgb(15, 23, 42);
const PANEL: Rgb = Rgb(220, 195, 120);
const PANEL_EDGE: Rgb = Rgb(185, 160, 90);
const GOLD: Rgb = Rgb(245, 200, 66);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Vertically shaded box with the corner pixels clipped off. The
    /// rounding is purely cosmetic.
    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, top: Rgb, bot: Rgb) {
        let r = (w.min(h) / 4).min(2);
        for dy in 0..h {
            let t = if h > 1 { (dy * 256 / (h - 1)) as u16 } else { 0 };
            let c = Rgb::lerp(top, bot, t);
            for dx in 0..w {
                let cx = (r - dx).max(dx - (w - 1 - r)).max(0);
                let cy = (r - dy).max(dy - (h - 1 - r)).max(0);
                if cx + cy > r {
                    continue;
                }
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap glyphs ────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1],
        'G' => [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1],
        'O' => [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'P' => [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0],
        'R' => [1,1,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        _ => return None,
    })
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb, shadow: bool) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                if shadow {
                    buf.set(px + 1, py + 1, SHADOW);
                }
                buf.set(px, py, fg);
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let total_w = s.len() as i32 * 4 - 1; // 3px per digit + 1px spacing
    let start_x = cx - total_w / 2;
    for (i, ch) in s.chars().enumerate() {
        let d = (ch as u8 - b'0') as usize;
        draw_glyph(buf, start_x + i as i32 * 4, y, &DIGITS[d], fg, true);
    }
}

fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let total_w = text.len() as i32 * 4 - 1;
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(glyph) = letter(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, &glyph, fg, true);
        }
    }
}

// ── Scene ────────────────────────────────────────────────────────────────────

/// Maps the fixed logical playfield onto whatever pixel grid the
/// terminal currently provides. Rebuilt each frame; resizes never touch
/// the simulation.
struct View {
    sx: f64,
    sy: f64,
}

impl View {
    fn new(buf: &PixelBuf) -> Self {
        View {
            sx: buf.w as f64 / game::WIDTH,
            sy: buf.h as f64 / game::HEIGHT,
        }
    }

    fn x(&self, v: f64) -> i32 {
        (v * self.sx) as i32
    }

    fn y(&self, v: f64) -> i32 {
        (v * self.sy) as i32
    }
}

/// Draws one frame of `game` into `buf`. Reads the simulation, never
/// writes it.
pub fn draw(game: &Game, buf: &mut PixelBuf) {
    let view = View::new(buf);

    draw_sky(game, buf, &view);
    draw_ground(game, buf, &view);
    draw_player(game, buf, &view);
    for ob in &game.obstacles {
        draw_obstacle(ob, buf, &view);
    }

    if game.game_over {
        draw_game_over(game, buf);
    }
}

fn draw_sky(game: &Game, buf: &mut PixelBuf, view: &View) {
    let h = buf.h;
    for y in 0..h {
        let t = (y as u32 * 256 / h.max(1) as u32) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.w {
            buf.set(x as i32, y as i32, c);
        }
    }
    // Cloud band over the upper half, two copies so the wrap is seamless.
    let band_h = view.y(game::HEIGHT / 2.0);
    let w = buf.w as i32;
    for offset in [view.x(game.sky_x), view.x(game.sky_x + game::WIDTH)] {
        for y in 0..band_h {
            for x in 0..w / 2 {
                buf.set(offset + x, y, CLOUD);
            }
        }
    }
}

fn draw_ground(game: &Game, buf: &mut PixelBuf, view: &View) {
    let top = view.y(game::HEIGHT - 60.0);
    let scroll = view.x(game.ground_x);
    for y in top..buf.h as i32 {
        for x in 0..buf.w as i32 {
            let stripe = ((x - scroll) / 6 + (y - top) / 3) % 2 == 0;
            buf.set(x, y, if stripe { GROUND } else { GROUND_LIGHT });
        }
    }
}

fn draw_player(game: &Game, buf: &mut PixelBuf, view: &View) {
    let p = &game.player;
    buf.fill_round_rect(
        view.x(p.x),
        view.y(p.y),
        view.x(p.w).max(2),
        view.y(p.h).max(2),
        PLAYER_TOP,
        PLAYER_BOT,
    );
}

fn draw_obstacle(ob: &Obstacle, buf: &mut PixelBuf, view: &View) {
    buf.fill_round_rect(
        view.x(ob.x),
        view.y(ob.y),
        view.x(ob.w).max(2),
        view.y(ob.h).max(2),
        OBSTACLE_TOP,
        OBSTACLE_BOT,
    );
}

fn draw_game_over(game: &Game, buf: &mut PixelBuf) {
    for y in 0..buf.h {
        for x in 0..buf.w {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }

    let cx = buf.w as i32 / 2;
    let cy = buf.h as i32 / 2;
    let panel_w = 64.max(buf.w as i32 / 3);
    let panel_h = 40;
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL_EDGE);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

    draw_text(buf, cx, py + 3, "GAME OVER", WHITE);
    draw_text(buf, cx - 12, py + 12, "SCORE", SHADOW);
    draw_number(buf, cx + 12, py + 12, game.score as u32, WHITE);
    draw_text(buf, cx - 12, py + 20, "BEST", SHADOW);
    draw_number(buf, cx + 12, py + 20, game.best, GOLD);
    draw_text(buf, cx, py + 31, "TAP TO RESTART", WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, GameRng};

    fn white_pixels(buf: &PixelBuf) -> usize {
        let mut count = 0;
        for y in 0..buf.h {
            for x in 0..buf.w {
                if buf.get(x, y) == WHITE {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn live_frame_has_no_score_text() {
        let mut game = Game::with_rng(0, GameRng::seeded(7));
        for _ in 0..10 {
            game.tick();
        }
        assert!(!game.game_over);
        let mut buf = PixelBuf::new(120, 120);
        draw(&game, &mut buf);
        // Nothing in the live scene palette is pure white; score and
        // overlay text only appear once the game is over.
        assert_eq!(white_pixels(&buf), 0);
    }

    #[test]
    fn game_over_frame_shows_overlay_text() {
        let mut game = Game::with_rng(0, GameRng::seeded(7));
        game.tick();
        let overlapping = game.player.aabb();
        game.obstacles.push(Obstacle {
            x: overlapping.x,
            y: overlapping.y,
            w: 30.0,
            h: 30.0,
            vy: 0.0,
            kind: crate::game::ObstacleKind::Small,
        });
        game.tick();
        assert!(game.game_over);
        let mut buf = PixelBuf::new(120, 120);
        draw(&game, &mut buf);
        assert!(white_pixels(&buf) > 0);
    }
}
