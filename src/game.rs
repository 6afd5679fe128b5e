use rand::{Rng, SeedableRng, rngs::StdRng};

// Logical playfield. The renderer scales this to the terminal; the
// simulation never sees pixel coordinates.
pub const WIDTH: f64 = 400.0;
pub const HEIGHT: f64 = 700.0;

pub const BASE_SPEED: f64 = 2.0;
pub const MAX_SPEED: f64 = 8.0;
const SPEED_INCREMENT: f64 = 0.002;
const GRAVITY: f64 = 1.0;
const JUMP_IMPULSE: f64 = -20.0;
const MAX_JUMPS: u8 = 2;
const MAX_OBSTACLES: usize = 3;
const SCORE_FACTOR: f64 = 0.1;

const SKY_SCROLL: f64 = 0.2;
const GROUND_SCROLL: f64 = 1.0;

/// Deterministic RNG handle so tests can replay exact spawn sequences.
pub struct GameRng(StdRng);

impl GameRng {
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Open-interval overlap on both axes. Boxes that merely touch do not
/// collide.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[derive(Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vy: f64,
    pub jumps: u8,
}

impl Player {
    fn spawn() -> Self {
        Player {
            x: 50.0,
            y: HEIGHT - 80.0,
            w: 28.0,
            h: 40.0,
            vy: 0.0,
            jumps: 0,
        }
    }

    fn ground_line(&self) -> f64 {
        HEIGHT - self.h
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObstacleKind {
    Small,
    Tall,
    Double,
    Moving,
}

#[derive(Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub vy: f64,
    pub kind: ObstacleKind,
}

impl Obstacle {
    fn grounded(x: f64, w: f64, h: f64, kind: ObstacleKind) -> Self {
        Obstacle {
            x,
            y: HEIGHT - h,
            w,
            h,
            vy: 0.0,
            kind,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

pub struct Game {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub speed: f64,
    pub score: f64,
    pub best: u32,
    pub game_over: bool,
    pub sky_x: f64,
    pub ground_x: f64,
    record_pending: bool,
    rng: GameRng,
}

impl Game {
    pub fn new(best: u32) -> Self {
        Self::with_rng(best, GameRng::new())
    }

    pub fn with_rng(best: u32, rng: GameRng) -> Self {
        Game {
            player: Player::spawn(),
            obstacles: Vec::new(),
            speed: BASE_SPEED,
            score: 0.0,
            best,
            game_over: false,
            sky_x: 0.0,
            ground_x: 0.0,
            record_pending: false,
            rng,
        }
    }

    /// Advances the simulation by exactly one frame. Quiescent once the
    /// game-over flag is set; `reset` resumes.
    pub fn tick(&mut self) {
        if self.game_over {
            return;
        }

        self.speed = (self.speed + SPEED_INCREMENT).min(MAX_SPEED);

        self.player.vy += GRAVITY;
        self.player.y += self.player.vy;
        let ground = self.player.ground_line();
        if self.player.y >= ground {
            self.player.y = ground;
            self.player.vy = 0.0;
            self.player.jumps = 0;
        }

        for ob in &mut self.obstacles {
            ob.x -= self.speed;
            if ob.kind == ObstacleKind::Moving {
                ob.y += ob.vy;
                // Bounce between ground-100 and ground-height. The flip
                // is directional so the block cannot latch onto a bound.
                let falling_out = ob.vy > 0.0 && ob.y >= HEIGHT - ob.h;
                let rising_out = ob.vy < 0.0 && ob.y <= HEIGHT - 100.0;
                if falling_out || rising_out {
                    ob.vy = -ob.vy;
                }
            }
        }
        self.obstacles.retain(|ob| ob.x + ob.w > 0.0);

        let threshold = {
            let (lo, hi) = self.spacing_bounds();
            self.rng.0.gen_range(lo..=hi)
        };
        self.maybe_spawn(threshold);

        for ob in &self.obstacles {
            if overlaps(&self.player.aabb(), &ob.aabb()) {
                self.enter_game_over();
                return;
            }
        }

        self.score += self.speed * SCORE_FACTOR;

        self.sky_x -= SKY_SCROLL;
        self.ground_x -= GROUND_SCROLL;
        if self.sky_x <= -WIDTH {
            self.sky_x = 0.0;
        }
        if self.ground_x <= -WIDTH {
            self.ground_x = 0.0;
        }
    }

    /// Required spacing range, shrinking with score to raise difficulty.
    fn spacing_bounds(&self) -> (f64, f64) {
        let min = (200.0 - self.score * 0.2).max(100.0);
        let max = (350.0 - self.score * 0.3).max(200.0);
        (min, max)
    }

    /// Spawns at the right edge when the gap behind the newest obstacle
    /// has opened past `threshold` and fewer than the cap are live.
    pub fn maybe_spawn(&mut self, threshold: f64) {
        let last_edge = self.obstacles.last().map_or(0.0, |ob| ob.x + ob.w);
        let gap = WIDTH - last_edge;
        if gap >= threshold && self.obstacles.len() < MAX_OBSTACLES {
            self.spawn_obstacle();
        }
    }

    fn spawn_obstacle(&mut self) {
        match choose_kind(self.score, &mut self.rng) {
            ObstacleKind::Small => {
                self.obstacles
                    .push(Obstacle::grounded(WIDTH, 30.0, 30.0, ObstacleKind::Small));
            }
            ObstacleKind::Tall => {
                self.obstacles
                    .push(Obstacle::grounded(WIDTH, 24.0, 60.0, ObstacleKind::Tall));
            }
            ObstacleKind::Double => {
                let (w, h, gap) = (20.0, 30.0, 50.0);
                self.obstacles
                    .push(Obstacle::grounded(WIDTH, w, h, ObstacleKind::Double));
                self.obstacles
                    .push(Obstacle::grounded(WIDTH + w + gap, w, h, ObstacleKind::Double));
            }
            ObstacleKind::Moving => {
                let h = 40.0;
                self.obstacles.push(Obstacle {
                    x: WIDTH,
                    y: HEIGHT - h,
                    w: 28.0,
                    h,
                    vy: 1.2,
                    kind: ObstacleKind::Moving,
                });
            }
        }
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        let final_score = self.score as u32;
        if final_score > self.best {
            self.best = final_score;
            self.record_pending = true;
        }
    }

    /// Jump attempt. Fires only while alive and below the double-jump
    /// cap; surplus requests are dropped, never queued. Reports whether
    /// it fired so the host can gate the jump sound.
    pub fn try_jump(&mut self) -> bool {
        if self.game_over || self.player.jumps >= MAX_JUMPS {
            return false;
        }
        self.player.vy = JUMP_IMPULSE;
        self.player.jumps += 1;
        true
    }

    /// Hands out a freshly set high score exactly once per game over.
    pub fn take_new_record(&mut self) -> Option<u32> {
        if self.record_pending {
            self.record_pending = false;
            Some(self.best)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        // Unlike the initial drop-in spawn, a restart puts the player
        // straight onto the ground line.
        let mut player = Player::spawn();
        player.y = player.ground_line();
        self.player = player;
        self.obstacles.clear();
        self.speed = BASE_SPEED;
        self.score = 0.0;
        self.sky_x = 0.0;
        self.ground_x = 0.0;
        self.game_over = false;
        self.record_pending = false;
    }
}

fn choose_kind(score: f64, rng: &mut GameRng) -> ObstacleKind {
    use ObstacleKind::*;
    let tier = (score / 100.0) as u32;
    if tier < 3 {
        Small
    } else if tier < 6 {
        [Small, Tall][rng.0.gen_range(0..2)]
    } else {
        [Small, Tall, Double, Moving][rng.0.gen_range(0..4)]
    }
}
