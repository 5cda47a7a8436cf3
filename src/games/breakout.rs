use std::time::Duration;

use ratatui::style::Color;

use crate::games::{
    contact_offset, status_banner, toggle_pause, Aabb, Body, Game, GameKind, RoundStatus,
};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::Scene;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const PADDLE_WIDTH: f32 = 100.0;
const PADDLE_HEIGHT: f32 = 15.0;
const PADDLE_Y: f32 = HEIGHT - PADDLE_HEIGHT - 10.0;
const PADDLE_NUDGE: f32 = 25.0;
const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 3.0;
const SPIN: f32 = 6.0;
const BRICK_WIDTH: f32 = 75.0;
const BRICK_HEIGHT: f32 = 20.0;
const BRICK_ROWS: usize = 8;
const BRICK_COLS: usize = 10;
const BRICK_POINTS: u32 = 10;
const LIVES: u32 = 3;

const ROW_COLORS: [Color; 8] = [
    Color::Rgb(239, 68, 68),   // Red
    Color::Rgb(249, 115, 22),  // Orange
    Color::Rgb(234, 179, 8),   // Yellow
    Color::Rgb(34, 197, 94),   // Green
    Color::Rgb(59, 130, 246),  // Blue
    Color::Rgb(139, 92, 246),  // Violet
    Color::Rgb(236, 72, 153),  // Pink
    Color::Rgb(244, 63, 94),   // Rose
];

#[derive(Clone)]
struct Brick {
    x: f32,
    y: f32,
    hit: bool,
    color: Color,
}

impl Brick {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, BRICK_WIDTH, BRICK_HEIGHT)
    }
}

fn serve() -> Body {
    Body::new(WIDTH / 2.0, HEIGHT - 50.0, BALL_SPEED, -BALL_SPEED, BALL_RADIUS)
}

fn build_bricks() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            bricks.push(Brick {
                x: col as f32 * (BRICK_WIDTH + 5.0) + 35.0,
                y: row as f32 * (BRICK_HEIGHT + 5.0) + 50.0,
                hit: false,
                color: ROW_COLORS[row % ROW_COLORS.len()],
            });
        }
    }
    bricks
}

pub struct Breakout {
    ball: Body,
    paddle_x: f32,
    bricks: Vec<Brick>,
    score: u32,
    high_score: u32,
    lives: u32,
    status: RoundStatus,
    notices: Vec<Notice>,
}

impl Breakout {
    pub fn new(high_score: u32) -> Self {
        Self {
            ball: serve(),
            paddle_x: WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            bricks: build_bricks(),
            score: 0,
            high_score,
            lives: LIVES,
            status: RoundStatus::NotStarted,
            notices: Vec::new(),
        }
    }

    fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| !b.hit).count()
    }

    fn set_paddle(&mut self, x: f32) {
        self.paddle_x = x.clamp(0.0, WIDTH - PADDLE_WIDTH);
    }

    fn end_round(&mut self, status: RoundStatus) {
        self.status = status;
        if status == RoundStatus::Won {
            self.notices.push(Notice::success("🎉 You Won! 🎉"));
        } else {
            self.notices.push(Notice::error("Game Over!"));
        }
        if self.score > self.high_score {
            self.high_score = self.score;
            self.notices.push(Notice::success("New high score!"));
        }
    }

    fn step(&mut self) {
        let ball = &mut self.ball;
        ball.step();

        if ball.x <= BALL_RADIUS {
            ball.vx = ball.vx.abs();
        } else if ball.x >= WIDTH - BALL_RADIUS {
            ball.vx = -ball.vx.abs();
        }
        if ball.y <= BALL_RADIUS {
            ball.vy = ball.vy.abs();
        }

        // Paddle
        if ball.vy > 0.0
            && ball.y + BALL_RADIUS >= PADDLE_Y
            && ball.y - BALL_RADIUS <= PADDLE_Y + PADDLE_HEIGHT
            && ball.x >= self.paddle_x
            && ball.x <= self.paddle_x + PADDLE_WIDTH
        {
            ball.vy = -ball.vy;
            ball.vx = contact_offset(ball.x, self.paddle_x, PADDLE_WIDTH) * SPIN;
        }

        if ball.y > HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.end_round(RoundStatus::Over);
            } else {
                self.notices.push(Notice::warning(format!("{} lives remaining!", self.lives)));
                self.ball = serve();
            }
            return;
        }

        // One brick per frame
        let ball_box = self.ball.bounds();
        let hit = self
            .bricks
            .iter_mut()
            .find(|b| !b.hit && b.bounds().overlaps(&ball_box));
        if let Some(brick) = hit {
            brick.hit = true;
            self.ball.vy = -self.ball.vy;
            self.score += BRICK_POINTS;
            self.notices.push(Notice::success(format!("+{} points!", BRICK_POINTS)));
            if self.bricks_left() == 0 {
                self.end_round(RoundStatus::Won);
            }
        }
    }
}

impl Game for Breakout {
    fn kind(&self) -> GameKind {
        GameKind::Breakout
    }

    fn update(&mut self, _dt: Duration) {
        if self.status == RoundStatus::Running {
            self.step();
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Action | Command::Select { .. } => match self.status {
                RoundStatus::NotStarted => self.status = RoundStatus::Running,
                RoundStatus::Over | RoundStatus::Won => self.reset(),
                _ => {}
            },
            Command::Pointer { x, .. } => {
                if self.status == RoundStatus::Running {
                    self.set_paddle(x * WIDTH - PADDLE_WIDTH / 2.0);
                }
            }
            Command::Move(Direction::Left) => {
                if self.status == RoundStatus::Running {
                    self.set_paddle(self.paddle_x - PADDLE_NUDGE);
                }
            }
            Command::Move(Direction::Right) => {
                if self.status == RoundStatus::Running {
                    self.set_paddle(self.paddle_x + PADDLE_NUDGE);
                }
            }
            Command::Move(_) => {}
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(WIDTH, HEIGHT, Color::Rgb(10, 10, 20));
        for brick in self.bricks.iter().filter(|b| !b.hit) {
            scene.rect(brick.x, brick.y, BRICK_WIDTH, BRICK_HEIGHT, brick.color);
        }
        scene.rect(self.paddle_x, PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Rgb(180, 200, 255));
        scene.circle(self.ball.x, self.ball.y, BALL_RADIUS, Color::White);
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("Lives", "♥ ".repeat(self.lives as usize).trim_end(), Color::Red);
        scene.hud("High", self.high_score, Color::Cyan);
        let bricks = format!("{}/{}", self.bricks_left(), BRICK_ROWS * BRICK_COLS);
        scene.hud("Bricks", bricks, Color::Green);
        let hint = "Space to launch, mouse or ←→ to move";
        status_banner(&mut scene, self.status, hint, self.score);
        scene.help = "Mouse / ←→ Paddle │ Space Launch │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Breakout::new(self.high_score);
    }

    fn status(&self) -> RoundStatus {
        self.status
    }

    fn high_score(&self) -> Option<u32> {
        Some(self.high_score)
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
