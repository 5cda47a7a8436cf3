use std::f32::consts::PI;
use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::games::{contact_offset, status_banner, toggle_pause, Body, Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::Scene;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;
const PADDLE_WIDTH: f32 = 15.0;
const PADDLE_HEIGHT: f32 = 80.0;
const BALL_RADIUS: f32 = 8.0;
const PADDLE_SPEED: f32 = 6.0;
const AI_SPEED: f32 = PADDLE_SPEED * 0.8;
const AI_DEAD_ZONE: f32 = 10.0;
const PADDLE_NUDGE: f32 = 20.0;
const SERVE_SPEED: f32 = 4.0;
const SPIN: f32 = 8.0;
const WINNING_SCORE: u32 = 5;

fn centre_paddle() -> f32 {
    HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0
}

/// Ball from the centre at a random angle within ±30° toward a random side.
fn serve() -> Body {
    let mut rng = rand::thread_rng();
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let angle = rng.gen_range(-PI / 6.0..PI / 6.0);
    Body::new(
        WIDTH / 2.0,
        HEIGHT / 2.0,
        SERVE_SPEED * side * angle.cos(),
        SERVE_SPEED * angle.sin(),
        BALL_RADIUS,
    )
}

pub struct Pong {
    ball: Body,
    player_y: f32,
    ai_y: f32,
    player_score: u32,
    ai_score: u32,
    status: RoundStatus,
    notices: Vec<Notice>,
}

impl Pong {
    pub fn new() -> Self {
        Self {
            ball: serve(),
            player_y: centre_paddle(),
            ai_y: centre_paddle(),
            player_score: 0,
            ai_score: 0,
            status: RoundStatus::NotStarted,
            notices: Vec::new(),
        }
    }

    fn set_player(&mut self, y: f32) {
        self.player_y = y.clamp(0.0, HEIGHT - PADDLE_HEIGHT);
    }

    fn track_ball(&mut self) {
        let centre = self.ai_y + PADDLE_HEIGHT / 2.0;
        if self.ball.y < centre - AI_DEAD_ZONE {
            self.ai_y = (self.ai_y - AI_SPEED).max(0.0);
        } else if self.ball.y > centre + AI_DEAD_ZONE {
            self.ai_y = (self.ai_y + AI_SPEED).min(HEIGHT - PADDLE_HEIGHT);
        }
    }

    fn step(&mut self) {
        let ball = &mut self.ball;
        ball.step();

        if ball.y <= BALL_RADIUS {
            ball.vy = ball.vy.abs();
            ball.y = BALL_RADIUS;
        } else if ball.y >= HEIGHT - BALL_RADIUS {
            ball.vy = -ball.vy.abs();
            ball.y = HEIGHT - BALL_RADIUS;
        }

        // Player paddle on the left
        if ball.vx < 0.0
            && ball.x - BALL_RADIUS <= PADDLE_WIDTH
            && ball.x >= 0.0
            && ball.y >= self.player_y
            && ball.y <= self.player_y + PADDLE_HEIGHT
        {
            ball.vx = -ball.vx;
            ball.x = PADDLE_WIDTH + BALL_RADIUS;
            ball.vy = contact_offset(ball.y, self.player_y, PADDLE_HEIGHT) * SPIN;
        }

        // AI paddle on the right
        if ball.vx > 0.0
            && ball.x + BALL_RADIUS >= WIDTH - PADDLE_WIDTH
            && ball.x <= WIDTH
            && ball.y >= self.ai_y
            && ball.y <= self.ai_y + PADDLE_HEIGHT
        {
            ball.vx = -ball.vx;
            ball.x = WIDTH - PADDLE_WIDTH - BALL_RADIUS;
            ball.vy = contact_offset(ball.y, self.ai_y, PADDLE_HEIGHT) * SPIN;
        }

        if ball.x < 0.0 {
            self.ai_score += 1;
            self.ball = serve();
            if self.ai_score >= WINNING_SCORE {
                self.status = RoundStatus::Over;
                self.notices.push(Notice::error("AI wins! Better luck next time!"));
            } else {
                self.notices.push(Notice::info("AI scores!"));
            }
        } else if ball.x > WIDTH {
            self.player_score += 1;
            self.ball = serve();
            if self.player_score >= WINNING_SCORE {
                self.status = RoundStatus::Won;
                self.notices.push(Notice::success("🎉 You win! 🎉"));
            } else {
                self.notices.push(Notice::success("You scored!"));
            }
        }

        self.track_ball();
    }
}

impl Default for Pong {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Pong {
    fn kind(&self) -> GameKind {
        GameKind::Pong
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
            Command::Pointer { y, .. } => {
                if self.status == RoundStatus::Running {
                    self.set_player(y * HEIGHT - PADDLE_HEIGHT / 2.0);
                }
            }
            Command::Move(Direction::Up) if self.status == RoundStatus::Running => {
                self.set_player(self.player_y - PADDLE_NUDGE)
            }
            Command::Move(Direction::Down) if self.status == RoundStatus::Running => {
                self.set_player(self.player_y + PADDLE_NUDGE)
            }
            Command::Move(_) => {}
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(WIDTH, HEIGHT, Color::Black);
        let mut y = 0.0;
        while y < HEIGHT {
            scene.rect(WIDTH / 2.0 - 1.0, y, 2.0, 10.0, Color::DarkGray);
            y += 20.0;
        }
        scene.rect(0.0, self.player_y, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Rgb(80, 160, 255));
        let ai_x = WIDTH - PADDLE_WIDTH;
        scene.rect(ai_x, self.ai_y, PADDLE_WIDTH, PADDLE_HEIGHT, Color::Rgb(255, 90, 90));
        scene.circle(self.ball.x, self.ball.y, BALL_RADIUS, Color::White);
        scene.hud("You", self.player_score, Color::Rgb(80, 160, 255));
        scene.hud("First to", WINNING_SCORE, Color::Gray);
        scene.hud("AI", self.ai_score, Color::Rgb(255, 90, 90));
        let hint = "Space to serve, mouse or ↑↓ to move";
        status_banner(&mut scene, self.status, hint, self.player_score);
        scene.help = "Mouse / ↑↓ Paddle │ Space Start │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Pong::new();
    }

    fn status(&self) -> RoundStatus {
        self.status
    }

    fn high_score(&self) -> Option<u32> {
        None
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(g: &mut Pong) {
        g.update(Duration::from_millis(16));
    }

    fn running_with(ball: Body) -> Pong {
        let mut g = Pong::new();
        g.handle_command(Command::Action);
        g.ball = ball;
        g
    }

    #[test]
    fn test_serve_speed_and_angle() {
        for _ in 0..50 {
            let b = serve();
            let speed = (b.vx * b.vx + b.vy * b.vy).sqrt();
            assert!((speed - SERVE_SPEED).abs() < 1e-3);
            assert!(b.vx.abs() >= SERVE_SPEED * (PI / 6.0).cos() - 1e-3);
        }
    }

    #[test]
    fn test_wall_reflects_vertical_velocity() {
        let mut g = running_with(Body::new(300.0, BALL_RADIUS + 1.0, 2.0, -3.0, BALL_RADIUS));
        frame(&mut g);
        assert!(g.ball.vy > 0.0);
        assert_eq!(g.ball.y, BALL_RADIUS);
    }

    #[test]
    fn test_player_paddle_flips_once_and_pins_ball() {
        let x = PADDLE_WIDTH + BALL_RADIUS + 2.0;
        let mut g = running_with(Body::new(x, 200.0, -4.0, 0.0, BALL_RADIUS));
        g.player_y = 160.0;
        frame(&mut g);
        assert!(g.ball.vx > 0.0);
        assert_eq!(g.ball.x, PADDLE_WIDTH + BALL_RADIUS);
        // Dead centre hit carries no spin
        assert!(g.ball.vy.abs() < 1e-4);
        frame(&mut g);
        assert!(g.ball.vx > 0.0);
    }

    #[test]
    fn test_ball_leaving_paddle_is_not_flipped_again() {
        let x = PADDLE_WIDTH + BALL_RADIUS - 1.0;
        let mut g = running_with(Body::new(x, 200.0, 4.0, 0.0, BALL_RADIUS));
        g.player_y = 160.0;
        frame(&mut g);
        assert!(g.ball.vx > 0.0);
    }

    #[test]
    fn test_ai_paddle_contact_adds_spin() {
        let x = WIDTH - PADDLE_WIDTH - BALL_RADIUS - 2.0;
        let mut g = running_with(Body::new(x, 170.0, 4.0, 0.0, BALL_RADIUS));
        g.ai_y = 150.0;
        frame(&mut g);
        assert!(g.ball.vx < 0.0);
        assert!((g.ball.vy - (20.0 / PADDLE_HEIGHT - 0.5) * SPIN).abs() < 1e-4);
    }

    #[test]
    fn test_point_only_when_ball_exits() {
        let mut g = running_with(Body::new(5.0, 30.0, -4.0, 0.0, BALL_RADIUS));
        g.player_y = HEIGHT - PADDLE_HEIGHT;
        frame(&mut g);
        assert_eq!(g.ai_score, 0);
        frame(&mut g);
        assert_eq!(g.ai_score, 1);
        assert_eq!((g.ball.x, g.ball.y), (WIDTH / 2.0, HEIGHT / 2.0));
    }

    #[test]
    fn test_first_to_five_ends_match() {
        let mut g = running_with(serve());
        g.player_score = 4;
        g.ball = Body::new(WIDTH - 1.0, 20.0, 4.0, 0.0, BALL_RADIUS);
        g.ai_y = HEIGHT - PADDLE_HEIGHT;
        frame(&mut g);
        assert_eq!(g.player_score, 5);
        assert_eq!(g.status(), RoundStatus::Won);

        let mut g = running_with(Body::new(1.0, 20.0, -4.0, 0.0, BALL_RADIUS));
        g.ai_score = 4;
        g.player_y = HEIGHT - PADDLE_HEIGHT;
        frame(&mut g);
        assert_eq!(g.status(), RoundStatus::Over);
        let ball = g.ball;
        frame(&mut g);
        assert_eq!(g.ball, ball);
    }

    #[test]
    fn test_ai_tracks_with_dead_zone() {
        let mut g = running_with(Body::new(300.0, 205.0, 0.0, 0.0, BALL_RADIUS));
        let start = g.ai_y;
        frame(&mut g);
        assert_eq!(g.ai_y, start);
        g.ball = Body::new(300.0, 350.0, 0.0, 0.0, BALL_RADIUS);
        frame(&mut g);
        assert!((g.ai_y - (start + AI_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_moves_player_paddle() {
        let mut g = running_with(serve());
        g.handle_command(Command::Pointer { x: 0.1, y: 0.5 });
        assert_eq!(g.player_y, centre_paddle());
        g.handle_command(Command::Pointer { x: 0.1, y: 0.0 });
        assert_eq!(g.player_y, 0.0);
    }
}
