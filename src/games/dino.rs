use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::clock::Interval;
use crate::games::{status_banner, toggle_pause, Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::Scene;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 150.0;
const GROUND_HEIGHT: f32 = 20.0;
const GROUND_Y: f32 = HEIGHT - GROUND_HEIGHT;
const DINO_X: f32 = 80.0;
const DINO_SIZE: f32 = 40.0;
const GRAVITY: f32 = 0.8;
const JUMP_VELOCITY: f32 = -15.0;
const START_SPEED: f32 = 5.0;
const MAX_SPEED: f32 = 10.0;
const SPEED_STEP: f32 = 0.5;
const SCORE_TICK_MS: u64 = 100;
const COLLISION_TOLERANCE: f32 = 5.0;

/// Cactus footprints as (width, height).
const CACTI: [(f32, f32); 3] = [(20.0, 40.0), (30.0, 25.0), (15.0, 35.0)];

#[derive(Debug, Clone, PartialEq)]
struct Obstacle {
    x: f32,
    width: f32,
    height: f32,
}

impl Obstacle {
    fn spawn() -> Self {
        let mut rng = rand::thread_rng();
        let (width, height) = CACTI[rng.gen_range(0..CACTI.len())];
        Self {
            x: WIDTH + rng.gen_range(200.0..400.0),
            width,
            height,
        }
    }

    fn top(&self) -> f32 {
        GROUND_Y - self.height
    }
}

pub struct DinoRunner {
    dino_y: f32,
    dino_vy: f32,
    jumping: bool,
    obstacles: Vec<Obstacle>,
    score: u32,
    high_score: u32,
    speed: f32,
    score_timer: Interval,
    status: RoundStatus,
    notices: Vec<Notice>,
}

impl DinoRunner {
    pub fn new(high_score: u32) -> Self {
        Self {
            dino_y: GROUND_Y - DINO_SIZE,
            dino_vy: 0.0,
            jumping: false,
            obstacles: Vec::new(),
            score: 0,
            high_score,
            speed: START_SPEED,
            score_timer: Interval::from_millis(SCORE_TICK_MS),
            status: RoundStatus::NotStarted,
            notices: Vec::new(),
        }
    }

    fn jump(&mut self) {
        if !self.jumping {
            self.dino_vy = JUMP_VELOCITY;
            self.jumping = true;
        }
    }

    fn check_collision(&self) -> bool {
        self.obstacles.iter().any(|obs| {
            DINO_X < obs.x + obs.width
                && DINO_X + DINO_SIZE > obs.x
                && self.dino_y < obs.top() + COLLISION_TOLERANCE
                && self.dino_y + DINO_SIZE > obs.top()
        })
    }

    fn add_point(&mut self) {
        self.score += 1;
        if self.score % 100 == 0 {
            self.speed = (self.speed + SPEED_STEP).min(MAX_SPEED);
            self.notices.push(Notice::success("Speed increased!"));
        }
    }

    fn step(&mut self) {
        // Physics
        self.dino_y += self.dino_vy;
        self.dino_vy += GRAVITY;
        if self.dino_y >= GROUND_Y - DINO_SIZE {
            self.dino_y = GROUND_Y - DINO_SIZE;
            self.dino_vy = 0.0;
            self.jumping = false;
        }

        // Obstacles
        let speed = self.speed;
        for obs in &mut self.obstacles {
            obs.x -= speed;
        }
        self.obstacles.retain(|o| o.x + o.width > 0.0);
        if self.obstacles.last().map_or(true, |o| o.x < WIDTH - 300.0) {
            self.obstacles.push(Obstacle::spawn());
        }

        if self.check_collision() {
            self.status = RoundStatus::Over;
            self.notices.push(Notice::error(format!("Game Over! Score: {}", self.score)));
            if self.score > self.high_score {
                self.high_score = self.score;
                self.notices.push(Notice::success("New high score!"));
            }
        }
    }
}

impl Game for DinoRunner {
    fn kind(&self) -> GameKind {
        GameKind::DinoRunner
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RoundStatus::Running {
            return;
        }
        self.step();
        if self.status != RoundStatus::Running {
            return;
        }
        for _ in 0..self.score_timer.advance(dt) {
            self.add_point();
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Action | Command::Select { .. } | Command::Move(Direction::Up) => {
                match self.status {
                    RoundStatus::NotStarted => self.status = RoundStatus::Running,
                    RoundStatus::Running => self.jump(),
                    RoundStatus::Over | RoundStatus::Won => self.reset(),
                    RoundStatus::Paused => {}
                }
            }
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
            Command::Move(_) | Command::Pointer { .. } => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(WIDTH, HEIGHT, Color::Rgb(245, 240, 230));
        scene.rect(0.0, GROUND_Y, WIDTH, GROUND_HEIGHT, Color::Rgb(120, 100, 80));
        for obs in &self.obstacles {
            if obs.x < WIDTH {
                scene.rect(obs.x, obs.top(), obs.width, obs.height, Color::Rgb(40, 140, 60));
            }
        }
        scene.rect(DINO_X, self.dino_y, DINO_SIZE, DINO_SIZE, Color::Rgb(90, 90, 90));
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("High Score", self.high_score, Color::Cyan);
        scene.hud("Speed", format!("{:.1}x", self.speed / START_SPEED), Color::Magenta);
        status_banner(&mut scene, self.status, "Space to start, Space to jump", self.score);
        scene.help = "Space / ↑ / Click Jump │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = DinoRunner::new(self.high_score);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(g: &mut DinoRunner) {
        g.update(Duration::from_millis(16));
    }

    fn running() -> DinoRunner {
        let mut g = DinoRunner::new(0);
        g.handle_command(Command::Action);
        g
    }

    #[test]
    fn test_first_action_only_starts() {
        let g = running();
        assert_eq!(g.status(), RoundStatus::Running);
        assert!(!g.jumping);
        assert_eq!(g.dino_vy, 0.0);
    }

    #[test]
    fn test_jump_arc_lands_back_on_ground() {
        let mut g = running();
        g.handle_command(Command::Action);
        assert!(g.jumping);
        frame(&mut g);
        assert!(g.dino_y < GROUND_Y - DINO_SIZE);
        // No double jump mid-air
        let vy = g.dino_vy;
        g.handle_command(Command::Action);
        assert_eq!(g.dino_vy, vy);
        for _ in 0..60 {
            g.obstacles.clear();
            frame(&mut g);
        }
        assert!(!g.jumping);
        assert_eq!(g.dino_y, GROUND_Y - DINO_SIZE);
    }

    #[test]
    fn test_spawns_when_empty_and_when_last_is_far_left() {
        let mut g = running();
        frame(&mut g);
        assert_eq!(g.obstacles.len(), 1);
        assert!(g.obstacles[0].x >= WIDTH + 200.0);
        g.obstacles[0].x = WIDTH - 300.0;
        frame(&mut g);
        assert_eq!(g.obstacles.len(), 2);
    }

    #[test]
    fn test_offscreen_obstacles_are_dropped() {
        let mut g = running();
        g.obstacles = vec![
            Obstacle { x: -15.0, width: 20.0, height: 40.0 },
            Obstacle { x: 500.0, width: 20.0, height: 40.0 },
        ];
        frame(&mut g);
        assert_eq!(g.obstacles.len(), 1);
        assert_eq!(g.obstacles[0].x, 500.0 - START_SPEED);
    }

    #[test]
    fn test_cactus_under_dino_ends_round() {
        let mut g = running();
        g.score = 42;
        g.obstacles = vec![Obstacle { x: DINO_X + 10.0, width: 20.0, height: 40.0 }];
        frame(&mut g);
        assert_eq!(g.status(), RoundStatus::Over);
        assert_eq!(g.high_score(), Some(42));
    }

    #[test]
    fn test_clearing_a_cactus_in_the_air() {
        let mut g = running();
        g.dino_y = 20.0;
        g.jumping = true;
        g.obstacles = vec![Obstacle { x: DINO_X + 10.0, width: 20.0, height: 40.0 }];
        frame(&mut g);
        assert_eq!(g.status(), RoundStatus::Running);
    }

    #[test]
    fn test_score_ticks_every_100ms() {
        let mut g = running();
        g.obstacles = vec![Obstacle { x: 550.0, width: 20.0, height: 40.0 }];
        g.update(Duration::from_millis(250));
        assert_eq!(g.score, 2);
    }

    #[test]
    fn test_speed_rises_every_hundred_and_caps() {
        let mut g = running();
        g.score = 99;
        g.add_point();
        assert_eq!(g.speed, START_SPEED + SPEED_STEP);
        g.speed = MAX_SPEED;
        g.score = 199;
        g.add_point();
        assert_eq!(g.speed, MAX_SPEED);
    }

    #[test]
    fn test_reset_keeps_best_only() {
        let mut g = running();
        g.score = 10;
        g.obstacles = vec![Obstacle { x: DINO_X, width: 20.0, height: 40.0 }];
        frame(&mut g);
        g.handle_command(Command::Action);
        assert_eq!(g.status(), RoundStatus::NotStarted);
        assert_eq!(g.score, 0);
        assert_eq!(g.high_score(), Some(10));
        assert_eq!(g.speed, START_SPEED);
    }
}
