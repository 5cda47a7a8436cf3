use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::games::{status_banner, toggle_pause, Aabb, Body, Game, GameKind, RoundStatus};
use crate::input::Command;
use crate::notify::Notice;
use crate::scene::Scene;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;
const BIRD_X: f32 = WIDTH / 2.0;
const BIRD_RADIUS: f32 = 15.0;
const PIPE_WIDTH: f32 = 60.0;
const PIPE_GAP: f32 = 120.0;
const PIPE_SPACING: f32 = 200.0;
const GRAVITY: f32 = 0.6;
const FLAP_VELOCITY: f32 = -12.0;
const PIPE_SPEED: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
struct Pipe {
    x: f32,
    top_height: f32,
    passed: bool,
}

impl Pipe {
    fn spawn(x: f32) -> Self {
        let top_height = rand::thread_rng().gen_range(50.0..HEIGHT - PIPE_GAP - 50.0);
        Self {
            x,
            top_height,
            passed: false,
        }
    }

    fn bottom_y(&self) -> f32 {
        self.top_height + PIPE_GAP
    }

    fn top_box(&self) -> Aabb {
        Aabb::new(self.x, 0.0, PIPE_WIDTH, self.top_height)
    }

    fn bottom_box(&self) -> Aabb {
        Aabb::new(self.x, self.bottom_y(), PIPE_WIDTH, HEIGHT - self.bottom_y())
    }
}

pub struct FlappyBird {
    bird: Body,
    pipes: Vec<Pipe>,
    score: u32,
    high_score: u32,
    best_announced: bool,
    status: RoundStatus,
    notices: Vec<Notice>,
}

impl FlappyBird {
    pub fn new(high_score: u32) -> Self {
        Self {
            bird: Body::new(BIRD_X, HEIGHT / 2.0, 0.0, 0.0, BIRD_RADIUS),
            pipes: vec![Pipe::spawn(WIDTH)],
            score: 0,
            high_score,
            best_announced: false,
            status: RoundStatus::NotStarted,
            notices: Vec::new(),
        }
    }

    fn crashed(&self) -> bool {
        let bird = self.bird.bounds();
        if bird.y <= 0.0 || bird.y + bird.h >= HEIGHT {
            return true;
        }
        self.pipes
            .iter()
            .any(|p| bird.overlaps(&p.top_box()) || bird.overlaps(&p.bottom_box()))
    }

    fn step(&mut self) {
        self.bird.step();
        self.bird.vy += GRAVITY;

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
        }
        if self.pipes.last().map_or(true, |p| p.x < WIDTH - PIPE_SPACING) {
            self.pipes.push(Pipe::spawn(WIDTH));
        }

        let bird_left = self.bird.x - self.bird.radius;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x + PIPE_WIDTH < bird_left {
                pipe.passed = true;
                self.score += 1;
            }
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH >= 0.0);

        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.best_announced {
                self.best_announced = true;
                self.notices.push(Notice::success("New high score!"));
            }
        }

        if self.crashed() {
            self.status = RoundStatus::Over;
            self.notices.push(Notice::error("Game Over!"));
        }
    }
}

impl Game for FlappyBird {
    fn kind(&self) -> GameKind {
        GameKind::FlappyBird
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
                RoundStatus::Running => self.bird.vy = FLAP_VELOCITY,
                RoundStatus::Over | RoundStatus::Won => self.reset(),
                RoundStatus::Paused => {}
            },
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
            Command::Move(_) | Command::Pointer { .. } => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(WIDTH, HEIGHT, Color::Rgb(30, 110, 190));
        for pipe in &self.pipes {
            let top = pipe.top_box();
            let bottom = pipe.bottom_box();
            scene.rect(top.x, top.y, top.w, top.h, Color::Rgb(40, 170, 60));
            scene.rect(bottom.x, bottom.y, bottom.w, bottom.h, Color::Rgb(40, 170, 60));
        }
        scene.circle(self.bird.x, self.bird.y, self.bird.radius, Color::Rgb(250, 210, 40));
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("High Score", self.high_score, Color::Cyan);
        status_banner(&mut scene, self.status, "Space to start, Space to flap", self.score);
        scene.help = "Space / Click Flap │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = FlappyBird::new(self.high_score);
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

    fn frame(g: &mut FlappyBird) {
        g.update(Duration::from_millis(16));
    }

    fn running_without_pipes() -> FlappyBird {
        let mut g = FlappyBird::new(0);
        g.pipes = vec![Pipe {
            x: WIDTH,
            top_height: 100.0,
            passed: false,
        }];
        g.handle_command(Command::Action);
        g
    }

    #[test]
    fn test_first_action_starts_without_flapping() {
        let mut g = FlappyBird::new(0);
        g.handle_command(Command::Action);
        assert_eq!(g.status(), RoundStatus::Running);
        assert_eq!(g.bird.vy, 0.0);
    }

    #[test]
    fn test_gravity_then_flap() {
        let mut g = running_without_pipes();
        frame(&mut g);
        assert!((g.bird.vy - GRAVITY).abs() < 1e-5);
        g.handle_command(Command::Action);
        assert_eq!(g.bird.vy, FLAP_VELOCITY);
        let y = g.bird.y;
        frame(&mut g);
        assert!(g.bird.y < y);
    }

    #[test]
    fn test_falling_to_the_floor_ends_round() {
        let mut g = running_without_pipes();
        for _ in 0..200 {
            frame(&mut g);
        }
        assert_eq!(g.status(), RoundStatus::Over);
    }

    #[test]
    fn test_pipe_far_from_bird_does_not_collide() {
        let mut g = running_without_pipes();
        // Bird sits well below the top pipe's height but the pipe is far right
        g.pipes[0].top_height = 300.0;
        g.pipes[0].x = 500.0;
        frame(&mut g);
        assert_eq!(g.status(), RoundStatus::Running);
    }

    #[test]
    fn test_pipe_at_bird_outside_gap_collides() {
        let mut g = running_without_pipes();
        g.pipes[0].top_height = 250.0;
        g.pipes[0].x = BIRD_X - 10.0;
        frame(&mut g);
        assert_eq!(g.status(), RoundStatus::Over);
    }

    #[test]
    fn test_scoring_once_per_pipe_passed() {
        let mut g = running_without_pipes();
        g.bird.y = 200.0;
        g.pipes = vec![Pipe {
            x: BIRD_X - BIRD_RADIUS - PIPE_WIDTH + 1.0,
            top_height: 100.0,
            passed: false,
        }];
        g.bird.vy = -GRAVITY;
        frame(&mut g);
        assert_eq!(g.score, 1);
        frame(&mut g);
        assert_eq!(g.score, 1);
        assert_eq!(g.high_score(), Some(1));
    }

    #[test]
    fn test_pipes_scroll_and_spawn() {
        let mut g = running_without_pipes();
        g.bird.y = 150.0;
        for _ in 0..(PIPE_SPACING / PIPE_SPEED) as usize + 2 {
            g.bird.vy = 0.0;
            frame(&mut g);
        }
        assert_eq!(g.pipes.len(), 2);
        assert!(g.pipes[0].x < WIDTH - PIPE_SPACING);
    }

    #[test]
    fn test_action_after_crash_resets() {
        let mut g = running_without_pipes();
        for _ in 0..200 {
            frame(&mut g);
        }
        g.handle_command(Command::Action);
        assert_eq!(g.status(), RoundStatus::NotStarted);
        assert_eq!(g.bird.y, HEIGHT / 2.0);
    }
}
