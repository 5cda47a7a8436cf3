use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use ratatui::style::Color;

use crate::clock::Interval;
use crate::games::{status_banner, toggle_pause, Game, GameKind, RoundStatus};
use crate::input::{Command, Direction};
use crate::notify::Notice;
use crate::scene::Scene;

const BOARD_SIZE: i32 = 20;
const STEP_MS: u64 = 150;
const FOOD_POINTS: u32 = 10;
const START: (i32, i32) = (10, 10);
const START_FOOD: (i32, i32) = (15, 15);

pub struct Snake {
    body: VecDeque<(i32, i32)>,
    food: (i32, i32),
    heading: Direction,
    /// Direction of the last step actually taken; reversals are checked
    /// against this, not against `heading`.
    last_step: Direction,
    status: RoundStatus,
    score: u32,
    high_score: u32,
    best_announced: bool,
    step_timer: Interval,
    notices: Vec<Notice>,
}

impl Snake {
    pub fn new(high_score: u32) -> Self {
        Self {
            body: VecDeque::from([START]),
            food: START_FOOD,
            heading: Direction::Right,
            last_step: Direction::Right,
            status: RoundStatus::NotStarted,
            score: 0,
            high_score,
            best_announced: false,
            step_timer: Interval::from_millis(STEP_MS),
            notices: Vec::new(),
        }
    }

    pub fn head(&self) -> (i32, i32) {
        self.body[0]
    }

    fn place_food(&self) -> Option<(i32, i32)> {
        let cells = (BOARD_SIZE * BOARD_SIZE) as usize;
        if self.body.len() >= cells {
            return None;
        }
        let mut rng = rand::thread_rng();
        loop {
            let candidate = (rng.gen_range(0..BOARD_SIZE), rng.gen_range(0..BOARD_SIZE));
            if !self.body.contains(&candidate) {
                return Some(candidate);
            }
        }
    }

    fn step(&mut self) {
        let (dx, dy) = self.heading.delta();
        let (hx, hy) = self.head();
        let head = (hx + dx, hy + dy);

        if head.0 < 0 || head.0 >= BOARD_SIZE || head.1 < 0 || head.1 >= BOARD_SIZE {
            self.status = RoundStatus::Over;
            self.notices.push(Notice::error("Game Over! Hit the wall!"));
            return;
        }
        if self.body.contains(&head) {
            self.status = RoundStatus::Over;
            self.notices.push(Notice::error("Game Over! Hit yourself!"));
            return;
        }

        self.body.push_front(head);
        self.last_step = self.heading;

        if head == self.food {
            self.score += FOOD_POINTS;
            self.notices.push(Notice::success(format!("+{} points!", FOOD_POINTS)));
            if self.score > self.high_score {
                self.high_score = self.score;
                if !self.best_announced {
                    self.best_announced = true;
                    self.notices.push(Notice::success("New High Score!"));
                }
            }
            match self.place_food() {
                Some(food) => self.food = food,
                None => {
                    self.status = RoundStatus::Won;
                    self.notices.push(Notice::success("The board is full!"));
                }
            }
        } else {
            self.body.pop_back();
        }
    }
}

impl Game for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RoundStatus::Running {
            return;
        }
        for _ in 0..self.step_timer.advance(dt) {
            self.step();
            if self.status != RoundStatus::Running {
                break;
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Move(dir) => {
                if self.status == RoundStatus::Running && dir != self.last_step.opposite() {
                    self.heading = dir;
                }
            }
            Command::Action => match self.status {
                RoundStatus::NotStarted => self.status = RoundStatus::Running,
                RoundStatus::Over | RoundStatus::Won => self.reset(),
                _ => {}
            },
            Command::Pause => toggle_pause(&mut self.status),
            Command::Restart => self.reset(),
            Command::Pointer { .. } | Command::Select { .. } => {}
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene::new(BOARD_SIZE as f32, BOARD_SIZE as f32, Color::Rgb(12, 18, 12));
        let (fx, fy) = (self.food.0 as u16, self.food.1 as u16);
        scene.cell(fx, fy, Color::Rgb(80, 220, 255), Some("●".into()), false);
        for (i, &(x, y)) in self.body.iter().enumerate().rev() {
            let color = if i == 0 {
                Color::Rgb(150, 255, 120)
            } else {
                Color::Rgb(60, 180, 60)
            };
            scene.cell(x as u16, y as u16, color, None, i == 0);
        }
        scene.hud("Score", self.score, Color::Yellow);
        scene.hud("High Score", self.high_score, Color::Cyan);
        scene.hud("Length", self.body.len(), Color::Green);
        status_banner(&mut scene, self.status, "Space to start", self.score);
        scene.help = "←↑↓→ Steer │ Space Start │ P Pause │ R Restart │ Esc Back";
        scene
    }

    fn reset(&mut self) {
        *self = Snake::new(self.high_score);
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

    fn tick(g: &mut Snake) {
        g.update(Duration::from_millis(STEP_MS));
    }

    fn running() -> Snake {
        let mut g = Snake::new(0);
        g.handle_command(Command::Action);
        g
    }

    #[test]
    fn test_head_moves_one_cell_per_tick_in_each_direction() {
        for dir in [Direction::Up, Direction::Down, Direction::Right] {
            let mut g = running();
            g.handle_command(Command::Move(dir));
            let (x, y) = g.head();
            tick(&mut g);
            let (dx, dy) = dir.delta();
            assert_eq!(g.head(), (x + dx, y + dy));
        }
    }

    #[test]
    fn test_left_turn_after_leaving_the_start_heading() {
        let mut g = running();
        g.handle_command(Command::Move(Direction::Up));
        tick(&mut g);
        assert_eq!(g.head(), (10, 9));
        g.handle_command(Command::Move(Direction::Left));
        tick(&mut g);
        assert_eq!(g.head(), (9, 9));
        assert_eq!(g.last_step, Direction::Left);
    }

    #[test]
    fn test_no_step_before_interval() {
        let mut g = running();
        g.update(Duration::from_millis(STEP_MS - 1));
        assert_eq!(g.head(), START);
    }

    #[test]
    fn test_not_started_does_not_move() {
        let mut g = Snake::new(0);
        tick(&mut g);
        assert_eq!(g.head(), START);
        g.handle_command(Command::Move(Direction::Up));
        assert_eq!(g.heading, Direction::Right);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut g = running();
        g.handle_command(Command::Move(Direction::Left));
        assert_eq!(g.heading, Direction::Right);
    }

    #[test]
    fn test_quick_turns_cannot_reverse_into_body() {
        let mut g = running();
        g.handle_command(Command::Move(Direction::Up));
        g.handle_command(Command::Move(Direction::Left));
        // Still stepping right, so Left is a reversal
        assert_eq!(g.heading, Direction::Up);
    }

    #[test]
    fn test_wall_collision_ends_and_halts() {
        let mut g = running();
        g.body = VecDeque::from([(19, 5)]);
        tick(&mut g);
        assert_eq!(g.status(), RoundStatus::Over);
        assert_eq!(g.head(), (19, 5));
        tick(&mut g);
        assert_eq!(g.head(), (19, 5));
        assert!(g.is_terminal());
    }

    #[test]
    fn test_self_collision_ends_round() {
        let mut g = running();
        // Head at (5,5) moving up into its own body
        g.body = VecDeque::from([(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)]);
        g.heading = Direction::Up;
        g.last_step = Direction::Up;
        tick(&mut g);
        assert_eq!(g.status(), RoundStatus::Over);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut g = running();
        g.food = (11, 10);
        tick(&mut g);
        assert_eq!(g.body.len(), 2);
        assert_eq!(g.score, 10);
        assert_eq!(g.high_score(), Some(10));
        assert!(!g.body.contains(&g.food));
        let notices = g.take_notices();
        assert!(notices.iter().any(|n| n.text == "New High Score!"));
    }

    #[test]
    fn test_action_after_game_over_starts_fresh_round() {
        let mut g = running();
        g.body = VecDeque::from([(19, 5)]);
        tick(&mut g);
        g.handle_command(Command::Action);
        assert_eq!(g.status(), RoundStatus::NotStarted);
        assert_eq!(g.head(), START);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn test_paused_snake_does_not_move() {
        let mut g = running();
        g.handle_command(Command::Pause);
        tick(&mut g);
        assert_eq!(g.head(), START);
        assert_eq!(g.status(), RoundStatus::Paused);
    }
}
