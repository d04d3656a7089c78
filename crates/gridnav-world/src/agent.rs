//! Mobile agents: the map's walkers and the player.

use gridnav_core::{Direction, MoverId, Point};
use gridnav_walk::{Movable, Navigator, PathfindingSession};

/// The physical part of an agent: where it stands and how it steps.
///
/// A step takes effect on [`cell`](Movable::cell) immediately and then
/// animates for `step_frames` ticks; while it animates the body reports
/// [`is_moving`](Movable::is_moving).
#[derive(Debug, Clone)]
pub struct Body {
    id: MoverId,
    cell: Point,
    through: bool,
    facing: Direction,
    step_frames: u32,
    frames_left: u32,
}

impl Body {
    pub fn new(id: MoverId, cell: Point) -> Self {
        Self {
            id,
            cell,
            through: false,
            facing: Direction::Down,
            step_frames: 0,
            frames_left: 0,
        }
    }

    /// Ticks each step keeps animating. 0 means steps land instantly.
    pub fn with_step_frames(mut self, frames: u32) -> Self {
        self.step_frames = frames;
        self
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn step_frames(&self) -> u32 {
        self.step_frames
    }

    pub fn set_step_frames(&mut self, frames: u32) {
        self.step_frames = frames;
    }

    /// Advance the running animation by one frame.
    pub fn update_animation(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }

    /// Put the body on `cell` at once, abandoning any animation.
    pub fn place(&mut self, cell: Point) {
        self.cell = cell;
        self.frames_left = 0;
    }
}

impl Movable for Body {
    fn id(&self) -> MoverId {
        self.id
    }

    fn cell(&self) -> Point {
        self.cell
    }

    fn is_moving(&self) -> bool {
        self.frames_left > 0
    }

    fn is_through(&self) -> bool {
        self.through
    }

    fn set_through(&mut self, through: bool) {
        self.through = through;
    }

    fn move_straight(&mut self, dir: Direction) {
        self.facing = dir;
        self.cell = self.cell.step(dir);
        self.frames_left = self.step_frames;
    }
}

/// A map agent, drawn with its layout glyph.
#[derive(Debug, Clone)]
pub struct Npc {
    pub glyph: char,
    pub body: Body,
    pub nav: PathfindingSession,
}

impl Npc {
    pub fn new(id: MoverId, glyph: char, cell: Point) -> Self {
        Self {
            glyph,
            body: Body::new(id, cell),
            nav: PathfindingSession::new(),
        }
    }
}

impl Navigator for Npc {
    type Body = Body;

    fn nav_parts(&mut self) -> (&mut Body, &mut PathfindingSession) {
        (&mut self.body, &mut self.nav)
    }
}

/// The player character. Counts the steps it has taken.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub nav: PathfindingSession,
    pub steps: u32,
}

impl Player {
    pub fn new(id: MoverId, cell: Point) -> Self {
        Self {
            body: Body::new(id, cell),
            nav: PathfindingSession::new(),
            steps: 0,
        }
    }
}

impl Navigator for Player {
    type Body = Body;

    fn nav_parts(&mut self) -> (&mut Body, &mut PathfindingSession) {
        (&mut self.body, &mut self.nav)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_lands_then_animates() {
        let mut b = Body::new(MoverId(1), Point::new(2, 2)).with_step_frames(2);
        b.move_straight(Direction::Left);
        assert_eq!(b.cell(), Point::new(1, 2));
        assert_eq!(b.facing(), Direction::Left);
        assert!(b.is_moving());
        b.update_animation();
        assert!(b.is_moving());
        b.update_animation();
        assert!(!b.is_moving());
        b.update_animation();
        assert!(!b.is_moving());
    }

    #[test]
    fn instant_steps_never_animate() {
        let mut b = Body::new(MoverId(1), Point::ZERO);
        b.move_straight(Direction::Down);
        assert!(!b.is_moving());
        assert_eq!(b.cell(), Point::new(0, 1));
    }

    #[test]
    fn place_cancels_animation() {
        let mut b = Body::new(MoverId(1), Point::ZERO).with_step_frames(4);
        b.move_straight(Direction::Right);
        b.place(Point::new(5, 5));
        assert!(!b.is_moving());
        assert_eq!(b.cell(), Point::new(5, 5));
    }

    #[test]
    fn both_kinds_lend_their_parts() {
        let mut npc = Npc::new(MoverId(3), 'a', Point::new(1, 1));
        let (body, nav) = npc.nav_parts();
        assert_eq!(body.id(), MoverId(3));
        assert!(!nav.is_active());

        let mut player = Player::new(MoverId(0), Point::ZERO);
        let (body, _) = player.nav_parts();
        body.set_through(true);
        assert!(player.body.is_through());
    }
}
