use bevy::prelude::*;

#[derive(Component)]
pub struct Worker {
    /// Travel speed in render pixels per second.
    pub speed: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Idle,
    Walking,
}

/// Facing is derived from the path, never set directly. The sprite sheet only
/// carries up/down rows, so lateral movement renders as Down like the art
/// expects.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
}

impl Facing {
    /// Facing for one discrete path step.
    pub fn from_step(delta: IVec2) -> Self {
        if delta.y < 0 {
            Facing::Up
        } else {
            Facing::Down
        }
    }
}

/// The discrete path a worker is walking, plus the index of the waypoint it
/// is currently heading for.
#[derive(Component, Debug, Default)]
pub struct FollowPath {
    pub cells: Vec<IVec2>,
    pub index: usize,
}

impl FollowPath {
    pub fn assign(&mut self, cells: Vec<IVec2>) {
        self.cells = cells;
        self.index = 0;
    }

    pub fn current(&self) -> Option<IVec2> {
        self.cells.get(self.index).copied()
    }

    /// True once there is no waypoint left ahead of the current one.
    pub fn finished(&self) -> bool {
        self.index + 1 >= self.cells.len()
    }

    /// The waypoint the worker is moving towards, if any.
    pub fn next(&self) -> Option<IVec2> {
        self.cells.get(self.index + 1).copied()
    }
}

/// Per-worker patrol task. One of these is stepped once per frame for each
/// worker; it never blocks the tick, it just waits across frames.
#[derive(Component)]
pub struct Patrol {
    pub phase: PatrolPhase,
    /// Grid cell the worker last arrived at (or was spawned on).
    pub cell: IVec2,
    pause_secs: f32,
}

pub enum PatrolPhase {
    /// Pausing between legs. When the timer runs out a new destination is
    /// drawn and a path requested.
    Waiting(Timer),
    /// A path is assigned; waiting for the worker to report idle again.
    Travelling,
}

impl Patrol {
    pub fn new(cell: IVec2, pause_secs: f32) -> Self {
        Self {
            phase: PatrolPhase::Waiting(Timer::from_seconds(pause_secs, TimerMode::Once)),
            cell,
            pause_secs,
        }
    }

    /// Go back to pausing after a leg completes.
    pub fn restart_wait(&mut self) {
        self.phase = PatrolPhase::Waiting(Timer::from_seconds(self.pause_secs, TimerMode::Once));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_follows_vertical_steps() {
        assert_eq!(Facing::from_step(IVec2::new(0, -1)), Facing::Up);
        assert_eq!(Facing::from_step(IVec2::new(0, 1)), Facing::Down);
    }

    #[test]
    fn lateral_steps_face_down() {
        assert_eq!(Facing::from_step(IVec2::new(1, 0)), Facing::Down);
        assert_eq!(Facing::from_step(IVec2::new(-1, 0)), Facing::Down);
    }

    #[test]
    fn patrol_waits_before_travelling_and_can_rewind() {
        use std::time::Duration;

        let mut patrol = Patrol::new(IVec2::new(3, 3), 1.0);
        let PatrolPhase::Waiting(timer) = &mut patrol.phase else {
            panic!("fresh patrol should wait");
        };
        assert!(!timer.tick(Duration::from_millis(500)).just_finished());
        assert!(timer.tick(Duration::from_millis(600)).just_finished());

        patrol.phase = PatrolPhase::Travelling;
        patrol.restart_wait();
        let PatrolPhase::Waiting(timer) = &patrol.phase else {
            panic!("restart_wait should return to waiting");
        };
        assert!(!timer.finished());
    }

    #[test]
    fn follow_path_reports_segments() {
        let mut path = FollowPath::default();
        path.assign(vec![IVec2::new(0, 0), IVec2::new(0, 1), IVec2::new(1, 1)]);
        assert_eq!(path.current(), Some(IVec2::new(0, 0)));
        assert_eq!(path.next(), Some(IVec2::new(0, 1)));

        path.index = 1;
        assert_eq!(path.next(), Some(IVec2::new(1, 1)));
        assert!(!path.finished());

        path.index = 2;
        assert!(path.finished());
        assert_eq!(path.next(), None);
        assert_eq!(path.current(), Some(IVec2::new(1, 1)));
    }
}
