//! Broad-phase collision grid and projectile resolution
//!
//! Every evaluated frame the live projectiles (player shots and stars) are
//! bucketed into square cells by their centre. Narrow-phase tests only run
//! between a projectile and the projectiles in its own and the 8 neighbouring
//! cells. The boss and the player are never bucketed: good projectiles are
//! always tested against the boss, evil ones against the player.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entity::{Affinity, Entity, FrameContext};
use super::events::GameEvent;
use super::hazards::Star;
use super::player::{Player, Shot};

/// When a shot's one-shot damage guard is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPolicy {
    /// The first target hit consumes the guard
    #[default]
    FirstContact,
    /// The guard is consumed when the resolution pass ends, so a shot
    /// overlapping several targets in one pass damages each of them once
    PassWide,
}

/// Index of a projectile in the director's collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProjectileRef {
    Shot(usize),
    Star(usize),
}

impl ProjectileRef {
    pub fn affinity(self) -> Affinity {
        match self {
            ProjectileRef::Shot(_) => Affinity::Good,
            ProjectileRef::Star(_) => Affinity::Evil,
        }
    }
}

pub type Cell = (i32, i32);

/// Uniform grid keyed by cell coordinates
///
/// Ordered map so cells are always visited in the same order.
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    cell_size: f32,
    cells: BTreeMap<Cell, Vec<ProjectileRef>>,
}

impl CollisionGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: BTreeMap::new(),
        }
    }

    /// Bucket every active shot and star
    pub fn build(cell_size: f32, shots: &[Shot], stars: &[Star]) -> Self {
        let mut grid = Self::new(cell_size);
        for (i, shot) in shots.iter().enumerate().filter(|(_, s)| s.is_active()) {
            grid.insert(ProjectileRef::Shot(i), shot.center());
        }
        for (i, star) in stars.iter().enumerate().filter(|(_, s)| s.is_active()) {
            grid.insert(ProjectileRef::Star(i), star.center());
        }
        grid
    }

    pub fn cell_of(&self, point: Vec2) -> Cell {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, projectile: ProjectileRef, center: Vec2) {
        let cell = self.cell_of(center);
        self.cells.entry(cell).or_default().push(projectile);
    }

    /// Populated cells in ascending order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, &[ProjectileRef])> {
        self.cells.iter().map(|(cell, refs)| (*cell, refs.as_slice()))
    }

    pub fn cell(&self, cell: Cell) -> &[ProjectileRef] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Projectiles in `cell` and its 8 neighbours
    pub fn neighborhood(&self, (cx, cy): Cell) -> impl Iterator<Item = ProjectileRef> + '_ {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .flat_map(|cell| self.cell(cell).iter().copied())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Run one resolution pass over shots and stars.
///
/// Returns the number of narrow-phase tests performed.
pub fn resolve_projectiles(
    grid: &CollisionGrid,
    shots: &mut [Shot],
    stars: &mut [Star],
    boss: &mut Boss,
    player: &mut Player,
    ctx: &FrameContext,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut tests = 0;
    let mut nearby_evil = Vec::new();

    for (cell, members) in grid.cells() {
        nearby_evil.clear();
        nearby_evil.extend(grid.neighborhood(cell).filter_map(|r| match r {
            ProjectileRef::Star(i) => Some(i),
            ProjectileRef::Shot(_) => None,
        }));

        for member in members {
            match *member {
                ProjectileRef::Shot(i) => {
                    let shot = &mut shots[i];
                    for &j in &nearby_evil {
                        shot.collide(&mut stars[j], ctx, events);
                        tests += 1;
                    }
                    shot.collide(&mut *boss, ctx, events);
                    tests += 1;
                }
                ProjectileRef::Star(j) => {
                    stars[j].collide(&mut *player, ctx, events);
                    tests += 1;
                }
            }
        }
    }

    for shot in shots.iter_mut() {
        shot.commit_pass();
    }
    tests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::Target;
    use crate::sim::events::SoundCue;
    use crate::sim::hazards::FallingStar;
    use proptest::prelude::*;

    fn bounds() -> Vec2 {
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn ctx() -> FrameContext {
        FrameContext::new(DEFAULT_FPS, bounds())
    }

    fn falling(id: u32, x: f32, y: f32) -> Star {
        Star::Falling(FallingStar::at(id, Vec2::new(x, y), &ctx()))
    }

    fn health(star: &Star) -> i32 {
        match star {
            Star::Falling(s) => s.health(),
            Star::Shooting(_) => i32::MAX,
        }
    }

    fn run_pass(
        shots: &mut [Shot],
        stars: &mut [Star],
        boss: &mut Boss,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let grid = CollisionGrid::build(CELL_SIZE, shots, stars);
        resolve_projectiles(&grid, shots, stars, boss, player, &ctx(), events)
    }

    #[test]
    fn test_shot_hits_falling_star_once() {
        let mut shots = vec![Shot::new(1, Vec2::new(502.0, 520.0), bounds(), HitPolicy::FirstContact)];
        let mut stars = vec![falling(2, 500.0, 500.0)];
        let mut boss = Boss::new(bounds());
        let mut player = Player::new(bounds(), DEFAULT_FPS);
        let mut events = Vec::new();

        run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut events);

        assert!(shots[0].is_hit());
        assert_eq!(health(&stars[0]), 6 - shots[0].damage());
        let dings = events.iter().filter(|e| **e == GameEvent::Sound(SoundCue::StarDing)).count();
        assert_eq!(dings, 1);

        // A second pass must not apply damage again
        run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut events);
        assert_eq!(health(&stars[0]), 6 - shots[0].damage());
        assert_eq!(boss.health(), 400);
    }

    #[test]
    fn test_first_contact_versus_pass_wide() {
        let mut boss = Boss::new(bounds());
        let mut player = Player::new(bounds(), DEFAULT_FPS);
        let muzzle = Vec2::new(502.0, 520.0);

        let mut shots = vec![Shot::new(1, muzzle, bounds(), HitPolicy::FirstContact)];
        let mut stars = vec![falling(2, 500.0, 500.0), falling(3, 505.0, 500.0)];
        run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut Vec::new());
        let damaged = stars.iter().filter(|s| health(s) < 6).count();
        assert_eq!(damaged, 1);

        let mut shots = vec![Shot::new(1, muzzle, bounds(), HitPolicy::PassWide)];
        let mut stars = vec![falling(2, 500.0, 500.0), falling(3, 505.0, 500.0)];
        run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut Vec::new());
        assert!(stars.iter().all(|s| health(s) == 4));
        assert!(shots[0].is_hit());

        run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut Vec::new());
        assert!(stars.iter().all(|s| health(s) == 4));
    }

    #[test]
    fn test_distant_pairs_are_not_tested() {
        let mut shots = vec![Shot::new(1, Vec2::new(100.0, 900.0), bounds(), HitPolicy::FirstContact)];
        let mut stars = vec![falling(2, 1500.0, 150.0)];
        let mut boss = Boss::new(bounds());
        let mut player = Player::new(bounds(), DEFAULT_FPS);

        let tests = run_pass(&mut shots, &mut stars, &mut boss, &mut player, &mut Vec::new());

        // shot vs boss + star vs player
        assert_eq!(tests, 2);
        assert_eq!(health(&stars[0]), 6);
    }

    #[test]
    fn test_shot_hits_boss() {
        let mut boss = Boss::new(bounds());
        let core = boss.hitbox().rects()[0];
        let muzzle = Vec2::new(core.center().x, core.bottom() + 10.0);
        let mut shots = vec![Shot::new(1, muzzle, bounds(), HitPolicy::FirstContact)];
        let mut player = Player::new(bounds(), DEFAULT_FPS);
        let mut events = Vec::new();

        run_pass(&mut shots, &mut [], &mut boss, &mut player, &mut events);

        assert_eq!(boss.health(), 398);
        assert!(boss.is_hurt());
        assert!(events.contains(&GameEvent::Sound(SoundCue::BossHurt)));
    }

    #[test]
    fn test_star_hits_player() {
        let mut player = Player::new(bounds(), DEFAULT_FPS);
        let at = player.hitbox().center();
        let mut stars = vec![falling(1, at.x, at.y)];
        let mut boss = Boss::new(bounds());
        let mut events = Vec::new();

        run_pass(&mut [], &mut stars, &mut boss, &mut player, &mut events);
        run_pass(&mut [], &mut stars, &mut boss, &mut player, &mut events);

        assert_eq!(player.health(), 250 - 5);
        assert!(player.is_hurt());
        let hurts = events.iter().filter(|e| **e == GameEvent::Sound(SoundCue::PlayerHurt)).count();
        assert_eq!(hurts, 1);
    }

    #[test]
    fn test_inactive_projectiles_are_skipped() {
        let mut star = FallingStar::at(1, Vec2::new(300.0, 300.0), &ctx());
        star.take_damage(100);
        star.logic(&ctx(), &mut Vec::new());
        let stars = vec![Star::Falling(star)];
        let grid = CollisionGrid::build(CELL_SIZE, &[], &stars);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_neighborhood_spans_adjacent_cells() {
        let mut grid = CollisionGrid::new(CELL_SIZE);
        grid.insert(ProjectileRef::Shot(0), Vec2::new(150.0, 150.0));
        grid.insert(ProjectileRef::Star(0), Vec2::new(250.0, 250.0));
        grid.insert(ProjectileRef::Star(1), Vec2::new(350.0, 150.0));
        let near: Vec<_> = grid.neighborhood((1, 1)).collect();
        assert_eq!(near, vec![ProjectileRef::Shot(0), ProjectileRef::Star(0)]);
        assert_eq!(grid.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_cell_contains_point(x in -2000i32..4000, y in -2000i32..4000) {
            let (x, y) = (x as f32, y as f32);
            let grid = CollisionGrid::new(CELL_SIZE);
            let (cx, cy) = grid.cell_of(Vec2::new(x, y));
            prop_assert!(cx as f32 * CELL_SIZE <= x && x < (cx + 1) as f32 * CELL_SIZE);
            prop_assert!(cy as f32 * CELL_SIZE <= y && y < (cy + 1) as f32 * CELL_SIZE);
        }
    }
}
