//! Movement: destination computation and collision arbitration
//!
//! Destinations are computed at decision time and locked into the action.
//! Resolution only decides who actually gets to enter each cell.

use std::cmp::{Ordering, Reverse};

use ahash::AHashSet;

use crate::battle::action::ActionKind;
use crate::battle::character::{slot_order, Character, CharacterId};
use crate::battle::event::GameEvent;
use crate::battle::hex::{HexGrid, Position};
use crate::battle::pathfinding::find_path;
use crate::battle::resolution::ResolutionResult;
use crate::battle::skill::MovementBehavior;
use crate::core::rng::{pick_index, RngState};
use crate::core::types::Tick;

/// Cells occupied by every character not listed in `exclude`
pub fn occupied_cells(all: &[Character], exclude: &[&CharacterId]) -> AHashSet<Position> {
    all.iter()
        .filter(|c| !exclude.contains(&&c.id))
        .map(|c| c.position)
        .collect()
}

/// Unoccupied on-board neighbors of a cell (0-6)
pub fn escape_routes(cell: Position, obstacles: &AHashSet<Position>, grid: &HexGrid) -> u32 {
    grid.neighbors(cell)
        .filter(|n| !obstacles.contains(n))
        .count() as u32
}

/// Stay put plus every free on-board neighbor
fn step_candidates(
    from: Position,
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Vec<Position> {
    let mut candidates = vec![from];
    candidates.extend(grid.neighbors(from).filter(|n| !obstacles.contains(n)));
    candidates
}

/// One step along the shortest path; stays when adjacent or unreachable
fn step_towards(
    from: Position,
    goal: Position,
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Position {
    match find_path(grid, from, goal, obstacles) {
        Some(path) if path.len() > 2 => path[1],
        _ => from,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FleeScore {
    score: u32,
    distance: u32,
    dq: u32,
    dr: u32,
    cell: Position,
}

impl Ord for FleeScore {
    // Greater is better
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then(self.distance.cmp(&other.distance))
            .then(self.dq.cmp(&other.dq))
            .then(self.dr.cmp(&other.dr))
            .then(other.cell.r.cmp(&self.cell.r))
            .then(other.cell.q.cmp(&self.cell.q))
    }
}

impl PartialOrd for FleeScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best single step away from a threat
///
/// Score is `distance × escape_routes`, so a far cell in a dead end loses to a
/// slightly closer cell with room to keep running.
fn step_away(
    from: Position,
    threat: Position,
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Position {
    step_candidates(from, obstacles, grid)
        .into_iter()
        .map(|cell| {
            let distance = cell.distance(&threat);
            FleeScore {
                score: distance * escape_routes(cell, obstacles, grid),
                distance,
                dq: (cell.q - threat.q).unsigned_abs(),
                dr: (cell.r - threat.r).unsigned_abs(),
                cell,
            }
        })
        .max()
        .map(|best| best.cell)
        .unwrap_or(from)
}

/// Best single step away from a group: nearest threat dominates
fn step_away_from_group(
    from: Position,
    threats: &[Position],
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Position {
    if threats.is_empty() {
        return from;
    }

    step_candidates(from, obstacles, grid)
        .into_iter()
        .max_by_key(|cell| {
            let nearest = threats.iter().map(|t| cell.distance(t)).min().unwrap_or(0);
            let total: u32 = threats.iter().map(|t| cell.distance(t)).sum();
            (
                nearest * escape_routes(*cell, obstacles, grid),
                nearest,
                total,
                Reverse(*cell),
            )
        })
        .unwrap_or(from)
}

/// Best single step closing on a group: minimise summed distance
fn step_towards_group(
    from: Position,
    members: &[Position],
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Position {
    if members.is_empty() {
        return from;
    }

    step_candidates(from, obstacles, grid)
        .into_iter()
        .min_by_key(|cell| {
            let total: u32 = members.iter().map(|m| cell.distance(m)).sum();
            // Staying wins ties so a settled group does not jitter
            (total, *cell != from, *cell)
        })
        .unwrap_or(from)
}

/// Repeat a single-step function, stopping early when it makes no progress
fn iterate_steps(
    from: Position,
    steps: u32,
    mut step: impl FnMut(Position) -> Position,
) -> Position {
    let mut current = from;
    for _ in 0..steps {
        let next = step(current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One-hex destination for moving relative to a single target
pub fn compute_move_destination(
    mover: &Character,
    target: &Character,
    behavior: MovementBehavior,
    all: &[Character],
    grid: &HexGrid,
) -> Position {
    compute_multi_step_destination(mover, target, behavior, 1, all, grid)
}

/// Destination after up to `distance` single steps relative to a target
pub fn compute_multi_step_destination(
    mover: &Character,
    target: &Character,
    behavior: MovementBehavior,
    distance: u32,
    all: &[Character],
    grid: &HexGrid,
) -> Position {
    match behavior {
        MovementBehavior::Towards => {
            // Mover and target never block the search, so adjacency is reachable
            let obstacles = occupied_cells(all, &[&mover.id, &target.id]);
            iterate_steps(mover.position, distance, |from| {
                step_towards(from, target.position, &obstacles, grid)
            })
        }
        MovementBehavior::Away => {
            let obstacles = occupied_cells(all, &[&mover.id]);
            iterate_steps(mover.position, distance, |from| {
                step_away(from, target.position, &obstacles, grid)
            })
        }
        MovementBehavior::Hold => mover.position,
    }
}

/// Destination after up to `distance` steps relative to a whole group
///
/// Away flees the group (regrouping away from enemies); towards closes on it.
pub fn compute_group_move_destination(
    mover: &Character,
    group: &[&Character],
    behavior: MovementBehavior,
    distance: u32,
    all: &[Character],
    grid: &HexGrid,
) -> Position {
    let members: Vec<Position> = group
        .iter()
        .filter(|c| c.id != mover.id)
        .map(|c| c.position)
        .collect();
    let obstacles = occupied_cells(all, &[&mover.id]);

    match behavior {
        MovementBehavior::Towards => iterate_steps(mover.position, distance, |from| {
            step_towards_group(from, &members, &obstacles, grid)
        }),
        MovementBehavior::Away => iterate_steps(mover.position, distance, |from| {
            step_away_from_group(from, &members, &obstacles, grid)
        }),
        MovementBehavior::Hold => mover.position,
    }
}

/// Greedy straight-line charge toward a target cell
///
/// The target's cell stays an obstacle, so the charger ends adjacent at best.
/// Halts as soon as no free neighbor strictly reduces the distance.
pub fn compute_charge_destination(
    from: Position,
    target: Position,
    distance: u32,
    obstacles: &AHashSet<Position>,
    grid: &HexGrid,
) -> Position {
    let mut current = from;
    for _ in 0..distance {
        let current_distance = current.distance(&target);
        if current_distance <= 1 {
            break;
        }

        let best = grid
            .neighbors(current)
            .filter(|n| *n != target && !obstacles.contains(n))
            .min_by_key(|n| (n.distance(&target), *n));

        match best {
            Some(next) if next.distance(&target) < current_distance => current = next,
            _ => break,
        }
    }
    current
}

/// Resolve every move action completing this tick
///
/// Any character standing on a destination in the pre-move snapshot blocks all
/// movers to it without touching the RNG. Two or more movers contesting a free
/// cell cost exactly one draw, whatever their number.
pub fn resolve_movement(
    characters: &[Character],
    tick: Tick,
    rng_state: &RngState,
) -> ResolutionResult {
    let mut updated = characters.to_vec();
    let mut rng = rng_state.clone();
    let mut outcomes: Vec<(u32, GameEvent)> = Vec::new();

    let snapshot: AHashSet<Position> = characters.iter().map(|c| c.position).collect();

    // Destinations in order of each group's first (lowest-slot) mover
    let mut groups: Vec<(Position, Vec<usize>)> = Vec::new();
    for idx in slot_order(characters) {
        let character = &characters[idx];
        let Some(action) = &character.current_action else {
            continue;
        };
        if !matches!(action.kind, ActionKind::Move { .. }) || !action.resolves_at(tick) {
            continue;
        }
        if action.target_cell == character.position {
            continue;
        }

        match groups.iter_mut().find(|(cell, _)| *cell == action.target_cell) {
            Some((_, movers)) => movers.push(idx),
            None => groups.push((action.target_cell, vec![idx])),
        }
    }

    for (destination, movers) in groups {
        let winner = if snapshot.contains(&destination) {
            tracing::debug!(tick, ?destination, movers = movers.len(), "destination blocked");
            None
        } else if movers.len() == 1 {
            Some(movers[0])
        } else {
            let (index, next) = pick_index(&rng, movers.len());
            rng = next;
            tracing::debug!(
                tick,
                ?destination,
                contestants = movers.len(),
                index,
                "collision arbitrated"
            );
            Some(movers[index])
        };

        for idx in movers {
            let from = characters[idx].position;
            let moved = winner == Some(idx);
            if moved {
                updated[idx].position = destination;
            }
            outcomes.push((
                characters[idx].slot_position,
                GameEvent::Movement {
                    tick,
                    character_id: characters[idx].id.clone(),
                    from,
                    to: if moved { destination } else { from },
                    collided: !moved,
                },
            ));
        }
    }

    outcomes.sort_by_key(|(slot, _)| *slot);

    ResolutionResult {
        characters: updated,
        events: outcomes.into_iter().map(|(_, e)| e).collect(),
        rng_state: rng,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::Action;
    use crate::battle::character::Faction;
    use crate::battle::skill::{ActionType, Skill};
    use crate::core::rng::{init_rng, next_random};

    fn character(id: &str, faction: Faction, q: i32, r: i32, slot: u32) -> Character {
        Character::new(id, id, faction, Position::new(q, r), 100, slot)
    }

    fn moving_to(mut c: Character, destination: Position, tick: Tick) -> Character {
        let skill = Skill::new("move", "Move", ActionType::Move)
            .with_behavior(MovementBehavior::Towards)
            .with_tick_cost(0);
        c.current_action = Some(Action::from_skill(
            ActionKind::Move {
                behavior: MovementBehavior::Towards,
            },
            &skill,
            destination,
            None,
            tick,
        ));
        c
    }

    #[test]
    fn test_towards_takes_first_path_step() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let target = character("t", Faction::Enemy, 3, 0, 1);
        let all = vec![mover.clone(), target.clone()];

        let dest =
            compute_move_destination(&mover, &target, MovementBehavior::Towards, &all, &grid);
        assert_eq!(dest, Position::new(1, 0));
    }

    #[test]
    fn test_towards_stays_when_adjacent() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let target = character("t", Faction::Enemy, 1, 0, 1);
        let all = vec![mover.clone(), target.clone()];

        let dest =
            compute_move_destination(&mover, &target, MovementBehavior::Towards, &all, &grid);
        assert_eq!(dest, mover.position);
    }

    #[test]
    fn test_towards_stays_when_unreachable() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let target = character("t", Faction::Enemy, 3, -1, 1);
        let mut all = vec![mover.clone(), target.clone()];
        for (i, n) in target.position.neighbors().iter().enumerate() {
            all.push(character(&format!("wall{}", i), Faction::Enemy, n.q, n.r, 10 + i as u32));
        }

        let dest =
            compute_move_destination(&mover, &target, MovementBehavior::Towards, &all, &grid);
        assert_eq!(dest, mover.position);
    }

    #[test]
    fn test_towards_routes_around_blocker() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let blocker = character("b", Faction::Friendly, 1, 0, 1);
        let target = character("t", Faction::Enemy, 2, 0, 2);
        let all = vec![mover.clone(), blocker, target.clone()];

        let dest =
            compute_move_destination(&mover, &target, MovementBehavior::Towards, &all, &grid);
        assert_ne!(dest, Position::new(1, 0));
        assert!(dest.is_adjacent(&mover.position));
        assert_eq!(dest.distance(&target.position), 2);
    }

    #[test]
    fn test_away_prefers_distance_times_routes() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let threat = character("t", Faction::Enemy, 1, 0, 1);
        let all = vec![mover.clone(), threat.clone()];

        let dest = compute_move_destination(&mover, &threat, MovementBehavior::Away, &all, &grid);
        // (-1,0), (0,-1) and (-1,1) all score 2 × 6; |Δq| then |Δr| pick (-1,1)
        assert_eq!(dest, Position::new(-1, 1));
    }

    #[test]
    fn test_away_avoids_dead_end() {
        let grid = HexGrid::new(2);
        // Mover near the edge; the far corner has fewer escape routes
        let mover = character("m", Faction::Friendly, -1, 0, 0);
        let threat = character("t", Faction::Enemy, 0, 0, 1);
        let all = vec![mover.clone(), threat.clone()];
        let obstacles = occupied_cells(&all, &[&mover.id]);

        let dest = compute_move_destination(&mover, &threat, MovementBehavior::Away, &all, &grid);
        let score = |cell: Position| {
            cell.distance(&threat.position) * escape_routes(cell, &obstacles, &grid)
        };
        for candidate in step_candidates(mover.position, &obstacles, &grid) {
            assert!(score(dest) >= score(candidate));
        }
    }

    #[test]
    fn test_away_tie_breaks_on_axis_deltas() {
        let grid = HexGrid::new(5);
        let from = Position::new(0, 0);
        let threat = Position::new(0, 1);
        let obstacles: AHashSet<Position> = [threat].into_iter().collect();

        let dest = step_away(from, threat, &obstacles, &grid);
        // Three cells tie at 2 × 6; (1,-1) has the largest |Δq| and |Δr|
        assert_eq!(dest, Position::new(1, -1));
    }

    #[test]
    fn test_multi_step_stops_when_blocked() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let target = character("t", Faction::Enemy, 4, 0, 1);
        let all = vec![mover.clone(), target.clone()];

        let dest = compute_multi_step_destination(
            &mover,
            &target,
            MovementBehavior::Towards,
            10,
            &all,
            &grid,
        );
        assert_eq!(dest, Position::new(3, 0));
    }

    #[test]
    fn test_group_flee_moves_away_from_nearest() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, 0, 0, 0);
        let a = character("a", Faction::Enemy, 2, 0, 1);
        let b = character("b", Faction::Enemy, 2, -1, 2);
        let all = vec![mover.clone(), a.clone(), b.clone()];

        let dest = compute_group_move_destination(
            &mover,
            &[&a, &b],
            MovementBehavior::Away,
            1,
            &all,
            &grid,
        );
        let nearest_before = [a.position, b.position]
            .iter()
            .map(|p| mover.position.distance(p))
            .min();
        let nearest_after = [a.position, b.position].iter().map(|p| dest.distance(p)).min();
        assert!(nearest_after > nearest_before);
    }

    #[test]
    fn test_group_regroup_closes_distance() {
        let grid = HexGrid::new(5);
        let mover = character("m", Faction::Friendly, -3, 0, 0);
        let a = character("a", Faction::Friendly, 2, 0, 1);
        let b = character("b", Faction::Friendly, 2, 1, 2);
        let all = vec![mover.clone(), a.clone(), b.clone()];

        let dest = compute_group_move_destination(
            &mover,
            &[&a, &b],
            MovementBehavior::Towards,
            2,
            &all,
            &grid,
        );
        assert_eq!(mover.position.distance(&dest), 2);
    }

    #[test]
    fn test_charge_destination_stops_adjacent() {
        let grid = HexGrid::new(5);
        let target = Position::new(3, 0);
        let obstacles: AHashSet<Position> = [target].into_iter().collect();

        let dest = compute_charge_destination(Position::ORIGIN, target, 3, &obstacles, &grid);
        assert_eq!(dest, Position::new(2, 0));
    }

    #[test]
    fn test_charge_destination_limited_by_distance() {
        let grid = HexGrid::new(5);
        let target = Position::new(5, 0);
        let obstacles: AHashSet<Position> = [target].into_iter().collect();

        let dest = compute_charge_destination(Position::new(-2, 0), target, 3, &obstacles, &grid);
        assert_eq!(dest, Position::new(1, 0));
    }

    #[test]
    fn test_charge_halts_without_progress() {
        let grid = HexGrid::new(5);
        let target = Position::new(3, 0);
        // Wall every neighbor of the charger that would close the gap
        let obstacles: AHashSet<Position> =
            [target, Position::new(1, 0), Position::new(1, -1), Position::new(0, 1)]
                .into_iter()
                .collect();

        let dest = compute_charge_destination(Position::ORIGIN, target, 3, &obstacles, &grid);
        assert_eq!(dest, Position::ORIGIN);
    }

    #[test]
    fn test_single_mover_moves_without_rng() {
        let rng = init_rng(1);
        let roster = vec![moving_to(
            character("m", Faction::Friendly, 0, 0, 0),
            Position::new(1, 0),
            0,
        )];

        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.characters[0].position, Position::new(1, 0));
        assert_eq!(result.rng_state, rng);
        assert_eq!(
            result.events,
            vec![GameEvent::Movement {
                tick: 0,
                character_id: "m".into(),
                from: Position::ORIGIN,
                to: Position::new(1, 0),
                collided: false,
            }]
        );
    }

    #[test]
    fn test_two_movers_one_winner_one_draw() {
        let rng = init_rng(5);
        let roster = vec![
            moving_to(character("a", Faction::Friendly, 1, 0, 0), Position::ORIGIN, 0),
            moving_to(character("b", Faction::Enemy, 0, 1, 1), Position::ORIGIN, 0),
        ];

        let result = resolve_movement(&roster, 0, &rng);
        let at_origin = result
            .characters
            .iter()
            .filter(|c| c.position == Position::ORIGIN)
            .count();
        assert_eq!(at_origin, 1);
        assert_eq!(result.rng_state, next_random(&rng).1);

        let collided: Vec<_> = result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Movement { collided: true, .. }))
            .collect();
        assert_eq!(collided.len(), 1);
        // The loser stays where it was
        let loser = result.characters.iter().find(|c| c.position != Position::ORIGIN).unwrap();
        let original = roster.iter().find(|c| c.id == loser.id).unwrap();
        assert_eq!(loser.position, original.position);
    }

    #[test]
    fn test_many_movers_single_draw() {
        let rng = init_rng(8);
        let roster: Vec<Character> = Position::ORIGIN
            .neighbors()
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let c = character(&format!("m{}", i), Faction::Friendly, n.q, n.r, i as u32);
                moving_to(c, Position::ORIGIN, 0)
            })
            .collect();

        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.rng_state, next_random(&rng).1);
        assert_eq!(
            result.characters.iter().filter(|c| c.position == Position::ORIGIN).count(),
            1
        );
    }

    #[test]
    fn test_blocker_wins_without_rng() {
        let rng = init_rng(2);
        let roster = vec![
            character("blocker", Faction::Enemy, 0, 0, 0),
            moving_to(character("a", Faction::Friendly, 1, 0, 1), Position::ORIGIN, 0),
            moving_to(character("b", Faction::Friendly, 0, 1, 2), Position::ORIGIN, 0),
            moving_to(character("c", Faction::Friendly, -1, 0, 3), Position::ORIGIN, 0),
        ];

        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.rng_state, rng);
        assert_eq!(result.characters[0].position, Position::ORIGIN);
        for (before, after) in roster.iter().zip(&result.characters).skip(1) {
            assert_eq!(before.position, after.position);
        }
        assert!(result
            .events
            .iter()
            .all(|e| matches!(e, GameEvent::Movement { collided: true, .. })));
    }

    #[test]
    fn test_no_chained_movement_into_vacated_cell() {
        let rng = init_rng(3);
        let roster = vec![
            moving_to(character("lead", Faction::Friendly, 1, 0, 0), Position::new(2, 0), 0),
            moving_to(character("follow", Faction::Friendly, 0, 0, 1), Position::new(1, 0), 0),
        ];

        let result = resolve_movement(&roster, 0, &rng);
        assert_eq!(result.characters[0].position, Position::new(2, 0));
        assert_eq!(result.characters[1].position, Position::ORIGIN);
    }

    #[test]
    fn test_resolve_movement_ignores_other_ticks() {
        let rng = init_rng(4);
        let roster = vec![moving_to(
            character("m", Faction::Friendly, 0, 0, 0),
            Position::new(1, 0),
            5,
        )];

        let result = resolve_movement(&roster, 4, &rng);
        assert_eq!(result.characters, roster);
        assert!(result.events.is_empty());
    }
}
