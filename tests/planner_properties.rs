//! Planner and face-roll properties.

use dice_arena::{
    ArenaResult, DieKind, Direction, Faces, GameConfig, GameEngine, GameMode, Orientation,
    PathPlanner, Position, StateMachine, TileValue, WorldGrid,
};
use proptest::prelude::*;

fn battle_engine(grid: WorldGrid) -> ArenaResult<GameEngine> {
    GameEngine::new(grid, GameConfig::for_testing(GameMode::Battle))
}

#[test]
fn test_plan_to_powerup_three_cells_away() -> ArenaResult<()> {
    let mut grid = WorldGrid::new(7, 7);
    // Three rolls right from the standard orientation land face 2.
    let goal = Position::new(6, 3);
    grid.set(goal, TileValue::Powerup(2));
    let mut engine = battle_engine(grid)?;
    let die = engine.spawn_die(DieKind::PlayerOne, Position::new(3, 3));

    let plan = PathPlanner::default().plan(&engine, die, TileValue::is_powerup);
    assert_eq!(plan.len(), 3);

    for direction in plan {
        assert!(engine.roll(die, direction));
        engine.finish_roll(die);
    }
    assert_eq!(engine.die(die).unwrap().position(), goal);
    assert_eq!(engine.die(die).unwrap().powerups_collected(), 1);
    assert!(!engine.grid().has_powerups());
    Ok(())
}

#[test]
fn test_no_powerups_gives_empty_plan() -> ArenaResult<()> {
    let mut engine = battle_engine(WorldGrid::new(40, 40))?;
    let die = engine.spawn_die(DieKind::PlayerOne, Position::new(20, 20));

    let planner = PathPlanner::new(5000);
    let route = planner.search(&engine, die, TileValue::is_powerup);
    assert!(route.is_none());
    assert!(planner.plan(&engine, die, TileValue::is_powerup).is_empty());
    Ok(())
}

#[test]
fn test_plan_runs_on_snapshot() -> ArenaResult<()> {
    let mut grid = WorldGrid::new(5, 1);
    grid.set(Position::new(4, 0), TileValue::Powerup(1));
    let mut engine = battle_engine(grid)?;
    let die = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 0));

    let snapshot = engine.clone();
    let handle = std::thread::spawn(move || PathPlanner::default().plan(&snapshot, die, TileValue::is_powerup));
    let plan = handle.join().unwrap();

    // Rolling right four times from the standard orientation lands 5, 3, 2, 4: never 1.
    assert!(plan.is_empty());
    assert!(engine.roll(die, Direction::Right));
    Ok(())
}

#[test]
fn test_scripted_state_machine_never_fires_early() -> ArenaResult<()> {
    let mut fsm = StateMachine::new();
    fsm.add_state("attack", 3.0);
    fsm.add_transition("attack", "loop", "attack")?;
    fsm.set_state("attack")?;

    let mut fired_at = Vec::new();
    for tick in 1..=48 {
        fsm.update(0.25);
        // Hammer the transition every tick; only ready ticks count.
        if fsm.transition("loop") {
            fired_at.push(tick);
        }
        assert!(!fsm.transition("loop"));
    }
    assert_eq!(fired_at, vec![12, 24, 36, 48]);
    Ok(())
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn prop_faces_stay_a_permutation(rolls in prop::collection::vec(direction_strategy(), 0..64)) {
        let mut faces = Faces::STANDARD;
        for direction in rolls {
            faces.roll(direction);
            prop_assert!(faces.is_permutation());
        }
    }

    #[test]
    fn prop_inverse_roll_restores_state(
        rolls in prop::collection::vec(direction_strategy(), 0..32),
        last in direction_strategy(),
    ) {
        let mut state = Orientation::new(Position::new(0, 0), Faces::STANDARD);
        for direction in rolls {
            state = state.rolled(direction);
        }
        let back = state.rolled(last).rolled(last.inverse());
        prop_assert_eq!(back, state);
    }

    #[test]
    fn prop_opposite_faces_stay_opposite(rolls in prop::collection::vec(direction_strategy(), 0..64)) {
        let mut faces = Faces::STANDARD;
        let top_bottom = faces.top() + faces.bottom();
        for direction in rolls {
            faces.roll(direction);
        }
        // Every standard opposite pair sums to 7.
        prop_assert_eq!(faces.top() + faces.bottom(), top_bottom);
    }
}
