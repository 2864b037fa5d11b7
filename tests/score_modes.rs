//! Integration tests for the score-based modes (race and powerwash).

use dice_arena::{
    create_rng, ArenaResult, DieId, DieKind, Direction, GameConfig, GameEngine, GameEvent, GameMode,
    LevelData, MatchRunner, Position, TileValue, WorldGrid,
};

fn roll_and_land(engine: &mut GameEngine, die: DieId, direction: Direction) -> bool {
    let accepted = engine.roll(die, direction);
    engine.finish_roll(die);
    accepted
}

/// Rolling right from the standard orientation lands 5, then 3, then 2.
fn collector_lane(powerups_elsewhere: i32) -> WorldGrid {
    let mut grid = WorldGrid::new(6, 2);
    grid.set(Position::new(1, 0), TileValue::Powerup(5));
    grid.set(Position::new(2, 0), TileValue::Powerup(3));
    grid.set(Position::new(3, 0), TileValue::Powerup(2));
    for x in 0..powerups_elsewhere {
        grid.set(Position::new(x, 1), TileValue::Powerup(6));
    }
    grid
}

#[test]
fn test_powerwash_third_pickup_wins() -> ArenaResult<()> {
    let grid = collector_lane(3);
    let mut engine = GameEngine::new(grid, GameConfig::for_testing(GameMode::Powerwash))?;
    assert_eq!(engine.powerup_goal(), 3);

    let collector = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 0));
    let rival = engine.spawn_die(DieKind::PlayerTwo, Position::new(5, 1));
    let enemy = engine.spawn_die(DieKind::Enemy, Position::new(5, 0));

    assert!(roll_and_land(&mut engine, collector, Direction::Right));
    assert!(roll_and_land(&mut engine, collector, Direction::Right));
    assert!(!engine.is_finished());
    assert!(engine.roll(collector, Direction::Right));

    assert!(engine.is_finished());
    assert_eq!(engine.winner(), Some(collector));
    assert!(engine.die(rival).unwrap().is_dead());
    assert!(engine.die(enemy).unwrap().is_dead());
    assert!(engine.die(collector).unwrap().charged().is_empty());

    let events = engine.take_events();
    assert!(events.contains(&GameEvent::ScoreChanged {
        die: collector,
        score: 3
    }));
    assert!(events.contains(&GameEvent::GameFinished {
        winner: Some(collector),
        winner_kind: Some(DieKind::PlayerOne)
    }));
    Ok(())
}

#[test]
fn test_powerwash_goal_rounds_up() -> ArenaResult<()> {
    // Three lane powerups plus two more: ceil(5 / 2) = 3.
    let grid = collector_lane(2);
    let engine = GameEngine::new(grid, GameConfig::for_testing(GameMode::Powerwash))?;
    assert_eq!(engine.powerup_goal(), 3);
    Ok(())
}

#[test]
fn test_powerwash_level_seeds_open_cells() -> ArenaResult<()> {
    let level = LevelData::parse("#....#\n#1..2#\n#....#")?;
    let mut rng = create_rng(3);
    let engine = GameEngine::from_level(&level, GameConfig::for_testing(GameMode::Powerwash), &mut rng)?;

    assert_eq!(engine.grid().powerup_count(), level.open_cells.len());
    assert_eq!(engine.powerup_goal(), (level.open_cells.len() as u32).div_ceil(2));
    for spawn in &level.spawns {
        assert_eq!(engine.grid().get(spawn.position), Some(TileValue::Empty));
    }
    Ok(())
}

#[test]
fn test_race_goal_from_config() -> ArenaResult<()> {
    let mut config = GameConfig::for_testing(GameMode::Race);
    config.race_goal = 2;
    let mut engine = GameEngine::new(collector_lane(0), config)?;
    let racer = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 0));
    let rival = engine.spawn_die(DieKind::PlayerTwo, Position::new(5, 1));

    assert!(roll_and_land(&mut engine, racer, Direction::Right));
    assert!(engine.die(racer).unwrap().is_charged(5));
    assert!(roll_and_land(&mut engine, racer, Direction::Right));

    assert_eq!(engine.winner(), Some(racer));
    assert!(engine.die(rival).unwrap().is_dead());
    Ok(())
}

#[test]
fn test_race_stun_blocks_and_expires() -> ArenaResult<()> {
    let mut grid = WorldGrid::new(12, 3);
    grid.set(Position::new(1, 1), TileValue::Powerup(5));
    let mut engine = GameEngine::new(grid, GameConfig::for_testing(GameMode::Race))?;
    let shooter = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 1));
    for _ in 0..3 {
        assert!(roll_and_land(&mut engine, shooter, Direction::Right));
    }
    let target = engine.spawn_die(DieKind::PlayerTwo, Position::new(8, 1));

    assert!(engine.activate_powerup(shooter));
    assert!(engine.die(target).unwrap().is_stunned());
    assert_eq!(engine.die(target).unwrap().health(), 3);
    assert!(!engine.is_finished());

    let stun = engine.config().stun_duration;
    engine.update(stun / 2.0);
    assert!(!engine.roll(target, Direction::Up));
    engine.update(stun);
    assert!(!engine.die(target).unwrap().is_stunned());
    assert!(engine.roll(target, Direction::Up));
    Ok(())
}

#[test]
fn test_race_match_eventually_scores() -> ArenaResult<()> {
    let level = LevelData::parse("#######\n#1...2#\n#.....#\n#######")?;
    let mut config = GameConfig::for_testing(GameMode::Race);
    config.powerup_spawn_interval = 0.5;
    config.race_goal = 1;
    let mut runner = MatchRunner::ai_match(&level, config)?;
    let outcome = runner.run_until_finished(60 * 120, 1.0 / 60.0);

    assert!(outcome.statistics.powerups_spawned > 0);
    if outcome.finished {
        assert_eq!(outcome.statistics.powerups_collected, 1);
        assert!(outcome.winner.is_some());
    }
    Ok(())
}
