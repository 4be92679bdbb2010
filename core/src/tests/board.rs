use super::*;
use crate::board::TileCategory;
use crate::error::GameError;

#[test]
fn test_layout_and_categories() {
    let world = create_world();
    let board = &world.board;
    assert_eq!(board.tiles().len(), 8 * 8 + 8);
    assert_eq!(board.category(tile(&world, 0, 0)), Some(TileCategory::PlayerZone));
    assert_eq!(board.category(tile(&world, 7, 3)), Some(TileCategory::PlayerZone));
    assert_eq!(board.category(tile(&world, 0, 4)), Some(TileCategory::EnemyZone));
    assert_eq!(board.enemy_tile(2, 0), Some(tile(&world, 2, 4)));
    assert_eq!(board.enemy_tile(2, 4), None);
    assert_eq!(board.bench_capacity(), 8);
    let bench = board.bench_tile(0).unwrap();
    assert_eq!(board.category(bench), Some(TileCategory::Bench));
    assert_eq!(board.bench_tile(8), None);
}

#[test]
fn test_tile_ids_cover_largest_board() {
    // 255 x 256 zone tiles plus 255 bench slots uses every id below u16::MAX
    let board = BoardGrid::new(255, 128, 255).unwrap();
    assert_eq!(board.tiles().len(), 65_535);
    for (index, t) in board.tiles().iter().enumerate() {
        assert_eq!(t.id.0 as usize, index);
    }
    assert_eq!(board.tile_at(Coord::new(254, 255)), Some(TileId(65_279)));
    assert_eq!(board.enemy_tile(254, 127), Some(TileId(65_279)));
    assert_eq!(board.bench_tile(254), Some(TileId(65_534)));
}

#[test]
fn test_oversized_board_rejected() {
    assert_eq!(
        BoardGrid::new(255, 129, 0).err(),
        Some(GameError::InvalidBoardSize)
    );
    assert_eq!(
        BoardGrid::new(255, 255, 8).err(),
        Some(GameError::InvalidBoardSize)
    );
    assert_eq!(BoardGrid::new(0, 4, 8).err(), Some(GameError::InvalidBoardSize));
}

#[test]
fn test_deep_enemy_zone_rows() {
    let board = BoardGrid::new(2, 200, 0).unwrap();
    assert_eq!(board.enemy_tile(1, 100), board.tile_at(Coord::new(1, 300)));
    assert_eq!(board.enemy_tile(1, 199), Some(TileId(799)));
    assert_eq!(board.enemy_tile(0, 200), None);
}

#[test]
fn test_neighbors() {
    let world = create_world();
    let board = &world.board;
    assert_eq!(board.neighbors(tile(&world, 0, 0)).len(), 3);
    assert_eq!(board.neighbors(tile(&world, 3, 0)).len(), 5);
    assert_eq!(board.neighbors(tile(&world, 3, 3)).len(), 8);
    // Zones are adjacent across the middle line
    assert!(board
        .neighbors(tile(&world, 3, 3))
        .contains(&tile(&world, 3, 4)));
    // The bench is a parking structure
    assert!(board.neighbors(board.bench_tile(0).unwrap()).is_empty());
}

#[test]
fn test_place_moves_unit_in_one_step() {
    let mut world = create_world();
    let unit = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 1, 1);
    let from = tile(&world, 1, 1);
    let to = tile(&world, 2, 2);

    world.place(unit, to).unwrap();

    assert_eq!(world.board.occupant(from), None);
    assert_eq!(world.board.occupant(to), Some(unit));
    assert_eq!(world.units.get(unit).unwrap().tile, Some(to));
    let occupied = world
        .board
        .tiles()
        .iter()
        .filter(|t| t.occupant == Some(unit))
        .count();
    assert_eq!(occupied, 1);
}

#[test]
fn test_place_rejects_occupied_tile() {
    let mut world = create_world();
    let a = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 1, 1);
    let b = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 2, 1);

    let result = world.place(a, tile(&world, 2, 1));

    assert_eq!(result, Err(GameError::TileOccupied { tile: tile(&world, 2, 1) }));
    assert_eq!(world.units.get(a).unwrap().tile, Some(tile(&world, 1, 1)));
    assert_eq!(world.board.occupant(tile(&world, 2, 1)), Some(b));
}

#[test]
fn test_swap_updates_both_units_and_rosters() {
    let mut world = create_world();
    let on_zone = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 1, 1);
    let benched = spawn_on_bench(&mut world, create_melee(1, 10, 100), 0);
    assert_eq!(world.rosters.player_active, alloc::vec![on_zone]);

    world.swap(on_zone, benched).unwrap();

    let bench_tile = world.board.bench_tile(0).unwrap();
    assert_eq!(world.board.occupant(bench_tile), Some(on_zone));
    assert_eq!(world.board.occupant(tile(&world, 1, 1)), Some(benched));
    assert_eq!(world.rosters.player_active, alloc::vec![benched]);
}

#[test]
fn test_within_range_checks_each_axis() {
    let world = create_world();
    let board = &world.board;
    let origin = tile(&world, 3, 3);
    assert!(board.within_range(origin, tile(&world, 4, 4), 1));
    assert!(!board.within_range(origin, tile(&world, 5, 4), 1));
    assert!(board.within_range(origin, tile(&world, 6, 6), 3));
    assert!(!board.within_range(origin, tile(&world, 3, 7), 3));
}

#[test]
fn test_destroy_frees_tile_and_rosters() {
    let mut world = create_world();
    let unit = spawn_at(&mut world, Team::Player, create_melee(1, 10, 100), 1, 1);
    world.destroy(unit).unwrap();
    assert!(world.board.is_free(tile(&world, 1, 1)));
    assert!(world.rosters.player_active.is_empty());
    assert!(world.rosters.player_owned.is_empty());
    assert!(!world.units.contains(unit));
}
