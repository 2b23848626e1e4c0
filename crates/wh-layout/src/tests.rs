//! Unit tests for wh-layout.

use wh_core::{Position, RobotId};

use crate::{Layout, LayoutError};

fn warehouse() -> Layout {
    Layout::bordered("test", 6)
        .with_robot(1, Position::new(1, 1))
        .with_robot(2, Position::new(4, 4))
        .with_task("A", Position::new(2, 3))
        .with_task("B", Position::new(3, 1))
}

#[cfg(test)]
mod generator_tests {
    use super::*;

    #[test]
    fn default_layout_is_bordered_20x20() {
        let layout = Layout::default_layout();
        assert_eq!(layout.layout_name, "new_warehouse");
        assert_eq!(layout.grid_size.width, 20);
        assert_eq!(layout.grid_size.height, 20);
        assert_eq!(layout.map_data.len(), 20);
        assert!(layout.robots.is_empty());
        assert!(layout.task_pool.is_empty());

        for (y, row) in layout.map_data.iter().enumerate() {
            assert_eq!(row.len(), 20);
            for (x, &code) in row.iter().enumerate() {
                let border = x == 0 || y == 0 || x == 19 || y == 19;
                assert_eq!(code, if border { 1 } else { 0 }, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn default_layout_is_deterministic() {
        assert_eq!(Layout::default_layout(), Layout::default_layout());
    }

    #[test]
    fn default_layout_validates() {
        let grid = Layout::default_layout().validate().unwrap();
        assert_eq!(grid.traversable_count(), 18 * 18);
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn valid_layout_passes() {
        assert!(warehouse().validate().is_ok());
    }

    #[test]
    fn zero_robot_id_rejected() {
        let layout = warehouse().with_robot(0, Position::new(2, 2));
        assert!(matches!(layout.validate(), Err(LayoutError::InvalidRobotId(RobotId(0)))));
    }

    #[test]
    fn duplicate_robot_rejected() {
        let layout = warehouse().with_robot(1, Position::new(2, 2));
        assert!(matches!(layout.validate(), Err(LayoutError::DuplicateRobot(RobotId(1)))));
    }

    #[test]
    fn shared_spawn_rejected() {
        let layout = warehouse().with_robot(3, Position::new(1, 1));
        assert!(matches!(layout.validate(), Err(LayoutError::SharedSpawn { .. })));
    }

    #[test]
    fn robot_on_obstacle_rejected() {
        let layout = warehouse().with_robot(3, Position::new(0, 0));
        assert!(matches!(layout.validate(), Err(LayoutError::Blocked { .. })));
    }

    #[test]
    fn task_out_of_bounds_rejected() {
        let layout = warehouse().with_task("C", Position::new(9, 2));
        assert!(matches!(layout.validate(), Err(LayoutError::OutOfBounds { .. })));
    }

    #[test]
    fn duplicate_task_rejected() {
        let layout = warehouse().with_task("A", Position::new(1, 2));
        assert!(matches!(layout.validate(), Err(LayoutError::DuplicateTask(_))));
    }

    #[test]
    fn malformed_map_rejected() {
        let mut layout = warehouse();
        layout.map_data.pop();
        assert!(matches!(layout.validate(), Err(LayoutError::Grid(_))));
    }
}

#[cfg(test)]
mod json_tests {
    use super::*;
    use crate::load_str;

    #[test]
    fn field_names_match_document_format() {
        let json = serde_json::to_value(warehouse()).unwrap();
        assert_eq!(json["layout_name"], "test");
        assert_eq!(json["grid_size"]["width"], 6);
        assert_eq!(json["robots"][0]["id"], 1);
        // [row, col]
        assert_eq!(json["robots"][1]["spawn_pos"], serde_json::json!([4, 4]));
        assert_eq!(json["task_pool"][1]["item_id"], "B");
        assert_eq!(json["task_pool"][1]["pos"], serde_json::json!([1, 3]));
    }

    #[test]
    fn parses_document_without_robots_or_tasks() {
        let layout = load_str(
            r#"{"layout_name":"tiny","grid_size":{"width":2,"height":1},"map_data":[[0,0]]}"#,
        )
        .unwrap();
        assert!(layout.robots.is_empty());
        assert!(layout.task_pool.is_empty());
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(load_str("{not json"), Err(LayoutError::Parse(_))));
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::{FileLayoutStore, LayoutStore, MemoryLayoutStore};

    #[test]
    fn file_round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLayoutStore::new(dir.path());
        let layout = warehouse();
        store.save(&layout, "x").unwrap();
        assert!(dir.path().join("x.json").exists());
        assert_eq!(store.load("x").unwrap(), layout);
    }

    #[test]
    fn explicit_json_extension_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLayoutStore::new(dir.path());
        store.save(&warehouse(), "main.json").unwrap();
        assert!(dir.path().join("main.json").exists());
        assert_eq!(store.load("main").unwrap(), warehouse());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLayoutStore::new(dir.path().join("data").join("layouts"));
        store.save(&warehouse(), "nested").unwrap();
        assert!(dir.path().join("data/layouts/nested.json").exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLayoutStore::new(dir.path());
        assert!(matches!(store.load("nope"), Err(LayoutError::NotFound(n)) if n == "nope"));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "[1, 2").unwrap();
        let store = FileLayoutStore::new(dir.path());
        assert!(matches!(store.load("bad"), Err(LayoutError::Parse(_))));
    }

    #[test]
    fn path_of_is_absolute() {
        let store = FileLayoutStore::new("relative/layouts");
        let path = store.path_of("w").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("relative/layouts/w.json"));
    }

    #[test]
    fn memory_round_trip() {
        let store = MemoryLayoutStore::new();
        assert!(store.is_empty());
        store.save(&warehouse(), "x").unwrap();
        assert_eq!(store.load("x").unwrap(), warehouse());
        assert!(matches!(store.load("y"), Err(LayoutError::NotFound(_))));
        assert!(store.path_of("x").is_none());
    }
}
