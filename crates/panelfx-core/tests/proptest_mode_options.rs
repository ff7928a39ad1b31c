//! Property tests for mode tags and option parsing.
//!
//! 1. `next` and `prev` are inverse and cycle through every tag.
//! 2. Tag names parse back case-insensitively.
//! 3. Arbitrary option strings never fail an update: unknown values fall
//!    back to the default and known values are kept.

use panelfx_core::{MazeSpeed, ModeOptions, ModeOptionsUpdate, ModeTag};
use proptest::prelude::*;
use serde_json::json;

fn any_mode() -> impl Strategy<Value = ModeTag> {
    (0..ModeTag::COUNT).prop_map(|i| ModeTag::ALL[i])
}

proptest! {
    #[test]
    fn next_prev_inverse(mode in any_mode()) {
        prop_assert_eq!(mode.next().prev(), mode);
        prop_assert_eq!(mode.prev().next(), mode);
        let mut tag = mode;
        for _ in 0..ModeTag::COUNT {
            tag = tag.next();
        }
        prop_assert_eq!(tag, mode);
    }

    #[test]
    fn names_parse_back(mode in any_mode(), upper in any::<bool>()) {
        let name = if upper {
            mode.as_str().to_ascii_uppercase()
        } else {
            mode.as_str().to_string()
        };
        prop_assert_eq!(name.parse::<ModeTag>().ok(), Some(mode));
    }

    #[test]
    fn option_strings_are_lenient(raw in "[a-zA-Z]{0,8}") {
        let update = ModeOptionsUpdate::from_json(ModeTag::Maze, &json!({ "mazeSpeed": raw }));
        let mut options = ModeOptions::default();
        if let Some(update) = update {
            options.apply(update);
        }
        let expected = raw.parse::<MazeSpeed>().unwrap_or_default();
        prop_assert_eq!(options.maze.speed, expected);
    }
}
