//! Scenarios shipped with the harness, written against the stock input test
//! content: a 550x400 canvas with a red button near the top-left corner and a
//! blue one near the bottom-right, tracing every mouse and key event it sees.
use crate::executor::keys::KeyInput;
use crate::perception::types::LogicalPoint;
use crate::scenario::state::{Scenario, Step};

const RED: LogicalPoint = LogicalPoint::new(50.0, 50.0);
const BLUE: LogicalPoint = LogicalPoint::new(500.0, 350.0);

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Tap red, tap blue, then drag from red to blue.
pub fn click_events() -> Scenario {
    Scenario {
        name: "click_events".to_string(),
        steps: vec![
            Step::Tap { at: RED },
            Step::Tap { at: BLUE },
            Step::Drag {
                from: RED,
                to: BLUE,
                steps: 100,
            },
        ],
        expected_trace: lines(&[
            "Test started!",
            "red received mouseDown",
            "red received mouseUp",
            "red received click",
            "blue received mouseDown",
            "blue received mouseUp",
            "blue received click",
            "red received mouseDown",
            "blue received mouseUp",
        ]),
    }
}

/// Press `a` then `b`.
pub fn key_events() -> Scenario {
    Scenario {
        name: "key_events".to_string(),
        steps: vec![
            Step::Key { key: KeyInput::Char('a') },
            Step::Key { key: KeyInput::Char('b') },
        ],
        expected_trace: lines(&[
            "Test started!",
            "keyDown: keyCode = 65, charCode = 97",
            "keyUp: keyCode = 65, charCode = 97",
            "keyDown: keyCode = 66, charCode = 98",
            "keyUp: keyCode = 66, charCode = 98",
        ]),
    }
}

pub fn all() -> Vec<Scenario> {
    vec![click_events(), key_events()]
}
