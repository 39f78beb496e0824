//! Key mapping from terminal events to client actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use twisty_core::{CubeResult, Face, Modifier, MoveToken};

/// Orbit step per arrow key press, in radians
pub const ORBIT_STEP: f32 = 0.12;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Letter key: quarter turn, or inverse when shifted
    Turn(MoveToken),
    /// Alt+letter: the face's button, turned by the selected modifier
    Button(char),
    SelectModifier(Modifier),
    Orbit { yaw: f32, pitch: f32 },
}

/// Map keyboard input to an action. Keys that mean nothing return `None`.
pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    if should_quit(key) {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Left => Some(Action::Orbit {
            yaw: -ORBIT_STEP,
            pitch: 0.0,
        }),
        KeyCode::Right => Some(Action::Orbit {
            yaw: ORBIT_STEP,
            pitch: 0.0,
        }),
        KeyCode::Up => Some(Action::Orbit {
            yaw: 0.0,
            pitch: ORBIT_STEP,
        }),
        KeyCode::Down => Some(Action::Orbit {
            yaw: 0.0,
            pitch: -ORBIT_STEP,
        }),

        KeyCode::Char('1') => Some(Action::SelectModifier(Modifier::None)),
        KeyCode::Char('2') => Some(Action::SelectModifier(Modifier::Inverse)),
        KeyCode::Char('3') => Some(Action::SelectModifier(Modifier::Double)),

        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::ALT) => Some(Action::Button(c)),
        KeyCode::Char(c) => MoveToken::from_key(c).map(Action::Turn),

        _ => None,
    }
}

/// Esc or Ctrl+C. Letters are all potential turns, so none of them quit.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Resolve a button press. Buttons are labelled with the face letter, so
/// either case of the key selects the same face.
pub fn button_token(key: char, modifier: Modifier) -> CubeResult<MoveToken> {
    let base = Face::ALL
        .into_iter()
        .map(Face::letter)
        .find(|letter| letter.eq_ignore_ascii_case(&key))
        .unwrap_or(key);
    MoveToken::from_button(&base.to_string(), modifier.suffix())
}

/// Label shown for the modifier radio
pub fn modifier_label(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::None => "1:quarter",
        Modifier::Inverse => "2:inverse",
        Modifier::Double => "3:double",
    }
}
