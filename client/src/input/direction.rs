use super::key_map::KeyCodeMap;
use bevy::prelude::*;
use std::collections::HashSet;

/// Two-axis direction accumulated from held keys. Each axis is -1, 0 or 1.
///
/// Pressing a direction writes its axis immediately (last write wins when
/// both opposite keys are down). Releasing it clears the axis only when the
/// opposite key is no longer held.
#[derive(Debug, Clone)]
pub struct DirectionalInput {
    key_map: KeyCodeMap,
    held: HashSet<KeyCode>,
    x: i8,
    y: i8,
}

impl DirectionalInput {
    pub fn new(key_map: KeyCodeMap) -> Self {
        Self {
            key_map,
            held: HashSet::new(),
            x: 0,
            y: 0,
        }
    }

    pub fn on_key_down(&mut self, code: KeyCode) {
        self.held.insert(code);

        let map = self.key_map;
        if code == map.left {
            self.x = -1;
        } else if code == map.right {
            self.x = 1;
        } else if code == map.up {
            self.y = 1;
        } else if code == map.down {
            self.y = -1;
        } else if map.space == Some(code) {
            self.x = 0;
            self.y = 0;
        }
    }

    pub fn on_key_up(&mut self, code: KeyCode) {
        self.held.remove(&code);

        let map = self.key_map;
        let Some(opposite) = map.opposite(code) else {
            return;
        };
        if self.held.contains(&opposite) {
            return;
        }

        if code == map.left || code == map.right {
            self.x = 0;
        } else {
            self.y = 0;
        }
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn vector(&self) -> Vec2 {
        Vec2::new(f32::from(self.x), f32::from(self.y))
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::key_map::{MOVEMENT_KEYS, ROTATION_KEYS};

    #[derive(Clone, Copy)]
    enum Event {
        Down(KeyCode),
        Up(KeyCode),
    }

    fn apply(input: &mut DirectionalInput, events: &[Event]) {
        for event in events {
            match *event {
                Event::Down(code) => input.on_key_down(code),
                Event::Up(code) => input.on_key_up(code),
            }
        }
    }

    #[test]
    fn pressing_directions_sets_axes() {
        let mut input = DirectionalInput::new(MOVEMENT_KEYS);
        input.on_key_down(KeyCode::KeyA);
        input.on_key_down(KeyCode::KeyS);
        assert_eq!(input.vector(), Vec2::new(-1.0, 1.0));

        input.on_key_up(KeyCode::KeyA);
        input.on_key_up(KeyCode::KeyS);
        assert_eq!(input.vector(), Vec2::ZERO);
    }

    #[test]
    fn releasing_one_of_two_opposite_keys_keeps_the_other() {
        let mut input = DirectionalInput::new(MOVEMENT_KEYS);
        input.on_key_down(KeyCode::KeyA);
        input.on_key_down(KeyCode::KeyD);
        assert_eq!(input.x(), 1);

        input.on_key_up(KeyCode::KeyD);
        // A is still held; the axis is not reset.
        assert_eq!(input.x(), 1);

        input.on_key_up(KeyCode::KeyA);
        assert_eq!(input.x(), 0);
    }

    #[test]
    fn last_pressed_opposite_key_wins() {
        let mut input = DirectionalInput::new(ROTATION_KEYS);
        input.on_key_down(KeyCode::ArrowDown);
        input.on_key_down(KeyCode::ArrowUp);
        assert_eq!(input.y(), 1);
        input.on_key_down(KeyCode::ArrowDown);
        assert_eq!(input.y(), -1);
    }

    #[test]
    fn reset_key_zeroes_both_axes() {
        let mut input = DirectionalInput::new(MOVEMENT_KEYS);
        input.on_key_down(KeyCode::KeyD);
        input.on_key_down(KeyCode::KeyW);
        input.on_key_down(KeyCode::Space);
        assert_eq!(input.vector(), Vec2::ZERO);
        assert!(input.is_held(KeyCode::Space));
    }

    #[test]
    fn arrow_map_ignores_space() {
        let mut input = DirectionalInput::new(ROTATION_KEYS);
        input.on_key_down(KeyCode::ArrowLeft);
        input.on_key_down(KeyCode::Space);
        assert_eq!(input.x(), -1);
    }

    #[test]
    fn single_axis_sequences_stay_in_range() {
        let left = KeyCode::KeyA;
        let right = KeyCode::KeyD;
        let alphabet = [
            Event::Down(left),
            Event::Down(right),
            Event::Up(left),
            Event::Up(right),
        ];

        // Every sequence of length 6 over the four events.
        let total = alphabet.len().pow(6);
        for mut seed in 0..total {
            let mut events = Vec::with_capacity(6);
            for _ in 0..6 {
                events.push(alphabet[seed % alphabet.len()]);
                seed /= alphabet.len();
            }

            let mut input = DirectionalInput::new(MOVEMENT_KEYS);
            for event in &events {
                apply(&mut input, std::slice::from_ref(event));
                assert!((-1..=1).contains(&input.x()));
                assert_eq!(input.y(), 0);

                if let Event::Up(code) = *event {
                    let opposite = MOVEMENT_KEYS.opposite(code).unwrap();
                    if input.is_held(opposite) {
                        assert_ne!(input.x(), 0, "axis dropped to 0 with {opposite:?} held");
                    } else {
                        assert_eq!(input.x(), 0);
                    }
                }
            }
        }
    }
}
