//! Input Mapping
//!
//! Translates the backend's per-frame key presses into menu actions. Screens
//! only ever see actions, so rebinding the back key never touches them.

use crate::backend::{Backend, Key};
use crate::config::BackKeyBinding;

/// High-level menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::Up,
        MenuAction::Down,
        MenuAction::Left,
        MenuAction::Right,
        MenuAction::Confirm,
        MenuAction::Back,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Actions triggered this frame (key-down edges only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u8);

impl ActionSet {
    pub fn empty() -> Self {
        ActionSet(0)
    }

    pub fn insert(&mut self, action: MenuAction) {
        self.0 |= action.bit();
    }

    pub fn contains(&self, action: MenuAction) -> bool {
        self.0 & action.bit() != 0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = MenuAction> + '_ {
        MenuAction::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

impl FromIterator<MenuAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = MenuAction>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Key bindings for menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMap {
    back: BackKeyBinding,
}

impl InputMap {
    pub fn new(back: BackKeyBinding) -> Self {
        InputMap { back }
    }

    /// Keys that trigger `action`
    pub fn keys_for(&self, action: MenuAction) -> &'static [Key] {
        match action {
            MenuAction::Up => &[Key::Up],
            MenuAction::Down => &[Key::Down],
            MenuAction::Left => &[Key::Left],
            MenuAction::Right => &[Key::Right],
            MenuAction::Confirm => &[Key::Enter],
            MenuAction::Back => match self.back {
                BackKeyBinding::Z => &[Key::Z],
                BackKeyBinding::Escape => &[Key::Escape],
                BackKeyBinding::Both => &[Key::Z, Key::Escape],
            },
        }
    }

    /// Poll the backend for this frame's actions
    pub fn collect(&self, backend: &impl Backend) -> ActionSet {
        MenuAction::ALL
            .into_iter()
            .filter(|&action| {
                self.keys_for(action)
                    .iter()
                    .any(|&key| backend.is_key_pressed(key))
            })
            .collect()
    }
}
