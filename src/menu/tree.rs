//! Static menu tree, stored as an arena of menus addressed by index.
//!
//! ```text
//!   Main ─┬─ Settings ─┬─ Light settings ─┬─ Light            (toggle via arbiter)
//!         │            │                  ├─ Brightness       (slider)
//!         │            │                  ├─ Color            (picker)
//!         │            │                  ├─ Sensitivity ──┬─ IR sens  (slider)
//!         │            │                  │                └─ US dist  (slider)
//!         │            │                  ├─ Timings ──────┬─ Auto unplug (options)
//!         │            │                  │                ├─ IR timing    (slider)
//!         │            │                  │                └─ US timing    (slider)
//!         │            │                  ├─ IR active        (toggle)
//!         │            │                  └─ US active        (toggle)
//!         │            ├─ Audio settings ─┬─ Sound  (toggle)
//!         │            │                  ├─ Signal (picker)
//!         │            │                  └─ Volume (slider)
//!         │            └─ Reset settings
//!         ├─ Activity log ─┬─ View log
//!         │                └─ Clear log
//!         └─ About (pager)
//! ```
//!
//! Submenu links are indices into the arena, so the shape can be
//! validated and serialised.

use serde::Serialize;

use super::MAX_STACK_DEPTH;
use crate::settings::SettingKey;

/// Index of a menu in the arena.
pub type MenuId = usize;

/// The root menu is always the first arena entry.
pub const ROOT: MenuId = 0;

/// What selecting an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Manual light toggle, routed through the arbiter.
    ToggleLight,
    /// Flip a boolean setting in place.
    Toggle(SettingKey),
    /// Open the bar slider for a ranged setting.
    Slider(SettingKey),
    /// Open the cyclic picker for a catalogue index.
    Picker(SettingKey),
    /// Open the auto-off option list.
    AutoOffOptions,
    About,
    ViewLog,
    ClearLog,
    ResetSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuEntry {
    Submenu(MenuId),
    Action(Action),
    /// Inert row.
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub entry: MenuEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuList {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

/// Structural problems found by [`MenuTree::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The arena has no root.
    NoRoot,
    /// An item links to a menu index outside the arena.
    DanglingSubmenu { menu: MenuId, item: usize },
    /// A menu is reachable from itself.
    Cycle { menu: MenuId },
    /// A menu has no items to select.
    EmptyMenu { menu: MenuId },
    /// Submenu chains are longer than the navigation stack.
    TooDeep { depth: usize },
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoRoot => write!(f, "menu tree is empty"),
            Self::DanglingSubmenu { menu, item } => {
                write!(f, "menu {} item {} links outside the tree", menu, item)
            }
            Self::Cycle { menu } => write!(f, "menu {} is part of a cycle", menu),
            Self::EmptyMenu { menu } => write!(f, "menu {} has no items", menu),
            Self::TooDeep { depth } => {
                write!(f, "menu depth {} exceeds the stack of {}", depth, MAX_STACK_DEPTH)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuTree {
    menus: Vec<MenuList>,
}

fn item(name: &'static str, entry: MenuEntry) -> MenuItem {
    MenuItem { name, entry }
}

fn sub(name: &'static str, id: MenuId) -> MenuItem {
    item(name, MenuEntry::Submenu(id))
}

fn act(name: &'static str, action: Action) -> MenuItem {
    item(name, MenuEntry::Action(action))
}

impl MenuTree {
    /// Build a tree from an arena, rejecting malformed shapes.
    pub fn new(menus: Vec<MenuList>) -> Result<Self, TreeError> {
        let tree = Self { menus };
        tree.validate()?;
        Ok(tree)
    }

    /// The appliance menu.
    pub fn standard() -> Self {
        const MAIN: MenuId = 0;
        const SETTINGS: MenuId = 1;
        const LIGHT: MenuId = 2;
        const SENSITIVITY: MenuId = 3;
        const TIMINGS: MenuId = 4;
        const AUDIO: MenuId = 5;
        const ACTIVITY: MenuId = 6;

        let mut menus = vec![
            MenuList {
                title: "Main",
                items: Vec::new(),
            };
            7
        ];
        menus[MAIN].items = vec![
            sub("Settings", SETTINGS),
            sub("Activity log", ACTIVITY),
            act("About", Action::About),
        ];
        menus[SETTINGS] = MenuList {
            title: "Settings",
            items: vec![
                sub("Light settings", LIGHT),
                sub("Audio settings", AUDIO),
                act("Reset settings", Action::ResetSettings),
            ],
        };
        menus[LIGHT] = MenuList {
            title: "Light settings",
            items: vec![
                act(SettingKey::Light.label(), Action::ToggleLight),
                act(
                    SettingKey::Brightness.label(),
                    Action::Slider(SettingKey::Brightness),
                ),
                act(
                    SettingKey::SelectedColor.label(),
                    Action::Picker(SettingKey::SelectedColor),
                ),
                sub("Sensitivity", SENSITIVITY),
                sub("Timings", TIMINGS),
                act(
                    SettingKey::IrEnabled.label(),
                    Action::Toggle(SettingKey::IrEnabled),
                ),
                act(
                    SettingKey::UsEnabled.label(),
                    Action::Toggle(SettingKey::UsEnabled),
                ),
            ],
        };
        menus[SENSITIVITY] = MenuList {
            title: "Sensitivity",
            items: vec![
                act(
                    SettingKey::SensitivityIr.label(),
                    Action::Slider(SettingKey::SensitivityIr),
                ),
                act(
                    SettingKey::SensitivityUr.label(),
                    Action::Slider(SettingKey::SensitivityUr),
                ),
            ],
        };
        menus[TIMINGS] = MenuList {
            title: "Timings",
            items: vec![
                act(SettingKey::LightAutoTurnOff.label(), Action::AutoOffOptions),
                act(
                    SettingKey::TimingIr.label(),
                    Action::Slider(SettingKey::TimingIr),
                ),
                act(
                    SettingKey::TimingUr.label(),
                    Action::Slider(SettingKey::TimingUr),
                ),
            ],
        };
        menus[AUDIO] = MenuList {
            title: "Audio settings",
            items: vec![
                act(
                    SettingKey::SoundEnabled.label(),
                    Action::Toggle(SettingKey::SoundEnabled),
                ),
                act(
                    SettingKey::SelectedSignal.label(),
                    Action::Picker(SettingKey::SelectedSignal),
                ),
                act(SettingKey::Volume.label(), Action::Slider(SettingKey::Volume)),
            ],
        };
        menus[ACTIVITY] = MenuList {
            title: "Activity log",
            items: vec![
                act("View log", Action::ViewLog),
                act("Clear log", Action::ClearLog),
            ],
        };
        Self { menus }
    }

    pub fn menu(&self, id: MenuId) -> Option<&MenuList> {
        self.menus.get(id)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Check for dangling links, cycles, empty menus and chains too deep
    /// for the navigation stack.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.menus.is_empty() {
            return Err(TreeError::NoRoot);
        }
        for (id, menu) in self.menus.iter().enumerate() {
            if menu.items.is_empty() {
                return Err(TreeError::EmptyMenu { menu: id });
            }
            for (i, it) in menu.items.iter().enumerate() {
                if let MenuEntry::Submenu(child) = it.entry {
                    if child >= self.menus.len() {
                        return Err(TreeError::DanglingSubmenu { menu: id, item: i });
                    }
                }
            }
        }
        // Depth-first search from every node; a back edge is a cycle.
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            Open,
            Done,
        }
        let mut marks = vec![Mark::Unseen; self.menus.len()];
        for start in 0..self.menus.len() {
            if marks[start] != Mark::Unseen {
                continue;
            }
            // (menu, next item index to inspect)
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::Open;
            while let Some(top) = stack.last_mut() {
                let (id, next) = *top;
                let children = &self.menus[id].items;
                if next >= children.len() {
                    marks[id] = Mark::Done;
                    stack.pop();
                    continue;
                }
                top.1 += 1;
                let entry = children[next].entry;
                if let MenuEntry::Submenu(child) = entry {
                    match marks[child] {
                        Mark::Open => return Err(TreeError::Cycle { menu: child }),
                        Mark::Unseen => {
                            marks[child] = Mark::Open;
                            stack.push((child, 0));
                        }
                        Mark::Done => {}
                    }
                }
            }
        }
        let depth = self.depth();
        if depth > MAX_STACK_DEPTH {
            return Err(TreeError::TooDeep { depth });
        }
        Ok(())
    }

    /// Longest chain of submenu links from the root.  Only meaningful on
    /// an acyclic arena.
    pub fn depth(&self) -> usize {
        fn walk(tree: &MenuTree, id: MenuId) -> usize {
            tree.menus[id]
                .items
                .iter()
                .filter_map(|it| match it.entry {
                    MenuEntry::Submenu(child) => Some(1 + walk(tree, child)),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
        }
        if self.menus.is_empty() { 0 } else { walk(self, ROOT) }
    }

    /// JSON rendering of the arena, for diagnostics and shape tests.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
