//! Menu state machine: stack-based navigation over the static tree.
//!
//! ```text
//!            ┌──────────── Enter on Slider/Picker/Options ───────────┐
//!            │                                                       ▼
//!      ┌──────────┐  Enter on About / open_pager()   ┌─────────┐  ┌─────────┐
//!      │ Browsing │ ───────────────────────────────▶ │ Paging  │  │ Editing │
//!      └──────────┘ ◀─── Enter/Back (full redraw) ── └─────────┘  └─────────┘
//!            ▲                                                       │
//!            └──────────────── Enter commits / Back cancels ─────────┘
//! ```
//!
//! While an editor or pager is open it owns every button; browsing
//! navigation is suspended.  Nothing in here is fallible: scrolling past
//! an end or backing out of the root is a no-op followed by a redraw.

pub mod editor;
pub mod tree;

use log::{debug, warn};

use crate::app::commands::ButtonId;
use crate::app::ports::DisplayPort;
use crate::settings::{SettingKey, SettingsStore};
use crate::text::{DISPLAY_COLS, Line, fit, fit_fmt};
use editor::{EditOutcome, Editor, Pager};
use tree::{Action, MenuEntry, MenuId, MenuItem, MenuTree, ROOT};

/// Capacity of the back-navigation stack.
pub const MAX_STACK_DEPTH: usize = 10;

pub const ABOUT_TEXT: [&str; 7] = [
    "Super Lights 1.0",
    "By: Alzner",
    "Embedded Systems",
    "Project Showcase",
    "Thank you !",
    "for using this",
    "  amazing app!",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Editing(Editor),
    Paging(Pager),
}

/// What the caller has to do after a button was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSignal {
    None,
    /// An action the menu cannot carry out on its own.
    Invoke(Action),
    /// A setting was written through the store.
    Committed(SettingKey, i32),
}

pub struct Menu {
    tree: MenuTree,
    current: MenuId,
    selection: usize,
    scroll_offset: usize,
    /// 1 or 2
    cursor_row: u8,
    stack: heapless::Vec<MenuId, MAX_STACK_DEPTH>,
    depth_limit: usize,
    mode: Mode,
}

impl Menu {
    pub fn new(tree: MenuTree) -> Self {
        Self::with_depth(tree, MAX_STACK_DEPTH)
    }

    /// Menu whose back stack holds at most `depth` levels (capped at
    /// [`MAX_STACK_DEPTH`]).
    pub fn with_depth(tree: MenuTree, depth: usize) -> Self {
        Self {
            tree,
            current: ROOT,
            selection: 0,
            scroll_offset: 0,
            cursor_row: 1,
            stack: heapless::Vec::new(),
            depth_limit: depth.min(MAX_STACK_DEPTH),
            mode: Mode::Browsing,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn current_menu(&self) -> MenuId {
        self.current
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn cursor_row(&self) -> u8 {
        self.cursor_row
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.mode, Mode::Browsing)
    }

    pub fn current_items(&self) -> &[MenuItem] {
        self.tree
            .menu(self.current)
            .map_or(&[], |m| m.items.as_slice())
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.current_items().get(self.selection)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Return to the root in browsing mode and draw it.
    pub fn init(&mut self, settings: &SettingsStore, display: &mut impl DisplayPort) {
        self.current = ROOT;
        self.stack.clear();
        self.mode = Mode::Browsing;
        self.reset_cursor();
        display.enable_cursor();
        self.render(settings, display);
    }

    fn reset_cursor(&mut self) {
        self.selection = 0;
        self.scroll_offset = 0;
        self.cursor_row = 1;
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn handle_button(
        &mut self,
        button: ButtonId,
        settings: &mut SettingsStore,
        display: &mut impl DisplayPort,
    ) -> MenuSignal {
        match &mut self.mode {
            Mode::Browsing => self.browse(button, settings, display),
            Mode::Editing(editor) => match editor.handle(button) {
                EditOutcome::Continue => {
                    self.render(settings, display);
                    MenuSignal::None
                }
                EditOutcome::Commit(key, value) => {
                    let accepted = settings.set_field(key, value);
                    self.close_overlay(settings, display);
                    if accepted {
                        MenuSignal::Committed(key, value)
                    } else {
                        debug!("Menu: {} rejected {}", key.label(), value);
                        MenuSignal::None
                    }
                }
                EditOutcome::Cancel => {
                    self.close_overlay(settings, display);
                    MenuSignal::None
                }
            },
            Mode::Paging(pager) => {
                if pager.handle(button) {
                    self.render(settings, display);
                } else {
                    self.close_overlay(settings, display);
                }
                MenuSignal::None
            }
        }
    }

    fn browse(
        &mut self,
        button: ButtonId,
        settings: &mut SettingsStore,
        display: &mut impl DisplayPort,
    ) -> MenuSignal {
        let signal = match button {
            ButtonId::Enter => return self.select(settings, display),
            ButtonId::Back => {
                self.back();
                MenuSignal::None
            }
            ButtonId::Down => {
                self.scroll_down();
                MenuSignal::None
            }
            ButtonId::Up => {
                self.scroll_up();
                MenuSignal::None
            }
        };
        self.render(settings, display);
        signal
    }

    fn select(&mut self, settings: &mut SettingsStore, display: &mut impl DisplayPort) -> MenuSignal {
        let Some(entry) = self.selected_item().map(|i| i.entry) else {
            self.render(settings, display);
            return MenuSignal::None;
        };
        match entry {
            MenuEntry::Submenu(child) => {
                if self.stack.len() >= self.depth_limit || self.stack.push(self.current).is_err() {
                    warn!("Menu: stack full at depth {}, not descending", self.stack.len());
                } else {
                    self.current = child;
                    self.reset_cursor();
                }
                self.render(settings, display);
                MenuSignal::None
            }
            MenuEntry::Label => {
                self.render(settings, display);
                MenuSignal::None
            }
            MenuEntry::Action(action) => self.run_action(action, settings, display),
        }
    }

    fn run_action(
        &mut self,
        action: Action,
        settings: &mut SettingsStore,
        display: &mut impl DisplayPort,
    ) -> MenuSignal {
        match action {
            Action::Slider(key) => self.open_editor(Editor::slider(key, settings), settings, display),
            Action::Picker(key) => self.open_editor(Editor::picker(key, settings), settings, display),
            Action::AutoOffOptions => self.open_editor(Editor::auto_off(settings), settings, display),
            Action::About => {
                self.open_pager(Pager::from_strs(&ABOUT_TEXT), settings, display);
                MenuSignal::None
            }
            Action::Toggle(key) => {
                let value = i32::from(settings.get_field(key) == 0);
                let accepted = settings.set_field(key, value);
                self.render(settings, display);
                if accepted {
                    MenuSignal::Committed(key, value)
                } else {
                    MenuSignal::None
                }
            }
            Action::ToggleLight | Action::ViewLog | Action::ClearLog | Action::ResetSettings => {
                MenuSignal::Invoke(action)
            }
        }
    }

    fn open_editor(
        &mut self,
        editor: Editor,
        settings: &SettingsStore,
        display: &mut impl DisplayPort,
    ) -> MenuSignal {
        debug!("Menu: editing {}", editor.key().label());
        self.mode = Mode::Editing(editor);
        display.disable_cursor();
        self.render(settings, display);
        MenuSignal::None
    }

    /// Show `pager` full-screen until Enter or Back.
    pub fn open_pager(&mut self, pager: Pager, settings: &SettingsStore, display: &mut impl DisplayPort) {
        self.mode = Mode::Paging(pager);
        display.disable_cursor();
        self.render(settings, display);
    }

    fn close_overlay(&mut self, settings: &SettingsStore, display: &mut impl DisplayPort) {
        self.mode = Mode::Browsing;
        display.enable_cursor();
        display.clear();
        self.render(settings, display);
    }

    // ── Navigation ────────────────────────────────────────────

    fn back(&mut self) {
        match self.stack.pop() {
            Some(parent) => {
                self.current = parent;
                self.reset_cursor();
            }
            None => debug!("Menu: already at the top level"),
        }
    }

    fn scroll_down(&mut self) {
        let len = self.current_items().len();
        if self.selection + 1 >= len {
            return;
        }
        self.selection += 1;
        if self.cursor_row == 1 {
            self.cursor_row = 2;
        } else if self.scroll_offset + 2 < len {
            self.scroll_offset += 1;
        }
    }

    fn scroll_up(&mut self) {
        if self.selection == 0 {
            return;
        }
        self.selection -= 1;
        if self.cursor_row == 2 {
            self.cursor_row = 1;
        } else if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    // ── Rendering ─────────────────────────────────────────────

    /// Display text for one item: live settings rows get their value.
    pub fn row_text(item: &MenuItem, settings: &SettingsStore) -> Line {
        let Some(key) = SettingKey::from_label(item.name) else {
            return fit(item.name);
        };
        let value = settings.get_display_value(key);
        // ": " form when it fits, otherwise a single space.
        if item.name.chars().count() + 2 + value.chars().count() <= DISPLAY_COLS {
            fit_fmt(format_args!("{}: {}", item.name, value))
        } else {
            fit_fmt(format_args!("{} {}", item.name, value))
        }
    }

    /// The two rows of the current screen.
    pub fn screen(&self, settings: &SettingsStore) -> (Line, Line) {
        match &self.mode {
            Mode::Browsing => {
                let items = self.current_items();
                let row = |i: usize| {
                    items
                        .get(i)
                        .map(|it| Self::row_text(it, settings))
                        .unwrap_or_default()
                };
                (row(self.scroll_offset), row(self.scroll_offset + 1))
            }
            Mode::Editing(editor) => editor.screen(),
            Mode::Paging(pager) => pager.screen(),
        }
    }

    pub fn render(&self, settings: &SettingsStore, display: &mut impl DisplayPort) {
        let (l1, l2) = self.screen(settings);
        display.render(&l1, &l2);
        if self.is_browsing() {
            display.highlight_row(self.cursor_row);
        }
    }

    /// Redraw only if a visible browsing row shows `key`'s live value.
    pub fn refresh_if_showing(
        &self,
        key: SettingKey,
        settings: &SettingsStore,
        display: &mut impl DisplayPort,
    ) -> bool {
        if !self.is_browsing() {
            return false;
        }
        let items = self.current_items();
        let visible = items
            .iter()
            .skip(self.scroll_offset)
            .take(2)
            .any(|it| SettingKey::from_label(it.name) == Some(key));
        if visible {
            self.render(settings, display);
        }
        visible
    }
}
