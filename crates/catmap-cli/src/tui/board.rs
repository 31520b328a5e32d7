//! TUI board view: the category-assignment board, driven by keyboard.
//!
//! Keyboard drags run the same engine lifecycle a pointer would: space
//! picks a card up (`on_drag_start`), every arrow step while holding it
//! fires `on_drag_over` so the board previews live, space drops it
//! (`on_drag_end`), Esc cancels. Narration from the engine lands in the
//! status line.
//!
//! Key bindings: arrows/hjkl move, space/enter pick up or drop, `a` quick
//! assign, `s` save, `u` undo, `x` delete mapping, `t` cycle target,
//! `r` refresh, Esc cancel, `q` quit.

use crate::store::SqliteStore;
use anyhow::Result;
use catmap_core::narrate::RecordingNarrator;
use catmap_core::notice::RecordingSink;
use catmap_core::{
    BoardSession, CategorySource, DragKind, GroupId, Notice, Over, delete_mapping, save_board,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::{Duration, Instant};

const STATUS_TTL: Duration = Duration::from_secs(5);

/// Result of a key press that the run loop must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    Quit,
}

pub struct BoardView {
    store: SqliteStore,
    session: BoardSession,
    narrator: RecordingNarrator,
    targets: Vec<String>,
    cursor_group: usize,
    cursor_item: usize,
    status_msg: Option<(String, Instant)>,
    /// A refresh arrived mid-drag and is applied once the gesture ends.
    refresh_deferred: bool,
}

impl BoardView {
    /// Build the view, select a target (the given one, else the first in
    /// the catalog), and load the board.
    ///
    /// # Errors
    ///
    /// Returns database failures from the initial load.
    pub fn new(store: SqliteStore, target: Option<String>) -> Result<Self> {
        let mut session = BoardSession::with_default_groups();
        let narrator = RecordingNarrator::new();
        session.set_narrator(Box::new(narrator.clone()));
        session.set_target(target);

        let mut view = Self {
            store,
            session,
            narrator,
            targets: Vec::new(),
            cursor_group: 0,
            cursor_item: 0,
            status_msg: None,
            refresh_deferred: false,
        };
        view.refresh()?;
        Ok(view)
    }

    /// Drive the terminal until the user quits.
    ///
    /// # Errors
    ///
    /// Returns terminal I/O failures.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && self.handle_key(key)? == Some(BoardAction::Quit)
                    {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Re-fetch board data for the current selection. Deferred while a
    /// drag is active so the gesture cannot be corrupted.
    ///
    /// # Errors
    ///
    /// Returns database failures.
    pub fn refresh(&mut self) -> Result<()> {
        if self.session.drag_session().is_some() {
            self.refresh_deferred = true;
            return Ok(());
        }
        if self.session.selected_target().is_none() {
            let targets = self.store.list_targets()?;
            self.session.set_target(targets.first().cloned());
        }
        let fetch = self.store.fetch(self.session.selected_target())?;
        self.targets = fetch.targets.clone();
        self.session.load(&fetch.unassigned, &fetch.assigned);
        self.refresh_deferred = false;
        self.clamp_cursor();
        Ok(())
    }

    /// Handle one key press. Returns an action for the run loop, if any.
    ///
    /// # Errors
    ///
    /// Returns database failures from refreshes triggered by the key.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Option<BoardAction>> {
        let dragging = self.session.drag_session().is_some();
        match key.code {
            KeyCode::Char('q') => {
                if dragging {
                    self.session.on_drag_cancel();
                }
                return Ok(Some(BoardAction::Quit));
            }
            KeyCode::Esc => {
                if dragging {
                    self.session.on_drag_cancel();
                    self.apply_deferred_refresh()?;
                } else {
                    self.status_msg = None;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if dragging {
                    self.drag_horizontal(-1);
                } else {
                    self.move_cursor_group(-1);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if dragging {
                    self.drag_horizontal(1);
                } else {
                    self.move_cursor_group(1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if dragging {
                    self.drag_vertical(-1);
                } else {
                    self.move_cursor_item(-1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if dragging {
                    self.drag_vertical(1);
                } else {
                    self.move_cursor_item(1);
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_drag()?,
            KeyCode::Char('a') => self.quick_assign_cursor(),
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('u') => self.undo(),
            KeyCode::Char('x') => self.delete_target()?,
            KeyCode::Char('t') => self.cycle_target()?,
            KeyCode::Char('r') => {
                self.refresh()?;
                if self.refresh_deferred {
                    self.set_status("Refresh deferred until the drag ends.");
                } else {
                    self.set_status("Refreshed.");
                }
            }
            _ => {}
        }
        Ok(None)
    }

    // -----------------------------------------------------------------
    // Drag driving
    // -----------------------------------------------------------------

    fn toggle_drag(&mut self) -> Result<()> {
        if let Some(drag) = self.session.drag_session().cloned() {
            // Drop. The live preview already reflects the final state; the
            // card's own position narrates where it landed.
            let active = drag.active_id;
            self.session.on_drag_end(&active, Some(Over::Item(&active)));
            self.sync_cursor_to(&active);
            self.apply_deferred_refresh()?;
        } else if let Some(id) = self.cursor_item_id() {
            self.session.on_drag_start(DragKind::Item, &id);
        }
        Ok(())
    }

    fn drag_vertical(&mut self, delta: isize) {
        let Some(drag) = self.session.drag_session().cloned() else {
            return;
        };
        let active = drag.active_id;
        let Some((pos, len, group)) = self.session.registry().position_in_group(&active) else {
            return;
        };
        let Some(target) = pos.checked_add_signed(delta) else {
            return;
        };
        if target >= len {
            return;
        }
        let Some(neighbor) = self
            .session
            .items_in(&group)
            .nth(target)
            .map(|item| item.id.clone())
        else {
            return;
        };
        self.session.on_drag_over(&active, Over::Item(&neighbor));
        self.sync_cursor_to(&active);
    }

    fn drag_horizontal(&mut self, delta: isize) {
        let Some(drag) = self.session.drag_session().cloned() else {
            return;
        };
        let active = drag.active_id;
        let Some(current_group) = self.session.registry().get(&active).map(|i| i.group.clone())
        else {
            return;
        };
        let groups: Vec<GroupId> = self.session.groups().iter().map(|g| g.id.clone()).collect();
        let Some(here) = groups.iter().position(|g| *g == current_group) else {
            return;
        };
        let Some(there) = here.checked_add_signed(delta) else {
            return;
        };
        let Some(target_group) = groups.get(there).cloned() else {
            return;
        };

        let neighbors: Vec<String> = self
            .session
            .items_in(&target_group)
            .map(|item| item.id.clone())
            .collect();
        let slot = self.cursor_item.min(neighbors.len().saturating_sub(1));
        if let Some(over_id) = neighbors.get(slot) {
            self.session.on_drag_over(&active, Over::Item(over_id));
        } else {
            self.session
                .on_drag_over(&active, Over::Group(target_group.as_str()));
        }
        self.sync_cursor_to(&active);
    }

    fn apply_deferred_refresh(&mut self) -> Result<()> {
        if self.refresh_deferred {
            self.refresh_deferred = false;
            self.refresh()?;
            self.set_status("Applied deferred refresh.");
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Board actions
    // -----------------------------------------------------------------

    fn quick_assign_cursor(&mut self) {
        let Some(id) = self.cursor_item_id() else {
            return;
        };
        match self.session.quick_assign(&id) {
            Ok(true) => {
                let target = self.session.selected_target().unwrap_or("?").to_string();
                self.set_status(format!("Assigned {id} to {target}."));
                self.clamp_cursor();
            }
            Ok(false) => self.set_status(format!("{id} is already assigned.")),
            Err(err) => self.notice_status(&Notice::from(&err)),
        }
    }

    fn save(&mut self) {
        let mut sink = RecordingSink::default();
        save_board(&mut self.session, &mut self.store, &mut sink);
        if let Some(notice) = sink.notices.last() {
            self.notice_status(notice);
        }
    }

    fn undo(&mut self) {
        if self.session.can_undo() {
            self.session.reset();
            self.clamp_cursor();
            self.set_status("Reverted to the last saved state.");
        } else {
            self.set_status("Nothing to undo.");
        }
    }

    fn delete_target(&mut self) -> Result<()> {
        let mut sink = RecordingSink::default();
        let deleted = delete_mapping(&self.session, &mut self.store, &mut sink);
        if let Some(notice) = sink.notices.last() {
            self.notice_status(notice);
        }
        if deleted {
            self.session.set_target(None);
            self.refresh()?;
        }
        Ok(())
    }

    fn cycle_target(&mut self) -> Result<()> {
        if self.targets.is_empty() {
            self.set_status("No target categories. Add one with `cm target add <name>`.");
            return Ok(());
        }
        let next = match self.session.selected_target() {
            Some(current) => {
                let here = self.targets.iter().position(|t| t == current).unwrap_or(0);
                self.targets[(here + 1) % self.targets.len()].clone()
            }
            None => self.targets[0].clone(),
        };
        self.session.set_target(Some(next.clone()));
        self.refresh()?;
        self.set_status(format!("Target: {next}."));
        Ok(())
    }

    // -----------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------

    fn cursor_item_id(&self) -> Option<String> {
        let group = &self.session.groups().get(self.cursor_group)?.id;
        self.session
            .items_in(group)
            .nth(self.cursor_item)
            .map(|item| item.id.clone())
    }

    fn group_len(&self, group_idx: usize) -> usize {
        self.session
            .groups()
            .get(group_idx)
            .map_or(0, |g| self.session.items_in(&g.id).count())
    }

    fn move_cursor_group(&mut self, delta: isize) {
        let count = self.session.groups().len();
        if count == 0 {
            return;
        }
        if let Some(next) = self.cursor_group.checked_add_signed(delta)
            && next < count
        {
            self.cursor_group = next;
            self.clamp_cursor();
        }
    }

    fn move_cursor_item(&mut self, delta: isize) {
        let len = self.group_len(self.cursor_group);
        if len == 0 {
            return;
        }
        if let Some(next) = self.cursor_item.checked_add_signed(delta)
            && next < len
        {
            self.cursor_item = next;
        }
    }

    fn sync_cursor_to(&mut self, id: &str) {
        if let Some((pos, _len, group)) = self.session.registry().position_in_group(id) {
            if let Some(group_idx) = self.session.groups().iter().position(|g| g.id == group) {
                self.cursor_group = group_idx;
            }
            self.cursor_item = pos;
        }
    }

    fn clamp_cursor(&mut self) {
        let count = self.session.groups().len();
        if count == 0 {
            self.cursor_group = 0;
            self.cursor_item = 0;
            return;
        }
        self.cursor_group = self.cursor_group.min(count - 1);
        let len = self.group_len(self.cursor_group);
        self.cursor_item = if len == 0 { 0 } else { self.cursor_item.min(len - 1) };
    }

    // -----------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_msg = Some((msg.into(), Instant::now()));
    }

    fn notice_status(&mut self, notice: &Notice) {
        self.set_status(format!("{}: {}", notice.title, notice.body));
    }

    fn status_line(&self) -> String {
        if let Some((msg, at)) = &self.status_msg
            && at.elapsed() < STATUS_TTL
        {
            return msg.clone();
        }
        if self.session.drag_session().is_some()
            && let Some(line) = self.narrator.last()
        {
            return line;
        }
        let unmapped = self.session.unassigned_items().len();
        if unmapped > 0 {
            format!("{unmapped} categories still need attention.")
        } else {
            String::from("All categories mapped.")
        }
    }

    // -----------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------

    /// Render the whole view into the frame.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(frame.area());
        self.render_board(frame, chunks[0]);
        self.render_footer(frame, chunks[1]);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let groups = self.session.groups();
        if groups.is_empty() {
            return;
        }
        let constraints = vec![Constraint::Ratio(1, groups.len() as u32); groups.len()];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let dragged = self
            .session
            .drag_session()
            .map(|drag| drag.active_id.clone());

        for (group_idx, group) in groups.iter().enumerate() {
            let items: Vec<&catmap_core::CategoryItem> =
                self.session.items_in(&group.id).collect();

            let mut title = format!(" {} ({}) ", group.title, items.len());
            if group.id == *self.session.assigned_group() {
                let target = self.session.selected_target().unwrap_or("no target");
                let dirty = if self.session.dirty() { " *" } else { "" };
                title = format!(" {} → {}{} ({}) ", group.title, target, dirty, items.len());
            }

            let rows: Vec<ListItem> = items
                .iter()
                .enumerate()
                .map(|(item_idx, item)| {
                    let is_cursor = group_idx == self.cursor_group && item_idx == self.cursor_item;
                    let is_dragged = dragged.as_deref() == Some(item.id.as_str());
                    let mut style = Style::default();
                    if is_dragged {
                        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                    }
                    if is_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let marker = if is_dragged { "≡ " } else { "  " };
                    ListItem::new(Line::from(Span::styled(
                        format!("{marker}{}", item.content),
                        style,
                    )))
                })
                .collect();

            let block = Block::default().borders(Borders::ALL).title(title);
            frame.render_widget(List::new(rows).block(block), columns[group_idx]);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = "space pick/drop · a assign · s save · u undo · x delete · t target · r refresh · q quit";
        let text = vec![
            Line::from(self.status_line()),
            Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::TOP)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardAction, BoardView};
    use crate::store::SqliteStore;
    use catmap_core::{CategorySource, GroupId};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn seeded_view() -> BoardView {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .add_raw_categories(&[
                "Bakery".to_string(),
                "Coffee".to_string(),
                "Rent".to_string(),
            ])
            .unwrap();
        store.add_target("Food").unwrap();
        BoardView::new(store, None).unwrap()
    }

    fn press(view: &mut BoardView, code: KeyCode) -> Option<BoardAction> {
        view.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn assigned_ids(view: &BoardView) -> Vec<String> {
        view.session
            .items_in(&GroupId::assigned())
            .map(|item| item.id.clone())
            .collect()
    }

    #[test]
    fn opens_with_first_target_selected() {
        let view = seeded_view();
        assert_eq!(view.session.selected_target(), Some("Food"));
        assert_eq!(view.session.unassigned_items().len(), 3);
        assert!(!view.session.dirty());
    }

    #[test]
    fn keyboard_drag_moves_card_across_columns() {
        let mut view = seeded_view();
        // Pick up Bakery, push it into the (empty) assigned column, drop.
        press(&mut view, KeyCode::Char(' '));
        assert!(view.session.drag_session().is_some());
        press(&mut view, KeyCode::Right);
        press(&mut view, KeyCode::Char(' '));

        assert!(view.session.drag_session().is_none());
        assert_eq!(assigned_ids(&view), vec!["Bakery"]);
        assert!(view.session.dirty());
    }

    #[test]
    fn save_commits_and_persists() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Right);
        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Char('s'));

        assert!(!view.session.dirty());
        let fetch = view.store.fetch(Some("Food")).unwrap();
        assert_eq!(fetch.assigned, vec!["Bakery"]);
    }

    #[test]
    fn escape_cancels_but_preview_stays_until_undo() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Right);
        press(&mut view, KeyCode::Esc);

        assert!(view.session.drag_session().is_none());
        assert_eq!(assigned_ids(&view), vec!["Bakery"]);
        assert!(view.session.dirty());

        press(&mut view, KeyCode::Char('u'));
        assert!(assigned_ids(&view).is_empty());
        assert!(!view.session.dirty());
    }

    #[test]
    fn quick_assign_from_cursor() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Down);
        press(&mut view, KeyCode::Char('a'));
        assert_eq!(assigned_ids(&view), vec!["Coffee"]);
    }

    #[test]
    fn refresh_is_deferred_while_dragging() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Char('r'));
        assert!(view.refresh_deferred);
        assert_eq!(view.session.items().len(), 3);

        // Dropping applies the deferred refresh; the card had not left its
        // group, so the reloaded board is clean.
        press(&mut view, KeyCode::Char(' '));
        assert!(!view.refresh_deferred);
        assert!(!view.session.dirty());
    }

    #[test]
    fn cycle_target_reloads_for_selection() {
        let mut view = seeded_view();
        view.store.add_target("Housing").unwrap();
        press(&mut view, KeyCode::Char('r'));

        press(&mut view, KeyCode::Char('t'));
        assert_eq!(view.session.selected_target(), Some("Housing"));
        press(&mut view, KeyCode::Char('t'));
        assert_eq!(view.session.selected_target(), Some("Food"));
    }

    #[test]
    fn q_quits_even_mid_drag() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Char(' '));
        assert_eq!(press(&mut view, KeyCode::Char('q')), Some(BoardAction::Quit));
        assert!(view.session.drag_session().is_none());
    }

    #[test]
    fn vertical_drag_reorders_within_group() {
        let mut view = seeded_view();
        press(&mut view, KeyCode::Char(' '));
        press(&mut view, KeyCode::Down);
        press(&mut view, KeyCode::Char(' '));

        let unassigned: Vec<_> = view.session.unassigned_items();
        assert_eq!(unassigned, vec!["Coffee", "Bakery", "Rent"]);
        // Reorder alone is not a membership change, so nothing to save.
        assert!(!view.session.dirty());
    }
}
