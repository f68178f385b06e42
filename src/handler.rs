use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::App;
use crate::config::Config;
use crate::provider::Provider;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string edits.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        // Provider selector
        KeyCode::Tab => {
            app.select_next_provider();
            let _ = Config::save_provider(app.selected_provider.id());
        }
        KeyCode::BackTab => {
            app.select_prev_provider();
            let _ = Config::save_provider(app.selected_provider.id());
        }

        // Chat scrolling
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::PageDown => app.scroll_half_page_down(),

        // Enter sends; Shift+Enter or Alt+Enter inserts a literal
        // newline into the two-line draft. The draft is read-only
        // while a request is in flight.
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            if !app.is_busy() {
                insert_char(app, '\n');
            }
        }
        KeyCode::Enter => app.send_message(),

        KeyCode::Backspace if !app.is_busy() => {
            if app.draft_cursor > 0 {
                app.draft_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.draft, app.draft_cursor);
                app.draft.remove(byte_pos);
            }
        }
        KeyCode::Delete if !app.is_busy() => {
            if app.draft_cursor < app.draft.chars().count() {
                let byte_pos = char_to_byte_index(&app.draft, app.draft_cursor);
                app.draft.remove(byte_pos);
            }
        }
        KeyCode::Left if !app.is_busy() => {
            app.draft_cursor = app.draft_cursor.saturating_sub(1);
        }
        KeyCode::Right if !app.is_busy() => {
            let char_count = app.draft.chars().count();
            app.draft_cursor = (app.draft_cursor + 1).min(char_count);
        }
        KeyCode::Home if !app.is_busy() => {
            app.draft_cursor = 0;
        }
        KeyCode::End if !app.is_busy() => {
            app.draft_cursor = app.draft.chars().count();
        }
        KeyCode::Char(c)
            if !app.is_busy() && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            insert_char(app, c);
        }

        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.draft, app.draft_cursor);
    app.draft.insert(byte_pos, c);
    app.draft_cursor += 1;
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_down();
            app.scroll_down();
            app.scroll_down();
        }
        MouseEventKind::ScrollUp => {
            app.scroll_up();
            app.scroll_up();
            app.scroll_up();
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let hit: Option<Provider> = app
                .tab_areas
                .iter()
                .find(|(rect, _)| point_in_rect(mouse.column, mouse.row, *rect))
                .map(|(_, provider)| *provider);

            if let Some(provider) = hit {
                app.selected_provider = provider;
                let _ = Config::save_provider(provider.id());
            }
        }
        _ => {}
    }
}
