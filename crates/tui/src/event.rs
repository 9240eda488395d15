//! crossterm events to [`Input`].

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use diffnav_core::{Input, Key, MouseKind};

pub fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key).map(Input::Key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(width, height) => Some(Input::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Key> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let key = match key.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(key)
}

fn translate_mouse(mouse: MouseEvent) -> Option<Input> {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => MouseKind::Down,
        MouseEventKind::Up(MouseButton::Left) => MouseKind::Up,
        MouseEventKind::Drag(MouseButton::Left) => MouseKind::Drag,
        MouseEventKind::Moved => MouseKind::Moved,
        MouseEventKind::ScrollUp => MouseKind::ScrollUp,
        MouseEventKind::ScrollDown => MouseKind::ScrollDown,
        _ => return None,
    };
    Some(Input::Mouse {
        kind,
        x: mouse.column,
        y: mouse.row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_chords_become_ctrl_keys() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Key(Key::Ctrl('c')))
        );
        assert_eq!(
            translate(key(KeyCode::Char('J'), KeyModifiers::SHIFT)),
            Some(Input::Key(Key::Char('J')))
        );
        assert_eq!(translate(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn left_button_and_wheel_are_translated() {
        let event = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 12,
                row: 4,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            translate(event(MouseEventKind::Drag(MouseButton::Left))),
            Some(Input::Mouse {
                kind: MouseKind::Drag,
                x: 12,
                y: 4
            })
        );
        assert_eq!(translate(event(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(
            translate(event(MouseEventKind::ScrollDown)),
            Some(Input::Mouse {
                kind: MouseKind::ScrollDown,
                x: 12,
                y: 4
            })
        );
        assert_eq!(
            translate(Event::Resize(120, 50)),
            Some(Input::Resize {
                width: 120,
                height: 50
            })
        );
    }
}
