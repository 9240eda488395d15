/// A key press, already stripped of terminal specifics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Esc,
    Backspace,
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchPanel,
    Up,
    Down,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    ToggleFileTree,
    Search,
    CopyPath,
    OpenInEditor,
    ToggleSideBySide,
    CycleIcons,
    DirectoryView,
    Quit,
}

/// Normal-mode key map.
pub fn action_for(key: Key) -> Option<Action> {
    let action = match key {
        Key::Tab => Action::SwitchPanel,
        Key::Up | Key::Char('k') | Key::Ctrl('p') => Action::Up,
        Key::Down | Key::Char('j') | Key::Ctrl('n') => Action::Down,
        Key::Ctrl('d') => Action::HalfPageDown,
        Key::Ctrl('u') => Action::HalfPageUp,
        Key::PageDown => Action::PageDown,
        Key::PageUp => Action::PageUp,
        Key::Char('e') => Action::ToggleFileTree,
        Key::Char('t') => Action::Search,
        Key::Char('y') => Action::CopyPath,
        Key::Char('o') => Action::OpenInEditor,
        Key::Char('s') => Action::ToggleSideBySide,
        Key::Char('i') => Action::CycleIcons,
        Key::Char('d') => Action::DirectoryView,
        Key::Char('q') | Key::Ctrl('c') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Footer help: key label and description.
pub const HELP: &[(&str, &str)] = &[
    ("tab", "switch panel"),
    ("\u{2191}/k", "prev file"),
    ("\u{2193}/j", "next file"),
    ("ctrl+d/u", "scroll diff"),
    ("e", "toggle file tree"),
    ("t", "search files"),
    ("d", "directory diff"),
    ("y", "copy path"),
    ("o", "open in $EDITOR"),
    ("s", "toggle side-by-side"),
    ("i", "cycle icons"),
    ("q", "quit"),
];

pub const SEARCH_HELP: &[(&str, &str)] = &[
    ("\u{2191}/ctrl+p", "prev"),
    ("\u{2193}/ctrl+n", "next"),
    ("enter", "open"),
    ("esc", "cancel"),
    ("ctrl+c", "quit"),
];
