//! Screen geometry shared by drawing and mouse hit-testing.

pub const HEADER_HEIGHT: u16 = 1;
pub const SEPARATOR_HEIGHT: u16 = 1;
/// Top border plus one help line.
pub const FOOTER_HEIGHT: u16 = 2;
/// Bordered search input.
pub const SEARCH_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Area {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x.saturating_add(self.width)
            && y < self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panes {
    pub header: Option<Area>,
    pub separator: Area,
    /// Sidebar content, left of its border column.
    pub sidebar: Option<Area>,
    pub search_box: Option<Area>,
    /// File tree or search results below the search box.
    pub list: Option<Area>,
    /// Border column right of the sidebar, or the grab line when hidden.
    pub border: Area,
    pub diff: Area,
    pub footer: Option<Area>,
}

impl Panes {
    /// Splits a `width` x `height` screen. `sidebar_width` is `None` when
    /// the sidebar is hidden.
    pub fn compute(
        width: u16,
        height: u16,
        sidebar_width: Option<u16>,
        show_header: bool,
        show_footer: bool,
    ) -> Panes {
        let header_h = if show_header { HEADER_HEIGHT } else { 0 };
        let footer_h = if show_footer { FOOTER_HEIGHT } else { 0 };
        let top = header_h + SEPARATOR_HEIGHT;
        let main_h = height.saturating_sub(top + footer_h);

        let header = show_header.then(|| Area::new(0, 0, width, HEADER_HEIGHT.min(height)));
        let separator = Area::new(0, header_h, width, SEPARATOR_HEIGHT.min(height.saturating_sub(header_h)));
        let footer = show_footer.then(|| Area::new(0, top + main_h, width, footer_h));

        let sidebar_w = sidebar_width.map(|w| w.min(width.saturating_sub(1)));
        let border_x = sidebar_w.unwrap_or(0);
        let border = Area::new(border_x, top, 1.min(width), main_h);
        let diff_x = border_x.saturating_add(1).min(width);
        let diff = Area::new(diff_x, top, width - diff_x, main_h);

        let (sidebar, search_box, list) = match sidebar_w {
            Some(w) => {
                let sidebar = Area::new(0, top, w, main_h);
                let search_h = SEARCH_HEIGHT.min(main_h);
                let search_box = Area::new(0, top, w, search_h);
                let list = Area::new(0, top + search_h, w, main_h - search_h);
                (Some(sidebar), Some(search_box), Some(list))
            }
            None => (None, None, None),
        };

        Panes {
            header,
            separator,
            sidebar,
            search_box,
            list,
            border,
            diff,
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_border_and_diff_tile_the_width() {
        let panes = Panes::compute(100, 40, Some(26), true, true);
        let sidebar = panes.sidebar.unwrap();
        assert_eq!(sidebar.width, 26);
        assert_eq!(panes.border.x, 26);
        assert_eq!(panes.diff.x, 27);
        assert_eq!(panes.diff.width, 73);
        assert_eq!(sidebar.y, 2);
        assert_eq!(sidebar.height, 36);
        assert_eq!(panes.list.unwrap().y, 5);
        assert_eq!(panes.footer.unwrap().y, 38);
    }

    #[test]
    fn hidden_sidebar_leaves_a_grab_line() {
        let panes = Panes::compute(80, 24, None, false, false);
        assert!(panes.sidebar.is_none());
        assert_eq!(panes.border.x, 0);
        assert_eq!(panes.diff.x, 1);
        assert_eq!(panes.diff.width, 79);
        assert_eq!(panes.diff.y, 1);
        assert_eq!(panes.diff.height, 23);
    }
}
