//! Navigation bar chrome shared by the dashboard pages.

use tracing::trace;
use voltbill_dom::{Document, NodeId};
use voltbill_settings::{KeyValueStorage, USERNAME_KEY};

/// Page assumed when the path has no file name.
pub const DEFAULT_PAGE: &str = "dashboard.html";

const MENU_CLOSED_ICON: &str = "☰";
const MENU_OPEN_ICON: &str = "✕";

/// 標記目前頁面的導覽連結。 / Marks the `.nav-link` for the current page as active.
///
/// Exact `href` matches win over links that merely contain the file name.
pub fn set_active_navigation(doc: &mut Document, path: &str) -> Option<NodeId> {
    let filename = match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_PAGE,
    };

    let links = doc.query_class("nav-link");
    for link in &links {
        doc.remove_class(*link, "active");
    }

    let active = links
        .iter()
        .copied()
        .find(|link| doc.attr(*link, "href") == Some(filename))
        .or_else(|| {
            links
                .iter()
                .copied()
                .find(|link| doc.attr(*link, "href").is_some_and(|href| href.contains(filename)))
        })?;
    doc.add_class(active, "active");
    trace!(filename, "active navigation set");
    Some(active)
}

/// 行動版選單按鈕。 / The narrow-viewport menu toggle.
#[derive(Debug, Clone, Copy)]
pub struct MobileMenu {
    toggle: Option<NodeId>,
    breakpoint: u32,
}

impl MobileMenu {
    /// Inserts the toggle at the start of `.nav-actions` when the viewport is
    /// at most `breakpoint` pixels wide and no toggle exists yet.
    pub fn install(doc: &mut Document, viewport_width: u32, breakpoint: u32) -> Self {
        let existing = doc.first_by_class("mobile-menu-toggle");
        let toggle = match (existing, doc.first_by_class("nav-actions")) {
            (Some(existing), _) => Some(existing),
            (None, Some(actions)) if viewport_width <= breakpoint => {
                let button = doc.create_element("button");
                doc.set_attr(button, "class", "mobile-menu-toggle");
                doc.set_attr(button, "aria-label", "Toggle menu");
                doc.set_text_content(button, MENU_CLOSED_ICON);
                match doc.element_children(actions).first().copied() {
                    Some(first) => doc.insert_before(actions, button, first),
                    None => doc.append_child(actions, button),
                }
                Some(button)
            }
            _ => None,
        };
        Self { toggle, breakpoint }
    }

    pub fn button(&self) -> Option<NodeId> {
        self.toggle
    }

    /// Opens or closes `.nav-menu`; returns whether it is now open.
    pub fn toggle(&self, doc: &mut Document) -> bool {
        let Some(menu) = doc.first_by_class("nav-menu") else {
            return false;
        };
        let open = doc.toggle_class(menu, "mobile-open");
        if let Some(button) = self.toggle {
            doc.set_text_content(button, if open { MENU_OPEN_ICON } else { MENU_CLOSED_ICON });
        }
        open
    }

    /// Closes the menu once the viewport grows past the breakpoint.
    pub fn on_resize(&self, doc: &mut Document, width: u32) -> bool {
        if width <= self.breakpoint {
            return false;
        }
        match doc.first_by_class("nav-menu") {
            Some(menu) => doc.remove_class(menu, "mobile-open"),
            None => false,
        }
    }
}

/// 顯示工作階段中的使用者名稱。 / Shows the session username and its initial.
pub fn update_user_info<S: KeyValueStorage>(doc: &mut Document, session: &S) -> Option<String> {
    let username = session.get(USERNAME_KEY).filter(|name| !name.is_empty())?;

    if let Some(avatar) = doc.first_by_class("user-avatar") {
        let initial: String = username
            .chars()
            .next()
            .map(|first| first.to_uppercase().collect())
            .unwrap_or_default();
        doc.set_text_content(avatar, &initial);
    }
    let label = doc
        .first_by_class("user-menu")
        .and_then(|menu| doc.find_tag_in(menu, "span").first().copied());
    if let Some(label) = label {
        doc.set_text_content(label, &username);
    }
    Some(username)
}
