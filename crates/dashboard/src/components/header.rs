//! Navigation header.
//!
//! Renders the brand, a search box (display only), the theme toggle, the
//! session-dependent account menu and the navigation links. On narrow
//! screens the links collapse into a mobile menu that closes itself shortly
//! after every navigation.

use std::time::{Duration, Instant};

use ideafusion_core::{Session, Theme};

/// Delay between a navigation and the mobile menu closing.
pub const MOBILE_MENU_AUTO_CLOSE: Duration = Duration::from_millis(1000);

const NAV_LINKS: [(&str, &str); 3] = [("Home", "/"), ("About", "/about"), ("Projects", "/projects")];

/// Mobile menu open/closed state.
///
/// Navigating schedules a close [`MOBILE_MENU_AUTO_CLOSE`] later. The close
/// fires even if the menu was reopened before it was due.
#[derive(Debug, Clone, Default)]
pub struct MobileMenu {
    open: bool,
    location: Option<String>,
    close_at: Option<Instant>,
}

impl MobileMenu {
    /// Open the menu. An auto-close that is already due was never observed
    /// by a render and must not swallow this request.
    pub fn open(&mut self, now: Instant) {
        if self.close_at.is_some_and(|at| now >= at) {
            self.close_at = None;
        }
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Record the location being rendered. A change of location counts as a
    /// navigation and schedules the auto-close.
    pub fn observe_location(&mut self, location: &str, now: Instant) {
        if self.location.as_deref() == Some(location) {
            return;
        }
        self.location = Some(location.to_string());
        self.close_at = Some(now + MOBILE_MENU_AUTO_CLOSE);
    }

    /// Whether the menu is open at `now`, applying any due auto-close.
    pub fn is_open(&mut self, now: Instant) -> bool {
        if self.close_at.is_some_and(|at| now >= at) {
            self.open = false;
            self.close_at = None;
        }
        self.open
    }

    /// Last location observed.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Navigation link with its highlight state.
#[derive(Debug, Clone)]
pub struct NavLinkView {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Account menu contents for a signed-in user.
#[derive(Debug, Clone)]
pub struct AccountView {
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<&Session> for AccountView {
    fn from(session: &Session) -> Self {
        Self {
            username: session.username.clone(),
            email: session.email.clone(),
            avatar: session.profile_picture.clone(),
        }
    }
}

/// Everything the header template needs.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub theme: Theme,
    pub account: Option<AccountView>,
    pub nav_links: Vec<NavLinkView>,
    pub mobile_menu_open: bool,
    /// Location to come back to after a header action.
    pub return_to: String,
}

impl HeaderView {
    /// Build the header for `path` (without query) rendered at `return_to`.
    #[must_use]
    pub fn new(
        theme: Theme,
        session: Option<&Session>,
        path: &str,
        return_to: &str,
        mobile_menu_open: bool,
    ) -> Self {
        Self {
            theme,
            account: session.map(AccountView::from),
            nav_links: nav_links(path),
            mobile_menu_open,
            return_to: return_to.to_string(),
        }
    }

    /// Icon shown on the theme toggle.
    #[must_use]
    pub const fn theme_icon(&self) -> &'static str {
        match self.theme {
            Theme::Light => "☀",
            Theme::Dark => "☾",
        }
    }
}

/// Navigation links, highlighting the one matching `current_path`.
#[must_use]
pub fn nav_links(current_path: &str) -> Vec<NavLinkView> {
    NAV_LINKS
        .iter()
        .map(|&(label, href)| NavLinkView {
            label,
            href,
            active: href == current_path,
        })
        .collect()
}
