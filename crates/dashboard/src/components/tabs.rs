//! Dashboard tab selection.
//!
//! The dashboard shows at most one sub-view, chosen by the `tab` query
//! parameter. Missing or unknown values select nothing.

use serde::Deserialize;

/// Sub-views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    Profile,
    Posts,
}

impl DashboardTab {
    /// Every tab, in sidebar order.
    pub const ALL: [Self; 2] = [Self::Profile, Self::Posts];

    /// Resolve the `tab` query value. Unknown values are ignored.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value? {
            "profile" => Some(Self::Profile),
            "posts" => Some(Self::Posts),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Posts => "posts",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Posts => "Posts",
        }
    }

    /// Dashboard URL selecting this tab.
    #[must_use]
    pub fn href(self) -> String {
        format!("/dashboard?tab={}", self.as_str())
    }
}

/// Query string of `GET /dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
}

impl DashboardQuery {
    #[must_use]
    pub fn selected(&self) -> Option<DashboardTab> {
        DashboardTab::from_query(self.tab.as_deref())
    }
}

/// Sidebar entry.
#[derive(Debug, Clone)]
pub struct TabLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Sidebar entries with the selected tab highlighted.
#[must_use]
pub fn tab_links(selected: Option<DashboardTab>) -> Vec<TabLink> {
    DashboardTab::ALL
        .iter()
        .map(|&tab| TabLink {
            label: tab.label(),
            href: tab.href(),
            active: selected == Some(tab),
        })
        .collect()
}
