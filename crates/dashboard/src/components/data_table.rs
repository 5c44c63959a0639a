//! Posts table component types.
//!
//! Column definitions and row views for the post-management table.

use ideafusion_core::Post;
use serde::{Deserialize, Serialize};

use crate::filters::format_date;
use crate::services::PostListSnapshot;

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Render the label for screen readers only.
    pub label_hidden: bool,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            label_hidden: false,
        }
    }

    /// Keep the label for accessibility but do not show it.
    #[must_use]
    pub const fn hidden_label(mut self) -> Self {
        self.label_hidden = true;
        self
    }
}

/// Columns of the posts table, in display order.
#[must_use]
pub fn posts_table_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("updated_at", "Date updated"),
        TableColumn::new("image", "Post image"),
        TableColumn::new("title", "Post title"),
        TableColumn::new("category", "Category"),
        TableColumn::new("delete", "Delete"),
        TableColumn::new("edit", "Edit").hidden_label(),
    ]
}

/// One row of the posts table.
#[derive(Debug, Clone)]
pub struct PostRowView {
    pub id: String,
    pub updated: String,
    pub image: String,
    pub title: String,
    pub category: String,
    pub permalink: String,
    pub edit_href: String,
}

impl From<&Post> for PostRowView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            updated: format_date(&post.updated_at),
            image: post.image.clone(),
            title: post.title.clone(),
            category: post.category.clone(),
            permalink: post.permalink(),
            edit_href: post.edit_path(),
        }
    }
}

/// State of the posts sub-view.
#[derive(Debug, Clone)]
pub struct PostsPanelView {
    /// Initial load outstanding: show the spinner instead of the table.
    pub loading: bool,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<PostRowView>,
    pub show_more: bool,
    /// Post awaiting delete confirmation.
    pub confirm_delete: Option<String>,
}

impl PostsPanelView {
    /// Whether the table (rather than the empty state) is shown.
    #[must_use]
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Panel for the controller's current window.
    ///
    /// A pending initial load shows the spinner even when an older window is
    /// still cached. Users who cannot manage posts get the empty state.
    #[must_use]
    pub fn from_snapshot(snapshot: &PostListSnapshot, can_manage: bool) -> Self {
        let rows: Vec<PostRowView> = if can_manage {
            snapshot.items.iter().map(PostRowView::from).collect()
        } else {
            Vec::new()
        };

        Self {
            loading: snapshot.pending,
            columns: posts_table_columns(),
            show_more: snapshot.has_more && !rows.is_empty(),
            rows,
            confirm_delete: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ideafusion_core::{PostId, UserId};

    use super::*;

    #[test]
    fn test_posts_columns() {
        let labels: Vec<_> = posts_table_columns()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(
            labels,
            ["Date updated", "Post image", "Post title", "Category", "Delete", "Edit"]
        );
    }

    fn post(id: &str) -> Post {
        Post {
            id: PostId::new(id),
            user_id: UserId::new("u1"),
            title: "Ownership in practice".to_string(),
            slug: "ownership-in-practice".to_string(),
            category: "rust".to_string(),
            image: "https://img.example/p9.png".to_string(),
            content: None,
            created_at: None,
            updated_at: Utc.with_ymd_and_hms(2024, 11, 5, 8, 0, 0).unwrap(),
        }
    }

    fn snapshot(items: Vec<Post>, has_more: bool, pending: bool) -> PostListSnapshot {
        PostListSnapshot {
            owner: Some(UserId::new("u1")),
            items,
            has_more,
            pending,
        }
    }

    #[test]
    fn test_pending_reload_shows_spinner_over_cached_rows() {
        let panel = PostsPanelView::from_snapshot(&snapshot(vec![post("p1")], true, true), true);
        assert!(panel.loading);
    }

    #[test]
    fn test_settled_window_shows_rows_and_show_more() {
        let panel =
            PostsPanelView::from_snapshot(&snapshot(vec![post("p1"), post("p2")], true, false), true);
        assert!(!panel.loading);
        assert_eq!(panel.rows.len(), 2);
        assert!(panel.show_more);

        let panel = PostsPanelView::from_snapshot(&snapshot(vec![post("p1")], false, false), true);
        assert!(!panel.show_more);
    }

    #[test]
    fn test_non_admin_gets_empty_state() {
        let panel = PostsPanelView::from_snapshot(&snapshot(vec![post("p1")], true, false), false);
        assert!(!panel.has_rows());
        assert!(!panel.show_more);
    }

    #[test]
    fn test_row_from_post() {
        let post = post("p9");

        let row = PostRowView::from(&post);
        assert_eq!(row.updated, "11/5/2024");
        assert_eq!(row.permalink, "/post/ownership-in-practice");
        assert_eq!(row.edit_href, "/update-post/p9");
    }
}
