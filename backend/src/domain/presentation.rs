//! Navigation menus and small formatting helpers.
//!
//! Menus are computed from an explicit [`RequestContext`] rather than from
//! any ambient "current user" lookup.

use serde::Serialize;

use crate::domain::User;

/// Sections grouped under the "Manage" menu.
pub const MANAGE_PAGES: [&str; 8] = [
    "users",
    "clients",
    "projects",
    "roles",
    "activity_types",
    "activity_custom_properties",
    "currencies",
    "settings",
];

/// What the client is looking at, plus who is asking.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub current_user: Option<&'a User>,
    pub controller: &'a str,
    pub action: &'a str,
    pub filter: Option<&'a str>,
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: &'static str,
    pub path: String,
    pub selected: bool,
}

impl MenuItem {
    fn new(title: &'static str, path: impl Into<String>, selected: bool) -> Self {
        Self {
            title,
            path: path.into(),
            selected,
        }
    }
}

fn is_manage_page(controller: &str) -> bool {
    MANAGE_PAGES.contains(&controller)
}

/// Top-level navigation. Empty without a signed-in user.
pub fn main_menu_items(ctx: &RequestContext<'_>) -> Vec<MenuItem> {
    let Some(user) = ctx.current_user else {
        return Vec::new();
    };

    let mut items = vec![MenuItem::new(
        "Activities",
        "/activities",
        ctx.controller == "activities",
    )];

    if user.is_client_user() {
        items.push(MenuItem::new(
            "Projects",
            "/projects",
            ctx.controller == "projects" && ctx.action == "index",
        ));
    }

    if user.is_admin() || user.is_client_user() {
        items.push(MenuItem::new(
            "Invoices",
            "/invoices",
            ctx.controller == "invoices",
        ));
    }

    if user.is_admin() {
        items.push(MenuItem::new(
            "Manage",
            "/users",
            is_manage_page(ctx.controller),
        ));
    }

    items
}

/// Second-level navigation for the current section.
pub fn sub_menu_items(ctx: &RequestContext<'_>) -> Vec<MenuItem> {
    let Some(user) = ctx.current_user else {
        return Vec::new();
    };
    let controller = ctx.controller;

    if is_manage_page(controller) {
        if !user.is_admin() {
            return Vec::new();
        }
        return [
            ("Users", "/users", "users"),
            ("Clients", "/clients", "clients"),
            ("Projects", "/projects", "projects"),
            ("Roles", "/roles", "roles"),
            ("Activity types", "/activity_types", "activity_types"),
            (
                "Custom activity properties",
                "/activity_custom_properties",
                "activity_custom_properties",
            ),
            ("Currencies", "/currencies", "currencies"),
            ("Settings", "/settings/edit", "settings"),
        ]
        .into_iter()
        .map(|(title, path, page)| MenuItem::new(title, path, controller == page))
        .collect();
    }

    match controller {
        "invoices" => vec![
            MenuItem::new("All", "/invoices", ctx.filter.is_none()),
            MenuItem::new("Issued", "/invoices/issued", ctx.filter == Some("issued")),
            MenuItem::new("Pending", "/invoices/pending", ctx.filter == Some("pending")),
        ],
        "activities" if user.is_employee() => vec![
            MenuItem::new("List", "/activities", ctx.action == "index"),
            MenuItem::new(
                "Calendar",
                format!("/users/{}/calendar", user.id),
                ctx.action == "calendar",
            ),
        ],
        _ => Vec::new(),
    }
}

/// Render minutes as `H:MM`; `"0"` when nothing was logged.
///
/// # Examples
/// ```
/// use timesheet::domain::format_minutes;
///
/// assert_eq!(format_minutes(Some(125)), "2:05");
/// assert_eq!(format_minutes(None), "0");
/// ```
pub fn format_minutes(minutes: Option<u32>) -> String {
    match minutes {
        Some(minutes) => format!("{}:{:02}", minutes / 60, minutes % 60),
        None => "0".to_owned(),
    }
}
