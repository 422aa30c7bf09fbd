//! Role-based menus and route guarding.

use serde::Serialize;

use crate::auth::{AuthUser, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const fn item(label: &'static str, href: &'static str) -> NavItem { NavItem { label, href } }

const PUBLIC_MENU: &[NavItem] = &[item("Home", "/"), item("Catalog", "/catalog")];
const CUSTOMER_MENU: &[NavItem] = &[item("Cart", "/cart"), item("Orders", "/orders"), item("Dashboard", "/user/dashboard")];
const CASHIER_MENU: &[NavItem] = &[item("POS", "/pos/dashboard"), item("Inventory", "/inventory")];
const ADMIN_MENU: &[NavItem] = &[
    item("Admin", "/admin/dashboard"),
    item("Inventory", "/admin/inventory"),
    item("Reports", "/admin/reports"),
    item("Users", "/admin/users"),
];

/// Sidebar shown inside the admin section.
pub const ADMIN_SIDEBAR: &[NavItem] = &[
    item("Dashboard", "/admin/dashboard"),
    item("Products", "/admin/products"),
    item("Orders", "/admin/orders"),
    item("Inventory", "/admin/inventory"),
    item("Customers", "/admin/users"),
    item("Reports", "/admin/reports"),
    item("Settings", "/admin/settings"),
];

pub fn menu_for(role: Option<Role>) -> Vec<NavItem> {
    let extra = match role {
        None => &[][..],
        Some(Role::Customer) => CUSTOMER_MENU,
        Some(Role::Cashier) => CASHIER_MENU,
        Some(Role::Admin) => ADMIN_MENU,
    };
    PUBLIC_MENU.iter().chain(extra).copied().collect()
}

/// Where a user lands after signing in.
pub fn landing_path(role: Role) -> &'static str {
    match role {
        Role::Customer => "/user/dashboard",
        Role::Cashier => "/pos/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "to", rename_all = "lowercase")]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Public,
    GuestOnly,
    SignedIn,
    Roles(&'static [Role]),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

fn access_for(path: &str) -> Access {
    if under(path, "/login") || under(path, "/register") { return Access::GuestOnly; }
    if under(path, "/admin") { return Access::Roles(&[Role::Admin]); }
    if under(path, "/pos") || under(path, "/inventory") { return Access::Roles(&[Role::Cashier, Role::Admin]); }
    if under(path, "/user") || under(path, "/checkout") || under(path, "/orders") { return Access::SignedIn; }
    Access::Public
}

/// Decides whether `user` may open `path`.
pub fn guard(path: &str, user: Option<&AuthUser>) -> RouteDecision {
    match (access_for(path), user) {
        (Access::Public, _) => RouteDecision::Allow,
        (Access::GuestOnly, None) => RouteDecision::Allow,
        (Access::GuestOnly, Some(u)) => RouteDecision::Redirect(landing_path(u.role)),
        (Access::SignedIn | Access::Roles(_), None) => RouteDecision::Redirect(LOGIN_PATH),
        (Access::SignedIn, Some(_)) => RouteDecision::Allow,
        (Access::Roles(allowed), Some(u)) if allowed.contains(&u.role) => RouteDecision::Allow,
        (Access::Roles(_), Some(u)) => RouteDecision::Redirect(landing_path(u.role)),
    }
}
