//! Roles resolved into capabilities once per session, and the screens views navigate to.

use std::fmt;

use blogdesk_api_types::{PostId, Role};

use super::posts::Partition;

/// Screen a view asks the front end to show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Post(PostId),
    AdminDashboard,
    AdminDrafts,
    AdminPublished,
    UserDashboard,
    UserDrafts,
    MyPosts,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/".to_string(),
            Route::Post(id) => format!("/posts/{id}"),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminDrafts => "/admin/drafts".to_string(),
            Route::AdminPublished => "/admin/published".to_string(),
            Route::UserDashboard => "/dashboard".to_string(),
            Route::UserDrafts => "/dashboard/drafts".to_string(),
            Route::MyPosts => "/dashboard/my-posts".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What the signed-in user may do, derived from their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    role: Role,
    pub can_publish: bool,
    pub can_view_all_drafts: bool,
    pub can_view_user_count: bool,
    pub can_access_admin: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        let admin = matches!(role, Role::Admin);
        Self {
            role,
            can_publish: true,
            can_view_all_drafts: admin,
            can_view_user_count: admin,
            can_access_admin: admin,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.can_access_admin
    }

    /// Listing shown after a draft is created.
    pub fn drafts_route(&self) -> Route {
        if self.is_admin() {
            Route::AdminDrafts
        } else {
            Route::MyPosts
        }
    }

    /// Listing shown after a post is published.
    pub fn published_route(&self) -> Route {
        if self.is_admin() {
            Route::AdminPublished
        } else {
            Route::Home
        }
    }

    pub fn dashboard_route(&self) -> Route {
        if self.is_admin() {
            Route::AdminDashboard
        } else {
            Route::UserDashboard
        }
    }

    /// Draft listing this role reviews by default.
    pub fn review_partition(&self) -> Partition {
        if self.can_view_all_drafts {
            Partition::AllDrafts
        } else {
            Partition::Drafts
        }
    }

    pub fn can_list(&self, partition: Partition) -> bool {
        !partition.requires_admin() || self.can_view_all_drafts
    }
}
