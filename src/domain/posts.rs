//! Post partitions: which listing endpoint a post was returned by.

use std::fmt;

/// A post is a draft or published according to the listing that returned it.
/// `Mine` and `AllDrafts` are scoped views over the same two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Published,
    Drafts,
    AllDrafts,
    Mine,
}

impl Partition {
    /// Listing path relative to the API root.
    pub fn path(self) -> &'static str {
        match self {
            Partition::Published => "api/posts",
            Partition::Drafts => "api/posts/drafts",
            Partition::AllDrafts => "api/posts/drafts/all",
            Partition::Mine => "api/posts/my-posts",
        }
    }

    pub fn requires_credential(self) -> bool {
        !matches!(self, Partition::Published)
    }

    pub fn requires_admin(self) -> bool {
        matches!(self, Partition::AllDrafts)
    }

    /// Drafts can be selected and bulk-published; published posts cannot go back.
    pub fn holds_drafts(self) -> bool {
        matches!(self, Partition::Drafts | Partition::AllDrafts)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Published => "published",
            Partition::Drafts => "drafts",
            Partition::AllDrafts => "all-drafts",
            Partition::Mine => "mine",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Partition::Published => "published posts",
            Partition::Drafts | Partition::AllDrafts => "drafts",
            Partition::Mine => "posts",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
