use crate::model::post::{PostFilter, PostType};

/// Largest page the listing endpoints return
pub const MAX_PAGE_SIZE: u32 = 20;

/// Options of a blog's post listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsQuery {
    /// `All` lists every type, anything else narrows the listing to `posts/{type}`
    pub post_type: PostType,
    pub offset: i64,
    pub limit: u32,
    pub reblog_info: bool,
    pub notes_info: bool,
    pub filter: PostFilter,
    pub tag: Option<String>,
}

impl Default for PostsQuery {
    fn default() -> Self {
        PostsQuery {
            post_type: PostType::All,
            offset: 0,
            limit: MAX_PAGE_SIZE,
            reblog_info: false,
            notes_info: false,
            filter: PostFilter::Html,
            tag: None,
        }
    }
}

impl PostsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, post_type: PostType) -> Self {
        self.post_type = post_type;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_reblog_info(mut self, reblog_info: bool) -> Self {
        self.reblog_info = reblog_info;
        self
    }

    pub fn with_notes_info(mut self, notes_info: bool) -> Self {
        self.notes_info = notes_info;
        self
    }

    pub fn with_filter(mut self, filter: PostFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Position in the dashboard to page from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCursor {
    /// Posts newer than the given post id
    SinceId(i64),
    /// Posts older than the given post id
    Before(i64),
    /// Posts newer than the given post id, oldest first
    After(i64),
}

impl DashboardCursor {
    pub(crate) fn parameter(&self) -> (&'static str, i64) {
        match *self {
            DashboardCursor::SinceId(id) => ("since_id", id),
            DashboardCursor::Before(id) => ("before_id", id),
            DashboardCursor::After(id) => ("after_id", id),
        }
    }
}

/// Options of the dashboard listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub cursor: Option<DashboardCursor>,
    pub offset: i64,
    pub limit: u32,
    pub post_type: PostType,
    pub reblog_info: bool,
    pub notes_info: bool,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        DashboardQuery {
            cursor: None,
            offset: 0,
            limit: MAX_PAGE_SIZE,
            post_type: PostType::All,
            reblog_info: false,
            notes_info: false,
        }
    }
}

impl DashboardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, cursor: DashboardCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_type(mut self, post_type: PostType) -> Self {
        self.post_type = post_type;
        self
    }

    pub fn with_reblog_info(mut self, reblog_info: bool) -> Self {
        self.reblog_info = reblog_info;
        self
    }

    pub fn with_notes_info(mut self, notes_info: bool) -> Self {
        self.notes_info = notes_info;
        self
    }
}
