/// Field names used in validation errors.
pub struct TaskFields;

impl TaskFields {
    pub const TITLE: &'static str = "title";
    pub const CATEGORY: &'static str = "category";
    pub const DESCRIPTION: &'static str = "description";
    pub const ORDER: &'static str = "order";
    pub const ID: &'static str = "id";
    pub const BODY: &'static str = "body";
}

/// Largest accepted task position.
pub const MAX_ORDER: i64 = 2_147_483_647;
