/// Which per-user list an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Favourites,
    History,
}

impl ListKind {
    /// Name used in logs and as the `list` column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Favourites => "favourites",
            ListKind::History => "history",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub favourites: Vec<String>,
    pub history: Vec<String>,
}

impl User {
    pub fn new(id: u64, username: String, password_hash: String) -> Self {
        User {
            id,
            username,
            password_hash,
            favourites: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn list(&self, kind: ListKind) -> &Vec<String> {
        match kind {
            ListKind::Favourites => &self.favourites,
            ListKind::History => &self.history,
        }
    }
}
