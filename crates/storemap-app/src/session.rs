//! Admin session state.

/// Who is logged in, if anyone. Only admin logins are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    username: Option<String>,
}

impl AdminSession {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.username.is_some()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn begin(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn end(&mut self) {
        self.username = None;
    }
}
