use serde::{Deserialize, Serialize};

pub const LOGIN_ERROR: &str = "Invalid username or password. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "sonu".to_string(),
            password: "sonu".to_string(),
        }
    }
}

/// Exact-match credential check guarding the scene
#[derive(Debug, Clone)]
pub struct LoginGate {
    expected: Credentials,
    logged_in: bool,
    error: Option<&'static str>,
}

impl LoginGate {
    pub fn new(expected: Credentials) -> Self {
        Self {
            expected,
            logged_in: false,
            error: None,
        }
    }

    /// Returns true and opens the gate when both strings match exactly
    pub fn submit(&mut self, username: &str, password: &str) -> bool {
        if username == self.expected.username && password == self.expected.password {
            self.logged_in = true;
            self.error = None;
        } else {
            self.logged_in = false;
            self.error = Some(LOGIN_ERROR);
        }
        self.logged_in
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
        self.error = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_open_the_gate() {
        let mut gate = LoginGate::new(Credentials::default());
        assert!(gate.submit("sonu", "sonu"));
        assert!(gate.is_logged_in());
        assert_eq!(gate.error(), None);
    }

    #[test]
    fn comparison_is_exact() {
        let mut gate = LoginGate::new(Credentials::default());
        for (user, pass) in [("Sonu", "sonu"), ("sonu", "sonu "), ("", ""), ("sonu", "")] {
            assert!(!gate.submit(user, pass));
            assert_eq!(gate.error(), Some(LOGIN_ERROR));
        }
    }

    #[test]
    fn success_clears_previous_error() {
        let mut gate = LoginGate::new(Credentials::default());
        gate.submit("x", "y");
        gate.submit("sonu", "sonu");
        assert_eq!(gate.error(), None);

        gate.logout();
        assert!(!gate.is_logged_in());
    }
}
