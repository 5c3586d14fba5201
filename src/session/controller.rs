use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::{models::UserProfile, Database};

use super::route::Route;

/// Hardcoded credential pair, compared verbatim. There is no server-side
/// session; the persisted flag is client-trusted.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub route: Route,
    pub current_user: Option<UserProfile>,
    pub is_admin: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            route: Route::Register,
            current_user: None,
            is_admin: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub department: String,
    pub semester: String,
}

/// Explicit session object: constructed at startup from persisted storage and
/// mutated only through the transitions below.
#[derive(Clone)]
pub struct SessionController {
    db: Database,
    state: Arc<Mutex<SessionState>>,
}

impl SessionController {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.lock().await.current_user.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.state.lock().await.is_admin
    }

    /// Restore the session from storage. A registered profile starts on Home,
    /// otherwise on Register; the admin-login deep link wins over both.
    /// Nothing else deep-links.
    pub async fn bootstrap(&self, hint: Option<Route>) -> Result<SessionState> {
        let current_user = self.db.load_current_user().await?;
        let is_admin = self.db.load_admin_flag().await?;

        let route = if hint == Some(Route::AdminLogin) {
            Route::AdminLogin
        } else if current_user.is_some() {
            Route::Home
        } else {
            Route::Register
        };

        let mut state = self.state.lock().await;
        *state = SessionState {
            route,
            current_user,
            is_admin,
        };
        Ok(state.clone())
    }

    pub async fn navigate(&self, requested: Route) -> SessionState {
        let mut state = self.state.lock().await;
        state.route = resolve(requested, state.current_user.is_some(), state.is_admin);
        state.clone()
    }

    /// Persist the new profile into both the current-user slot and the
    /// directory (independent snapshots, never reconciled), then land on Home.
    pub async fn register(&self, form: RegistrationForm) -> Result<SessionState> {
        let required = [
            ("name", &form.name),
            ("phone", &form.phone),
            ("vehicle number", &form.vehicle_number),
            ("department", &form.department),
            ("semester", &form.semester),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            bail!("{field} is required");
        }

        let profile = UserProfile {
            id: Uuid::new_v4().to_string(),
            name: form.name,
            phone: form.phone,
            vehicle_number: form.vehicle_number.to_uppercase(),
            department: form.department,
            semester: form.semester,
            registered_at: Utc::now().timestamp_millis(),
        };

        self.db.append_to_directory(&profile).await?;
        self.db.save_current_user(&profile).await?;

        let mut state = self.state.lock().await;
        state.current_user = Some(profile);
        state.route = Route::Home;
        Ok(state.clone())
    }

    /// Exact string comparison; a mismatch is a recoverable error and leaves
    /// the state untouched. No lockout, no attempt limit.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<SessionState> {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            bail!("Invalid admin credentials");
        }

        self.db.save_admin_flag().await?;

        let mut state = self.state.lock().await;
        state.is_admin = true;
        state.route = Route::AdminDashboard;
        Ok(state.clone())
    }

    pub async fn admin_logout(&self) -> Result<SessionState> {
        self.db.clear_admin_flag().await?;

        let mut state = self.state.lock().await;
        state.is_admin = false;
        state.route = resolve(Route::Home, state.current_user.is_some(), false);
        Ok(state.clone())
    }
}

/// Guard order: missing profile forces Register for everything except the two
/// admin screens; the dashboard additionally requires the admin flag.
fn resolve(requested: Route, has_profile: bool, is_admin: bool) -> Route {
    match requested {
        Route::AdminLogin => Route::AdminLogin,
        Route::AdminDashboard => {
            if is_admin {
                Route::AdminDashboard
            } else {
                Route::AdminLogin
            }
        }
        other => {
            if has_profile {
                other
            } else {
                Route::Register
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn temp_db() -> Database {
        let path = std::env::temp_dir().join(format!("whoparked-test-{}.sqlite3", Uuid::new_v4()));
        Database::new(path).unwrap()
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Alice".to_string(),
            phone: "9087654321".to_string(),
            vehicle_number: "kl01ab1234".to_string(),
            department: "IMCA".to_string(),
            semester: "S2".to_string(),
        }
    }

    #[test]
    fn resolve_guards_follow_profile_and_admin_flags() {
        // No profile: everything except the admin screens lands on Register.
        assert_eq!(resolve(Route::Home, false, false), Route::Register);
        assert_eq!(resolve(Route::Register, false, false), Route::Register);
        assert_eq!(resolve(Route::AdminLogin, false, false), Route::AdminLogin);

        // The dashboard needs the admin flag regardless of profile presence.
        assert_eq!(resolve(Route::AdminDashboard, false, false), Route::AdminLogin);
        assert_eq!(resolve(Route::AdminDashboard, true, false), Route::AdminLogin);
        assert_eq!(
            resolve(Route::AdminDashboard, true, true),
            Route::AdminDashboard
        );

        // With a profile, plain routes resolve as requested.
        assert_eq!(resolve(Route::Home, true, false), Route::Home);
        assert_eq!(resolve(Route::Register, true, false), Route::Register);
    }

    #[tokio::test]
    async fn bootstrap_lands_on_register_without_a_profile() {
        let controller = SessionController::new(temp_db());
        let state = controller.bootstrap(None).await.unwrap();
        assert_eq!(state.route, Route::Register);
        assert!(state.current_user.is_none());
        assert!(!state.is_admin);
    }

    #[tokio::test]
    async fn bootstrap_admin_login_hint_wins_over_profile() {
        let controller = SessionController::new(temp_db());
        controller.register(form()).await.unwrap();

        let state = controller.bootstrap(Some(Route::AdminLogin)).await.unwrap();
        assert_eq!(state.route, Route::AdminLogin);
        assert!(state.current_user.is_some());
    }

    #[tokio::test]
    async fn register_persists_both_snapshots_and_routes_home() {
        let db = temp_db();
        let controller = SessionController::new(db.clone());

        let state = controller.register(form()).await.unwrap();
        assert_eq!(state.route, Route::Home);

        let profile = state.current_user.expect("profile should be set");
        assert_eq!(profile.vehicle_number, "KL01AB1234");

        assert_eq!(db.load_current_user().await.unwrap(), Some(profile.clone()));
        let directory = db.load_directory().await.unwrap();
        assert_eq!(directory.last(), Some(&profile));
    }

    #[tokio::test]
    async fn register_rejects_a_missing_field_by_name() {
        let controller = SessionController::new(temp_db());
        let mut incomplete = form();
        incomplete.phone = String::new();

        let err = controller.register(incomplete).await.unwrap_err();
        assert_eq!(err.to_string(), "phone is required");
    }

    #[tokio::test]
    async fn admin_login_accepts_only_the_fixed_pair() {
        let db = temp_db();
        let controller = SessionController::new(db.clone());

        let err = controller.admin_login("admin", "wrong").await.unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(!controller.is_admin().await);
        assert!(!db.load_admin_flag().await.unwrap());

        let state = controller.admin_login("admin", "admin123").await.unwrap();
        assert_eq!(state.route, Route::AdminDashboard);
        assert!(state.is_admin);
        assert!(db.load_admin_flag().await.unwrap());
    }

    #[tokio::test]
    async fn admin_logout_clears_the_flag_and_respects_the_profile_guard() {
        let db = temp_db();
        let controller = SessionController::new(db.clone());
        controller.admin_login("admin", "admin123").await.unwrap();

        // No profile registered: logging out falls through to Register.
        let state = controller.admin_logout().await.unwrap();
        assert_eq!(state.route, Route::Register);
        assert!(!state.is_admin);
        assert!(!db.load_admin_flag().await.unwrap());

        controller.register(form()).await.unwrap();
        controller.admin_login("admin", "admin123").await.unwrap();
        let state = controller.admin_logout().await.unwrap();
        assert_eq!(state.route, Route::Home);
    }
}
