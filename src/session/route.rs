use serde::{Deserialize, Serialize};

/// Screens the client can show. The wire form doubles as the location-hash
/// token, so `admin-login` can be deep-linked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    Register,
    AdminLogin,
    AdminDashboard,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Register => "register",
            Route::AdminLogin => "admin-login",
            Route::AdminDashboard => "admin-dashboard",
        }
    }
}
