//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = true;

pub mod client {
    pub const CLIENT_DEFAULT_API_BASE_URL: &str = "http://localhost:5001/api";

    /// Upper bound on redirects followed for a single navigation. The route
    /// table never needs more than two.
    pub const CLIENT_MAX_REDIRECT_HOPS: usize = 8;
}

pub mod storage {
    /// Key the persisted session snapshot is stored under
    pub const STORAGE_AUTH_STATE_KEY: &str = "emp_auth_state";
}

/// Client side navigation paths (screens)
pub mod screen {
    pub const SCREEN_ROOT: &str = "/";
    pub const SCREEN_LOGIN: &str = "/login";
    /// Where authenticated users land when nothing more specific applies
    pub const SCREEN_DEFAULT_LANDING: &str = SCREEN_DASHBOARD;
    pub const SCREEN_DASHBOARD: &str = "/dashboard";
    pub const SCREEN_EMPLOYEES: &str = "/employees";
    pub const SCREEN_DEPARTMENTS: &str = "/departments";
    pub const SCREEN_ATTENDANCE: &str = "/attendance";
    pub const SCREEN_LEAVE_REQUEST: &str = "/attendance/leave-request";
    pub const SCREEN_OVERTIME: &str = "/overtime";
    pub const SCREEN_PROFILE: &str = "/profile";
    pub const SCREEN_REPORTS: &str = "/reports";
    pub const SCREEN_REPORTS_ACTIVITY: &str = "/reports/activity";
    pub const SCREEN_ACTIVITY_LOGS: &str = "/activity-logs";
}

/// REST endpoints relative to the API base url
pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_ME: PathSpec = PathSpec::get("/auth/me");
}

#[cfg(test)]
mod tests {
    use static_assertions::const_assert;

    use super::client::CLIENT_MAX_REDIRECT_HOPS;

    // Login -> dashboard and leave request -> attendance are the longest chains
    const_assert!(CLIENT_MAX_REDIRECT_HOPS >= 2);

    #[test]
    fn screens_are_absolute() {
        use super::screen::*;
        for screen in [
            SCREEN_ROOT,
            SCREEN_LOGIN,
            SCREEN_DEFAULT_LANDING,
            SCREEN_EMPLOYEES,
            SCREEN_DEPARTMENTS,
            SCREEN_ATTENDANCE,
            SCREEN_LEAVE_REQUEST,
            SCREEN_OVERTIME,
            SCREEN_PROFILE,
            SCREEN_REPORTS,
            SCREEN_REPORTS_ACTIVITY,
            SCREEN_ACTIVITY_LOGS,
        ] {
            assert!(screen.starts_with('/'), "{screen:?}");
        }
    }
}
