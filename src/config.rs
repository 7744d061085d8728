use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardline";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name of the ward office this deployment serves.
pub const WARD_NAME: &str = "Phường Đông Hòa";
pub const OFFICE_NAME: &str = "Trung tâm Phục vụ Hành chính công";

/// Default port for the local citizen-facing API.
pub const DEFAULT_API_PORT: u16 = 8787;

/// Environment variable holding the hosted-AI API key.
pub const AI_API_KEY_ENV: &str = "WARDLINE_AI_API_KEY";
/// Environment variable overriding the hosted-AI endpoint (tests, proxies).
pub const AI_BASE_URL_ENV: &str = "WARDLINE_AI_BASE_URL";
/// Environment variable holding the optional booking webhook endpoint.
pub const BOOKING_WEBHOOK_ENV: &str = "WARDLINE_BOOKING_WEBHOOK";

/// Get the application data directory
/// ~/Wardline/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Path of the device-local citizen profile store (key/value JSON).
pub fn profile_store_path() -> PathBuf {
    app_data_dir().join("profile.json")
}

/// Socket address the API server binds to.
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("WARDLINE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_API_PORT);
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,wardline=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn profile_store_under_app_data() {
        let path = profile_store_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("profile.json"));
    }

    #[test]
    fn bind_addr_is_loopback() {
        let addr = bind_addr();
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.4.0");
    }
}
