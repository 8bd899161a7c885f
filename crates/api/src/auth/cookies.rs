//! Auth cookie names, `Set-Cookie` builders, and `Cookie` header parsing.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName};

use crate::config::ServerConfig;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_COOKIE: &str = "csrf_token";

/// Refresh cookies are only sent to the auth endpoints.
pub const REFRESH_COOKIE_PATH: &str = "/api/auth";

/// Attributes of one `Set-Cookie` header.
#[derive(Debug, Clone, Copy)]
struct CookieSpec<'a> {
    name: &'a str,
    path: &'a str,
    http_only: bool,
    secure: bool,
}

impl CookieSpec<'_> {
    fn render(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={value}; Path={}; Max-Age={max_age_secs}; SameSite=Strict",
            self.name, self.path
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

fn specs(config: &ServerConfig) -> [CookieSpec<'static>; 3] {
    let secure = config.cookie_secure;
    [
        CookieSpec {
            name: ACCESS_COOKIE,
            path: "/",
            http_only: true,
            secure,
        },
        CookieSpec {
            name: REFRESH_COOKIE,
            path: REFRESH_COOKIE_PATH,
            http_only: true,
            secure,
        },
        CookieSpec {
            name: CSRF_COOKIE,
            path: "/",
            http_only: false,
            secure,
        },
    ]
}

/// `Set-Cookie` headers for a freshly issued session.
///
/// The CSRF cookie lives as long as the refresh token so the pair survives
/// access token renewal.
pub fn session_cookies(
    config: &ServerConfig,
    access_token: &str,
    refresh_token: &str,
    csrf_token: &str,
) -> [(HeaderName, String); 3] {
    let [access, refresh, csrf] = specs(config);
    let access_age = config.jwt.access_max_age_secs();
    let refresh_age = config.jwt.refresh_max_age_secs();
    [
        (SET_COOKIE, access.render(access_token, access_age)),
        (SET_COOKIE, refresh.render(refresh_token, refresh_age)),
        (SET_COOKIE, csrf.render(csrf_token, refresh_age)),
    ]
}

/// `Set-Cookie` headers that expire all three auth cookies.
pub fn cleared_cookies(config: &ServerConfig) -> [(HeaderName, String); 3] {
    specs(config).map(|spec| (SET_COOKIE, spec.render("", 0)))
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;
    use axum::http::HeaderValue;

    fn config(secure: bool) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            upload_dir: "uploads".into(),
            upload_max_bytes: 1024,
            analytics_retention_days: 90,
            cookie_secure: secure,
            jwt: JwtConfig {
                secret: "secret".into(),
                access_token_expiry_mins: 15,
                refresh_token_expiry_days: 7,
            },
        }
    }

    #[test]
    fn session_cookies_carry_expected_attributes() {
        let [access, refresh, csrf] = session_cookies(&config(true), "acc", "ref", "tok");

        assert_eq!(
            access.1,
            "access_token=acc; Path=/; Max-Age=900; SameSite=Strict; HttpOnly; Secure"
        );
        assert_eq!(
            refresh.1,
            "refresh_token=ref; Path=/api/auth; Max-Age=604800; SameSite=Strict; HttpOnly; Secure"
        );
        assert!(!csrf.1.contains("HttpOnly"));
        assert!(csrf.1.starts_with("csrf_token=tok; Path=/;"));
    }

    #[test]
    fn cleared_cookies_expire_immediately() {
        for (_, cookie) in cleared_cookies(&config(false)) {
            assert!(cookie.contains("=; "));
            assert!(cookie.contains("Max-Age=0"));
            assert!(!cookie.contains("Secure"));
        }
    }

    #[test]
    fn reads_cookie_from_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; csrf_token=abc"));
        headers.append(COOKIE, HeaderValue::from_static("access_token=jwt.value.here"));

        assert_eq!(read_cookie(&headers, CSRF_COOKIE).as_deref(), Some("abc"));
        assert_eq!(
            read_cookie(&headers, ACCESS_COOKIE).as_deref(),
            Some("jwt.value.here")
        );
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), None);
    }

    #[test]
    fn empty_cookie_value_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(read_cookie(&headers, ACCESS_COOKIE), None);
    }
}
