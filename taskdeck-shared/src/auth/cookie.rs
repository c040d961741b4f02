/// The session cookie
///
/// Identity travels as a signed bearer token in a cookie named `token`:
/// HTTP-only, `SameSite=Strict`, scoped to the whole site, with a max-age
/// matching the token's 24-hour lifetime, and `Secure` outside local
/// development. This module owns those attributes so login, registration,
/// and every reader agree on them.
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::jwt::SESSION_TTL_SECONDS;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Builds the session cookie carrying a freshly issued token
///
/// `secure` should be true in production (HTTPS) and false in local
/// development.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECONDS));
    cookie
}

/// Reads the session token from a cookie jar, if present
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), false);

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(SESSION_TTL_SECONDS))
        );
    }

    #[test]
    fn test_session_cookie_secure_in_production() {
        let cookie = session_cookie("tok".to_string(), true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_session_token_reads_the_token_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "abc"));
        assert_eq!(session_token(&jar), Some("abc".to_string()));

        let empty = CookieJar::new();
        assert_eq!(session_token(&empty), None);
    }
}
