use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;

pub const FLASH_COOKIE: &str = "lobby_flash";

/// Queue a one-shot message to show on the next rendered page. The
/// value is base64-encoded so arbitrary text fits the cookie grammar.
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, B64.encode(message)))
        .path("/")
        .build();
    jar.add(cookie)
}

/// Pop the pending message, removing the cookie so it shows only once.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) {
        Some(value) => {
            let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
            (jar, decode(&value))
        }
        None => (jar, None),
    }
}

pub fn decode(value: &str) -> Option<String> {
    let bytes = B64.decode(value).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_take_shows_once() {
        let jar = set(CookieJar::new(), "Welcome, alice!");
        let (jar, message) = take(jar);
        assert_eq!(message.as_deref(), Some("Welcome, alice!"));

        let (_, message) = take(jar);
        assert_eq!(message, None);
    }

    #[test]
    fn empty_jar_has_no_flash() {
        let (_, message) = take(CookieJar::new());
        assert_eq!(message, None);
    }

    #[test]
    fn survives_text_outside_the_cookie_grammar() {
        let jar = set(CookieJar::new(), "semicolons; \"quotes\"; und Grüße");
        let (_, message) = take(jar);
        assert_eq!(message.as_deref(), Some("semicolons; \"quotes\"; und Grüße"));
    }
}
