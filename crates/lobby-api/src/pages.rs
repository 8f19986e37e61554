use axum::response::Html;
use axum_extra::extract::CookieJar;

use crate::flash;

const HOME_BODY: &str = "<h1>Welcome to Our Company</h1>\n\
    <p>We are a leading firm in our industry, committed to providing \
    top-notch services and products to our clients.</p>";

const ABOUT_BODY: &str = "<h1>About us</h1>\n\
    <p>Founded by a small team of consultants, we help our clients plan, \
    build and run the systems their business depends on.</p>";

const SERVICES_BODY: &str = "<h1>Services</h1>\n\
    <ul>\n<li>Strategy consulting</li>\n<li>Custom development</li>\n\
    <li>Ongoing support</li>\n</ul>";

pub async fn home(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, render("Home", message.as_deref(), HOME_BODY))
}

pub async fn about(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, render("About", message.as_deref(), ABOUT_BODY))
}

pub async fn services(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, render("Services", message.as_deref(), SERVICES_BODY))
}

/// Minimal HTML shell. Pages are fixed fragments with the one-shot
/// flash banner prepended; there is deliberately no template engine.
pub(crate) fn render(title: &str, flash_message: Option<&str>, body: &str) -> Html<String> {
    let banner = flash_message
        .map(|m| format!("<p class=\"flash\">{}</p>\n", escape(m)))
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} | Lobby</title></head>\n\
         <body>\n<nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> \
         <a href=\"/services\">Services</a> <a href=\"/contact\">Contact</a> \
         <a href=\"/profile\">Profile</a></nav>\n{banner}{body}\n</body>\n</html>\n"
    ))
}

/// Entity-escape user-controlled text interpolated into markup.
pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert(\"x\") & co</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; co&lt;/script&gt;"
        );
    }

    #[test]
    fn flash_banner_is_rendered_and_escaped() {
        let Html(page) = render("Home", Some("Welcome, <alice>!"), "<h1>hi</h1>");
        assert!(page.contains("class=\"flash\""));
        assert!(page.contains("Welcome, &lt;alice&gt;!"));
        assert!(!page.contains("<alice>"));
    }

    #[test]
    fn no_banner_without_a_flash() {
        let Html(page) = render("Home", None, "<h1>hi</h1>");
        assert!(!page.contains("class=\"flash\""));
    }
}
