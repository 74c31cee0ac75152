use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ILLEGAL: Regex = Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex");
    static ref MARKUP: Regex = Regex::new(r"\[/?(?:tab|ch)\]").expect("valid regex");
}

/// Drop characters that common filesystems reject in file names.
pub fn clean_filename(name: &str) -> String {
    ILLEGAL.replace_all(name, "").into_owned()
}

/// Remove `[tab]`, `[/tab]`, `[ch]` and `[/ch]`. Repeats until stable so that
/// removing one token cannot leave another one behind (`[t[tab]ab]`).
pub fn strip_markup(body: &str) -> String {
    let mut out = body.to_string();
    while MARKUP.is_match(&out) {
        out = MARKUP.replace_all(&out, "").into_owned();
    }
    out
}
