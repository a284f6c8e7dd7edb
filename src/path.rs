//! Path Resolver
//!
//! Expands environment-variable templates such as `$HOME/.config` into
//! concrete paths. Both `$NAME` and `${NAME}` forms are recognised; an
//! unset variable expands to the empty string and the result is not
//! validated.

use std::env;
use std::path::PathBuf;

/// Base configuration directory. Must exist before `install` runs.
pub const CONFIG_DIR_TEMPLATE: &str = "$HOME/.config";

/// Directory owned by this tool, created by `install`.
pub const APP_DIR_TEMPLATE: &str = "$HOME/.config/bbolt-ci";

/// Default database file.
pub const DB_PATH_TEMPLATE: &str = "$HOME/.config/bbolt-ci/local.bbolt";

/// Expand a template against the current process environment.
pub fn expand(template: &str) -> String {
    expand_with(template, |name| env::var(name).ok())
}

/// Expand a template into a `PathBuf` against the process environment.
pub fn expand_path(template: &str) -> PathBuf {
    PathBuf::from(expand(template))
}

/// Expand a template using `lookup` to resolve variable names.
///
/// A `$` that does not start a variable name (end of input, `$/`, `$$`)
/// is copied through unchanged. An unterminated `${` is copied through too.
pub fn expand_with<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    out.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}
