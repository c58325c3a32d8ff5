//! Go toolchain version syntax
//!
//! Accepted forms follow the `go` command's own rules:
//! - Release: go1, go1.21, go1.21.0
//! - Prerelease: go1.21rc1, go1.21beta2 (only after the minor version)
//! - Vendor suffix: go1.21.0-bigcorp (everything after `-` is ignored)
//!
//! Numbers never carry leading zeros.

/// Reports whether `version` is a valid Go toolchain version
pub fn is_valid(version: &str) -> bool {
    let Some(rest) = strip_go_prefix(version) else {
        return false;
    };
    parse_release(rest).is_some()
}

fn strip_go_prefix(version: &str) -> Option<&str> {
    let version = version.split_once('-').map_or(version, |(head, _)| head);
    version.strip_prefix("go")
}

/// Checks a release such as `1.21rc1` with the `go` prefix removed
fn parse_release(x: &str) -> Option<()> {
    let (_major, x) = cut_int(x)?;
    if x.is_empty() {
        return Some(());
    }

    let x = x.strip_prefix('.')?;
    let (_minor, x) = cut_int(x)?;
    if x.is_empty() {
        return Some(());
    }

    if let Some(x) = x.strip_prefix('.') {
        // Prereleases are not allowed on patch releases
        let (_patch, x) = cut_int(x)?;
        return x.is_empty().then_some(());
    }

    let kind_len = x.bytes().take_while(|b| !b.is_ascii_digit()).count();
    let (kind, x) = x.split_at(kind_len);
    if kind.is_empty() || !kind.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    if x.is_empty() {
        return Some(());
    }

    let (_pre, x) = cut_int(x)?;
    x.is_empty().then_some(())
}

/// Splits off a leading decimal number without leading zeros
fn cut_int(x: &str) -> Option<(&str, &str)> {
    let len = x.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 || (len > 1 && x.starts_with('0')) {
        return None;
    }
    Some(x.split_at(len))
}
