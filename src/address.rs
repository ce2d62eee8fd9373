//! Syntactic IPv4/IPv6 address checks.
//!
//! The literal is never normalized: `2001:DB8::1` stays as written. Only the
//! shape is checked, not whether the address is routable.

use regex::Regex;
use std::sync::LazyLock;

static IPV4_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").unwrap());

static HEX_GROUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{1,4}$").unwrap());

/// Maximum number of 16-bit groups in an IPv6 address.
const IPV6_GROUPS: usize = 8;

/// Returns `true` if `text` is a syntactically valid IPv4 or IPv6 literal.
///
/// ```
/// use hosts_editor::is_valid_address;
///
/// assert!(is_valid_address("127.0.0.1"));
/// assert!(is_valid_address("2001:db8::1"));
/// assert!(!is_valid_address("256.0.0.1"));
/// assert!(!is_valid_address("not-an-ip"));
/// ```
#[must_use]
pub fn is_valid_address(text: &str) -> bool {
    is_valid_ipv4(text) || is_valid_ipv6(text)
}

/// Four dot-separated decimal groups, each in `0..=255`.
#[must_use]
pub fn is_valid_ipv4(text: &str) -> bool {
    IPV4_REGEX.captures(text).is_some_and(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .all(|group| group.as_str().parse::<u16>().is_ok_and(|n| n <= 255))
    })
}

/// Eight colon-separated hex groups, or fewer around a single `::`.
#[must_use]
pub fn is_valid_ipv6(text: &str) -> bool {
    match text.matches("::").count() {
        0 => {
            let groups: Vec<&str> = text.split(':').collect();
            groups.len() == IPV6_GROUPS && groups.iter().all(|g| HEX_GROUP_REGEX.is_match(g))
        }
        1 => {
            let Some((head, tail)) = text.split_once("::") else {
                return false;
            };
            match (explicit_groups(head), explicit_groups(tail)) {
                (Some(h), Some(t)) => h + t <= IPV6_GROUPS,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Counts the groups on one side of `::`; `None` if any group is malformed.
fn explicit_groups(side: &str) -> Option<usize> {
    if side.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in side.split(':') {
        if !HEX_GROUP_REGEX.is_match(group) {
            return None;
        }
        count += 1;
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ipv4_addresses() {
        for ip in ["127.0.0.1", "0.0.0.0", "255.255.255.255", "10.0.0.5", "192.168.001.1"] {
            assert!(is_valid_address(ip), "{ip}");
        }
    }

    #[test]
    fn invalid_ipv4_addresses() {
        for ip in [
            "256.0.0.1",
            "1.2.3",
            "1.2.3.4.5",
            "1.2.3.4 ",
            " 1.2.3.4",
            "1.2.3.1000",
            "1..3.4",
            "a.b.c.d",
            "",
        ] {
            assert!(!is_valid_address(ip), "{ip:?}");
        }
    }

    #[test]
    fn valid_ipv6_addresses() {
        for ip in [
            "::1",
            "::",
            "2001:db8::1",
            "fe80::",
            "2001:0DB8:85a3:0000:0000:8a2e:0370:7334",
            "2001:db8:85a3::8a2e:370:7334",
            "ff02::2",
        ] {
            assert!(is_valid_address(ip), "{ip}");
        }
    }

    #[test]
    fn invalid_ipv6_addresses() {
        for ip in [
            "1::2::3",
            ":::",
            "gggg::1",
            "2001:db8:85a3:0:0:8a2e:370",
            "2001:db8:85a3:0:0:8a2e:370:7334:1",
            "12345::1",
            "2001:db8::1:",
            ":1::",
            "fe80::1%lo0",
        ] {
            assert!(!is_valid_address(ip), "{ip:?}");
        }
    }

    #[test]
    fn compressed_form_allows_up_to_eight_explicit_groups() {
        assert!(is_valid_ipv6("1:2:3:4::5:6:7"));
        assert!(is_valid_ipv6("1:2:3:4::5:6:7:8"));
        assert!(!is_valid_ipv6("1:2:3:4:5::6:7:8:9"));
    }

    #[test]
    fn text_is_not_an_address() {
        assert!(!is_valid_address("not-an-ip"));
        assert!(!is_valid_address("localhost"));
    }
}
