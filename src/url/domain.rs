/// Extracts the host exactly as written in an absolute or protocol-relative
/// URL string
///
/// Parsed [`url::Url`] values carry a lowercased host, so origin comparison
/// works on the source text instead. User info and port are dropped; IPv6
/// literals keep their brackets. Returns `None` for relative references and
/// for URLs without an authority (`tel:`, `data:`).
///
/// # Examples
///
/// ```
/// use page_analyzer::url::written_host;
///
/// assert_eq!(written_host("https://EXAMPLE.com:8080/path"), Some("EXAMPLE.com"));
/// assert_eq!(written_host("//cdn.example.net/lib.js"), Some("cdn.example.net"));
/// assert_eq!(written_host("/relative/path"), None);
/// assert_eq!(written_host("tel:+123456"), None);
/// ```
pub fn written_host(s: &str) -> Option<&str> {
    let after_scheme = match s.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = s.split_once(':')?;
            if !is_scheme(scheme) {
                return None;
            }
            rest.strip_prefix("//")?
        }
    };

    let authority_end = after_scheme
        .find(&['/', '\\', '?', '#'][..])
        .unwrap_or(after_scheme.len());
    let authority = &after_scheme[..authority_end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    let host = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        }
    } else {
        host_port.split(':').next().unwrap_or(host_port)
    };

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Returns true if a link string names a scheme (`https:`, `tel:`)
pub fn has_scheme(s: &str) -> bool {
    s.split_once(':')
        .map_or(false, |(scheme, _)| is_scheme(scheme))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Returns true if both URL strings carry the same written host
///
/// The comparison is case-sensitive. Subdomains are distinct hosts:
/// `blog.example.com` is not the same host as `example.com`. Strings
/// without a host never match.
pub fn same_host(a: &str, b: &str) -> bool {
    match (written_host(a), written_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
