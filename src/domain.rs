//! Domain normalization utilities.
//!
//! These transforms turn raw domain or URL input into comparable tokens:
//! - `normalize_domain()` - lowercase host without scheme, www, path or query
//! - `clean_domain()` - normalized host with the TLD stripped
//! - `clean_business_name()` - the domain reduced to a business-name token

/// Multi-part TLDs that a plain "strip the last label" pass would mangle.
const MULTI_PART_TLDS: &[&str] = &[
    "co.uk", "com.au", "co.nz", "co.jp", "co.in", "com.br", "com.mx", "co.za", "com.sg",
    "com.hk", "com.tr", "co.th", "com.tw", "com.cn", "com.vn", "com.ph", "com.my", "com.ar",
    "com.pe", "com.ve", "com.co", "com.ec", "com.uy", "com.py", "com.bo", "com.gt", "com.sv",
    "com.hn", "com.ni", "com.cr", "com.pa", "com.do", "org.uk", "net.au", "org.au",
];

/// Corporate suffixes stripped when deriving a business-name token.
const BUSINESS_SUFFIXES: &[&str] = &[
    "ltd",
    "limited",
    "inc",
    "incorporated",
    "llc",
    "corp",
    "corporation",
    "co",
    "company",
    "services",
    "solutions",
    "group",
    "holdings",
    "enterprises",
];

/// Site-builder host suffixes stripped during normalization so that
/// "acme.wixsite.com" compares as "acme".
const SITE_BUILDER_SUFFIXES: &[&str] = &[
    ".wordpress.com",
    ".wixsite.com",
    ".squarespace.com",
    ".shopify.com",
];

/// Normalizes a raw domain or URL into a bare lowercase host.
///
/// Strips the scheme, a leading `www.`, everything from the first `/`
/// (path, query), trailing slashes, and well-known site-builder suffixes.
/// Idempotent: normalizing an already-normalized value is a no-op.
/// Empty input yields empty output.
pub fn normalize_domain(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let trimmed = url.trim();
    // Proper URLs go through the parser; bare hosts are handled textually
    let mut normalized = match trimmed
        .contains("://")
        .then(|| url::Url::parse(trimmed))
        .and_then(Result::ok)
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
    {
        Some(host) => host,
        None => trimmed.to_lowercase(),
    };

    if let Some(rest) = normalized
        .strip_prefix("https://")
        .or_else(|| normalized.strip_prefix("http://"))
    {
        normalized = rest.to_string();
    }
    while let Some(rest) = normalized.strip_prefix("www.") {
        normalized = rest.to_string();
    }

    // Drop path, query and trailing slashes in one go
    normalized = normalized
        .split('/')
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string();

    for suffix in SITE_BUILDER_SUFFIXES {
        if let Some(rest) = normalized.strip_suffix(suffix) {
            normalized = rest.to_string();
            break;
        }
    }

    normalized
}

/// Normalizes a domain and strips its TLD, handling multi-part TLDs
/// (e.g. "example.co.uk" becomes "example").
pub fn clean_domain(domain: &str) -> String {
    let cleaned = normalize_domain(domain);

    for tld in MULTI_PART_TLDS {
        if let Some(rest) = cleaned.strip_suffix(&format!(".{tld}")) {
            log::debug!("Found multi-part TLD .{tld}, cleaned domain: {rest}");
            return rest.to_string();
        }
    }

    // Single-part TLD: drop the last dot-separated label
    match cleaned.rfind('.') {
        Some(idx) => cleaned[..idx].to_string(),
        None => cleaned,
    }
}

/// Reduces a domain to a comparable business-name token.
///
/// Strips the TLD, removes a trailing corporate suffix (separated by
/// `-`/`_`, or unseparated when the suffix is long enough not to be part
/// of an ordinary word), and replaces remaining separators with spaces.
pub fn clean_business_name(domain: &str) -> String {
    let mut name = clean_domain(domain);

    for suffix in BUSINESS_SUFFIXES {
        let Some(rest) = name.strip_suffix(suffix) else {
            continue;
        };
        if let Some(stripped) = rest.strip_suffix(['-', '_']) {
            name = stripped.to_string();
            break;
        }
        // Without a separator only long suffixes are unambiguous:
        // "tobacco" must keep its "co" and "zinc" its "inc"
        if suffix.len() >= 4 && rest.len() >= 3 {
            name = rest.to_string();
            break;
        }
    }

    name.replace(['-', '_'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_www_and_path() {
        assert_eq!(normalize_domain("https://www.example.com/"), "example.com");
        assert_eq!(
            normalize_domain("http://example.com/some/path?q=1"),
            "example.com"
        );
        assert_eq!(normalize_domain("Example.COM"), "example.com");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "https://www.example.com/",
            "example.co.uk",
            "HTTP://WWW.Foo-Bar.com/path/",
            "acme.wixsite.com",
            "www.www.example.com",
        ];
        for input in inputs {
            let once = normalize_domain(input);
            assert_eq!(normalize_domain(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_domain(""), "");
    }

    #[test]
    fn test_normalize_strips_repeated_www() {
        assert_eq!(normalize_domain("www.www.example.com"), "example.com");
    }

    #[test]
    fn test_normalize_strips_site_builder_suffix() {
        assert_eq!(normalize_domain("acme.wordpress.com"), "acme");
        assert_eq!(normalize_domain("https://acme.squarespace.com/"), "acme");
    }

    #[test]
    fn test_clean_domain_simple_tld() {
        assert_eq!(clean_domain("example.com"), "example");
        assert_eq!(clean_domain("https://www.example.org/"), "example");
    }

    #[test]
    fn test_clean_domain_multi_part_tld() {
        assert_eq!(clean_domain("example.co.uk"), "example");
        assert_eq!(clean_domain("shop.com.au"), "shop");
        assert_eq!(clean_domain("example.org.uk"), "example");
    }

    #[test]
    fn test_clean_domain_no_tld() {
        assert_eq!(clean_domain("localhost"), "localhost");
    }

    #[test]
    fn test_clean_business_name_strips_suffix() {
        assert_eq!(clean_business_name("acme-ltd.com"), "acme");
        assert_eq!(clean_business_name("acme_llc.co.uk"), "acme");
        assert_eq!(clean_business_name("smithservices.com"), "smith");
    }

    #[test]
    fn test_clean_business_name_keeps_words_ending_in_short_suffixes() {
        assert_eq!(clean_business_name("tobacco.com"), "tobacco");
        assert_eq!(clean_business_name("zinc.com"), "zinc");
        assert_eq!(clean_business_name("disco.co.uk"), "disco");
    }

    #[test]
    fn test_clean_business_name_strips_short_suffix_after_separator() {
        assert_eq!(clean_business_name("acme-co.com"), "acme");
        assert_eq!(clean_business_name("acme-inc.com"), "acme");
    }

    #[test]
    fn test_clean_business_name_separators_become_spaces() {
        assert_eq!(clean_business_name("smith-and-sons.com"), "smith and sons");
        assert_eq!(clean_business_name("foo_bar.com"), "foo bar");
    }

    #[test]
    fn test_clean_business_name_plain_domain() {
        assert_eq!(clean_business_name("example.com"), "example");
    }
}
