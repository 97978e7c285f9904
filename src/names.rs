//! Algorithm name normalization.
//!
//! Providers disagree on spelling and capitalization for the same algorithm,
//! so ledger entries are matched on a normalized key rather than on the
//! display name. The display fixer only ever changes letter case; any other
//! rewrite would stop future runs from matching the stored name.

const X509_ALIAS: &str = "X509";
const X509_CANONICAL: &str = "X.509";
const PKCS7_SUFFIX: &str = "/PKCS7PADDING";
const PKCS5_SUFFIX: &str = "/PKCS5PADDING";

// Applied in order, case-insensitively, without overlap.
const DISPLAY_FIXES: &[(&str, &str)] = &[("WITH", "with"), ("DESEDE", "DESede"), ("HMAC", "Hmac")];

/// Returns the comparison key for an algorithm name.
pub fn normalize_name(name: &str) -> String {
    let upper = name.to_uppercase();
    if upper == X509_ALIAS {
        return X509_CANONICAL.to_string();
    }
    match upper.strip_suffix(PKCS7_SUFFIX) {
        Some(stem) => format!("{stem}{PKCS5_SUFFIX}"),
        None => upper,
    }
}

/// Fixes capitalization of a freshly chosen display name, e.g.
/// `SHA256WITHRSA` becomes `SHA256withRSA` and `HMACSHA1` becomes `HmacSHA1`.
pub fn fix_display_name(name: &str) -> String {
    DISPLAY_FIXES
        .iter()
        .fold(name.to_string(), |acc, (pattern, replacement)| {
            replace_ignore_ascii_case(&acc, pattern, replacement)
        })
}

fn replace_ignore_ascii_case(haystack: &str, pattern: &str, replacement: &str) -> String {
    let bytes = haystack.as_bytes();
    let needle = pattern.as_bytes();
    let mut out = String::with_capacity(haystack.len());
    let mut idx = 0;
    while idx < haystack.len() {
        let end = idx + needle.len();
        if end <= bytes.len() && bytes[idx..end].eq_ignore_ascii_case(needle) {
            out.push_str(replacement);
            idx = end;
            continue;
        }
        // idx always sits on a char boundary: matches are pure ASCII.
        let Some(ch) = haystack[idx..].chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x509_spellings_share_a_key() {
        for name in ["x509", "X509", "X.509", "x.509"] {
            assert_eq!(normalize_name(name), "X.509");
        }
        assert_eq!(normalize_name("X509v3"), "X509V3");
    }

    #[test]
    fn pkcs7_padding_matches_pkcs5_padding() {
        assert_eq!(
            normalize_name("AES/CBC/PKCS7Padding"),
            normalize_name("AES/CBC/PKCS5Padding")
        );
        assert_eq!(normalize_name("aes/cbc/pkcs7padding"), "AES/CBC/PKCS5PADDING");
        assert_eq!(normalize_name("PKCS7PADDING"), "PKCS7PADDING");
    }

    #[test]
    fn normalization_is_case_insensitive() {
        assert_eq!(normalize_name("sha-1"), normalize_name("SHA-1"));
        assert_eq!(normalize_name("Sha-1"), "SHA-1");
    }

    #[test]
    fn display_fixer_only_touches_case() {
        assert_eq!(fix_display_name("SHA256WITHRSA"), "SHA256withRSA");
        assert_eq!(fix_display_name("SHA256WithRSA"), "SHA256withRSA");
        assert_eq!(fix_display_name("DESEDE/CBC/NOPADDING"), "DESede/CBC/NOPADDING");
        assert_eq!(fix_display_name("HMACSHA256"), "HmacSHA256");
        assert_eq!(fix_display_name("hmacsha256"), "Hmacsha256");
        assert_eq!(fix_display_name("PBEWITHHMACSHA1"), "PBEwithHmacSHA1");
        assert_eq!(fix_display_name("SHA-1"), "SHA-1");
        for name in ["SHA256WITHRSA", "DESEDEWRAP", "HMACMD5"] {
            assert!(fix_display_name(name).eq_ignore_ascii_case(name));
        }
    }

    #[test]
    fn display_fixer_keeps_non_ascii_intact() {
        assert_eq!(fix_display_name("ÄWITHÖ"), "ÄwithÖ");
    }
}
