//! GS1 identifier validation: EPC URN pattern matching, check-digit
//! arithmetic, and company-prefix extraction/authorization.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// The EPC scheme an identifier was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpcScheme {
    Sgtin,
    Sscc,
    Sgln,
    Grai,
    Giai,
}

impl EpcScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            EpcScheme::Sgtin => "sgtin",
            EpcScheme::Sscc => "sscc",
            EpcScheme::Sgln => "sgln",
            EpcScheme::Grai => "grai",
            EpcScheme::Giai => "giai",
        }
    }
}

struct Patterns {
    sgtin: Regex,
    sscc: Regex,
    sgln: Regex,
    grai: Regex,
    giai: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        sgtin: Regex::new(r"^urn:epc:id:sgtin:(\d+)\.(\d+)\.([A-Za-z0-9]{1,20})$").unwrap(),
        sscc: Regex::new(r"^urn:epc:id:sscc:(\d+)\.(\d+)$").unwrap(),
        sgln: Regex::new(r"^urn:epc:id:sgln:(\d+)\.(\d+)$").unwrap(),
        grai: Regex::new(r"^urn:epc:id:grai:(\d+)\.(\d+)$").unwrap(),
        giai: Regex::new(r"^urn:epc:id:giai:(\d+)\.(\d+)$").unwrap(),
    })
}

/// Computes the GS1 modulo-10 check digit for a digit string: walk the
/// string in reverse, weighting alternate digits 3 and 1.
pub fn calculate_gs1_check_digit(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let total: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            let multiplier = if i % 2 == 0 { 3 } else { 1 };
            digit * multiplier
        })
        .sum();
    Some((10 - (total % 10)) % 10)
}

/// Validates that the last digit of `full_number` is its GS1 check digit.
pub fn validate_gs1_check_digit(full_number: &str) -> bool {
    if full_number.is_empty() || !full_number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (body, last) = full_number.split_at(full_number.len() - 1);
    match calculate_gs1_check_digit(body) {
        Some(expected) => last == expected.to_string(),
        None => false,
    }
}

/// Returns the scheme an EPC URN matches, if any, without running the
/// scheme-specific post-checks `validate_epc_format` applies.
pub fn get_epc_type(epc: &str) -> Option<EpcScheme> {
    let p = patterns();
    if p.sgtin.is_match(epc) {
        Some(EpcScheme::Sgtin)
    } else if p.sscc.is_match(epc) {
        Some(EpcScheme::Sscc)
    } else if p.sgln.is_match(epc) {
        Some(EpcScheme::Sgln)
    } else if p.grai.is_match(epc) {
        Some(EpcScheme::Grai)
    } else if p.giai.is_match(epc) {
        Some(EpcScheme::Giai)
    } else {
        None
    }
}

/// Full EPC validation: pattern match plus the scheme-specific
/// post-check.
pub fn validate_epc_format(epc: &str) -> bool {
    let p = patterns();

    if let Some(caps) = p.sgtin.captures(epc) {
        // Pattern already anchors the serial to 1-20 alphanumerics.
        return caps.get(3).is_some();
    }
    if let Some(caps) = p.sscc.captures(epc) {
        let prefix = &caps[1];
        let rest = &caps[2];
        return prefix.len() + rest.len() == 17;
    }
    if let Some(caps) = p.sgln.captures(epc) {
        let number = format!("{}{}", &caps[1], &caps[2]);
        return validate_gs1_check_digit(&number);
    }
    if let Some(caps) = p.grai.captures(epc) {
        return caps[1].bytes().all(|b| b.is_ascii_digit())
            && caps[2].bytes().all(|b| b.is_ascii_digit());
    }
    if let Some(caps) = p.giai.captures(epc) {
        return caps[1].bytes().all(|b| b.is_ascii_digit())
            && caps[2].bytes().all(|b| b.is_ascii_digit());
    }
    false
}

/// Extracts the company prefix: the leftmost dot-segment of the 5th
/// colon-delimited field.
pub fn extract_company_prefix(epc: &str) -> Option<String> {
    let parts: Vec<&str> = epc.split(':').collect();
    if parts.len() < 5 {
        return None;
    }
    parts[4].split('.').next().map(str::to_string)
}

pub fn validate_company_prefix(epc: &str, authorized: &BTreeSet<String>) -> bool {
    match extract_company_prefix(epc) {
        Some(prefix) => authorized.contains(&prefix),
        None => false,
    }
}
