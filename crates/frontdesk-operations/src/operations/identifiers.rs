//! Business identifiers and login addresses.
//!
//! Neither generator checks for collisions: business identifiers rely on the
//! clock and a random tie-breaker, and login addresses on a scan of existing
//! addresses that can race with a concurrent run. The store's unique
//! constraints catch what slips through.

use chrono::{DateTime, Utc};
use frontdesk_core::{BusinessIdentifier, Clock, CoreError, LoginAddress};
use rand::{Rng, rng};

const SUFFIX_WIDTH: usize = 4;

/// `PREFIX + YYMMDD + last six digits of the epoch milliseconds + a random
/// two-digit tie-breaker`.
pub fn new_business_identifier(prefix: &str, clock: &dyn Clock) -> BusinessIdentifier {
    let tie_breaker: u8 = rng().random_range(0..100);
    business_identifier_at(prefix, clock.now(), tie_breaker)
}

/// Deterministic form of [`new_business_identifier`]. Tie-breakers above 99
/// wrap.
#[must_use]
pub fn business_identifier_at(
    prefix: &str,
    now: DateTime<Utc>,
    tie_breaker: u8,
) -> BusinessIdentifier {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    BusinessIdentifier::new(format!(
        "{prefix}{date}{millis:06}{tie:02}",
        date = now.format("%y%m%d"),
        tie = tie_breaker % 100,
    ))
}

/// First whitespace-separated token of `display_name`, lower-cased and
/// stripped to `[a-z0-9]`, or `fallback` if nothing is left.
#[must_use]
pub fn derive_login_base(display_name: &str, fallback: &str) -> String {
    let base: String = display_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    if base.is_empty() {
        fallback.to_string()
    } else {
        base
    }
}

/// The address after every numbered `base` address in `existing`:
/// `base` + the highest four-digit suffix plus one + `@domain`.
///
/// Only addresses of exactly the form `<base><4 digits>@<domain>` count, so
/// `asha12345@…` or `ashar0001@…` never raise the suffix for `asha`.
pub fn next_login_address(
    base: &str,
    domain: &str,
    existing: &[LoginAddress],
) -> Result<LoginAddress, CoreError> {
    let highest = existing
        .iter()
        .filter_map(|address| numbered_suffix(address, base, domain))
        .max()
        .unwrap_or(0);
    let local = format!("{base}{:0width$}", highest + 1, width = SUFFIX_WIDTH);
    LoginAddress::from_parts(&local, domain)
}

/// Matches `^<base>(\d{4})@<domain>$` and returns the digits as a number.
fn numbered_suffix(address: &LoginAddress, base: &str, domain: &str) -> Option<u32> {
    if !address.domain().eq_ignore_ascii_case(domain) {
        return None;
    }
    let local = address.local_part();
    let head = local.get(..base.len())?;
    if !head.eq_ignore_ascii_case(base) {
        return None;
    }
    let digits = &local[base.len()..];
    if digits.len() != SUFFIX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
