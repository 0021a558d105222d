//! Receipt tokens attached to provider orders.

use crate::domain::foundation::{CourseId, Timestamp, UserId};

/// Provider limit on receipt length.
pub const MAX_RECEIPT_LEN: usize = 40;

const ID_PREFIX_LEN: usize = 8;

/// Builds `rcpt_{course}_{user}_{unix_millis}`.
///
/// Ids are shortened to their first eight characters so the token stays
/// within the provider's receipt limit; the millisecond timestamp keeps
/// tokens distinct per attempt.
pub fn receipt_token(course_id: &CourseId, user_id: &UserId, at: Timestamp) -> String {
    let mut token = format!(
        "rcpt_{}_{}_{}",
        shorten(course_id.as_str()),
        shorten(user_id.as_str()),
        at.unix_millis()
    );
    token.truncate(MAX_RECEIPT_LEN);
    token
}

fn shorten(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(ID_PREFIX_LEN)
        .collect()
}
