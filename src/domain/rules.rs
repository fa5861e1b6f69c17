//! Capacity and uniqueness rules for activity signups.

use std::collections::HashSet;

/// Whether one more participant fits. `None` means unlimited.
pub fn has_room(max_participants: Option<u32>, current: u32) -> bool {
    match max_participants {
        Some(max) => current < max,
        None => true,
    }
}

/// First email that appears more than once in a signup list.
pub fn first_duplicate<'a, I>(emails: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    emails.into_iter().find(|e| !seen.insert(*e))
}
