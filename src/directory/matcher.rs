use crate::db::models::UserProfile;

/// Queries shorter than this never trigger a scan.
pub const MIN_QUERY_LEN: usize = 3;

pub fn query_is_searchable(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_LEN
}

/// Case-insensitive substring match over plate or name. No tokenization, no
/// ranking; matches keep directory insertion order.
pub fn search_directory(query: &str, directory: &[UserProfile]) -> Vec<UserProfile> {
    let needle = query.to_lowercase();
    directory
        .iter()
        .filter(|profile| {
            profile.vehicle_number.to_lowercase().contains(&needle)
                || profile.name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
