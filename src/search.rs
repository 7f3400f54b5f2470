use crate::model::User;

/// Keep the users whose name contains `term`, ignoring case.
///
/// An empty term keeps everything. Arrival order is preserved.
pub fn filter_by_name<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    if term.is_empty() {
        return users.iter().collect();
    }
    let q = term.to_lowercase();
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&q))
        .collect()
}
