use contracts::system::users::User;
use leptos::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct UsersListState {
    pub items: Vec<User>,
    pub search_query: String,
    pub is_loaded: bool,
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}

/// Users whose employee number or name contains the query, ordered by
/// employee number
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    let query = query.trim().to_lowercase();
    let mut found: Vec<User> = users
        .iter()
        .filter(|u| {
            query.is_empty()
                || u.login.contains(&query)
                || u.display_name().to_lowercase().contains(&query)
        })
        .cloned()
        .collect();
    found.sort_by(|a, b| a.login.cmp(&b.login));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::CreateUserDto;

    fn user(login: &str, firstname: &str) -> User {
        User::new_for_insert(&CreateUserDto {
            login: login.into(),
            firstname: firstname.into(),
            lastname: "ใจดี".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_filter_users() {
        let users = vec![user("22222222", "สมหญิง"), user("11111111", "สมชาย")];

        let all = filter_users(&users, "  ");
        assert_eq!(all[0].login, "11111111");
        assert_eq!(all.len(), 2);

        assert_eq!(filter_users(&users, "2222").len(), 1);
        assert_eq!(filter_users(&users, "สมชาย")[0].login, "11111111");
        assert!(filter_users(&users, "xyz").is_empty());
    }
}
