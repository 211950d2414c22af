use web_sys::window;

// The only two entries the dashboard keeps in localStorage
const ACCESS_TOKEN_KEY: &str = "auth_access_token";
const EMPLOYEE_NO_KEY: &str = "auth_employee_no";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save the session of a successful login
pub fn save_session(access_token: &str, employee_no: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, access_token);
        let _ = storage.set_item(EMPLOYEE_NO_KEY, employee_no);
    }
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?.get_item(ACCESS_TOKEN_KEY).ok()?
}

/// Employee number of the last login, used to pre-fill the login page
pub fn get_employee_no() -> Option<String> {
    get_local_storage()?.get_item(EMPLOYEE_NO_KEY).ok()?
}

/// Forget the session
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(EMPLOYEE_NO_KEY);
    }
}
