// Controller error codes that mean the session or the credentials are bad.

pub const ERR_FORBIDDEN: i32 = -1005;
pub const ERR_LOGIN_REQUIRED: i32 = -1200;
pub const ERR_WRONG_CREDENTIALS: i32 = -30109;

pub fn is_auth_error(code: i32) -> bool {
    matches!(code, ERR_FORBIDDEN | ERR_LOGIN_REQUIRED | ERR_WRONG_CREDENTIALS)
}
