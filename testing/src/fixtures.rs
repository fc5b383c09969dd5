use note_core::{AuthContext, AuthUser, NoteDraft, UserId};
use std::sync::atomic::{AtomicU32, Ordering};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub const TEST_PROJECT: &str = "testproj";
pub const TEST_AUTH_COOKIE: &str = "sb-testproj-auth-token";
pub const TEST_SESSION_COOKIE: &str = "sb-testproj-session";

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

pub fn unique_user_id() -> UserId {
    UserId::new(unique_id("test-user")).expect("valid test user id")
}

/// Identity for `user_id` with an access token derived from it.
pub fn auth_context(user_id: &str) -> AuthContext {
    AuthContext::new(
        AuthUser {
            id: UserId::new(user_id.to_string()).expect("valid test user id"),
            email: Some(format!("{user_id}@example.com"))
        },
        format!("token-{user_id}")
    )
}

pub fn draft(title: &str, content: &str) -> NoteDraft {
    NoteDraft {
        title: title.to_string(),
        content: content.to_string()
    }
}

/// Content long enough to be summarized.
pub const SUMMARIZABLE_TEXT: &str = "Quarterly planning: hire two engineers, move the launch \
                                     to March and cut the hosting bill by a fifth.";
