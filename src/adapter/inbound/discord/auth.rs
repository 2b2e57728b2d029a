//! Authorization for `/tag` interactions.

use tracing::warn;

/// Reply sent to members without the admin role.
pub const PERMISSION_DENIED: &str = "You do not have permission to run this command!";

/// Check whether a member holding `member_roles` may run the command.
///
/// Interactions outside a guild carry no member and are always rejected.
pub fn is_authorized(member_roles: Option<&[u64]>, admin_role: u64, user_id: u64) -> bool {
    if member_roles.is_some_and(|roles| roles.contains(&admin_role)) {
        return true;
    }

    warn!(user_id, "Ignoring tag command from member without admin role");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: u64 = 796_887_971_512_320_040;

    #[test]
    fn admin_role_is_authorized() {
        assert!(is_authorized(Some(&[1, ADMIN]), ADMIN, 7));
    }

    #[test]
    fn other_roles_are_rejected() {
        assert!(!is_authorized(Some(&[1, 2, 3]), ADMIN, 7));
        assert!(!is_authorized(Some(&[]), ADMIN, 7));
    }

    #[test]
    fn missing_member_is_rejected() {
        assert!(!is_authorized(None, ADMIN, 7));
    }
}
