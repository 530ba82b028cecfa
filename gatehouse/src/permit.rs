//! Permission evaluation.
//!
//! A pure, synchronous function so admission decisions are deterministic and
//! testable without any runtime or collaborator in play.

use gatehouse_core::{Caller, CommandSpec, PermissionVerdict, Permissions};

/// Evaluates one caller against one command's requirements.
///
/// `is_operator` is the fixed allow-list membership; operators and callers
/// holding [`Permissions::ADMINISTRATOR`] pass unconditionally and carry the
/// elevated override (which also exempts them from cooldown charging).
///
/// Caller roles and caller permissions are ANY-of: holding one required
/// entry satisfies the gate, and an unrequired gate is vacuously satisfied.
/// Service permissions are ALL-of.
pub fn evaluate(
    caller: &Caller,
    service_permissions: Permissions,
    spec: &CommandSpec,
    is_operator: bool,
) -> PermissionVerdict {
    if is_operator || caller.permissions.contains(Permissions::ADMINISTRATOR) {
        return PermissionVerdict::elevated();
    }

    let required_roles = spec.required_roles();
    let holds_a_required_role = required_roles
        .iter()
        .any(|required| caller.roles.iter().any(|held| held == required));
    let missing_caller_roles = if required_roles.is_empty() || holds_a_required_role {
        Vec::new()
    } else {
        required_roles.to_vec()
    };

    let required_permissions = spec.required_caller_permissions();
    let missing_caller_permissions = if required_permissions.is_empty()
        || caller.permissions.intersects(required_permissions)
    {
        Vec::new()
    } else {
        required_permissions.names()
    };

    let missing_service = spec
        .required_service_permissions()
        .difference(service_permissions);

    let can_run = missing_caller_roles.is_empty()
        && missing_caller_permissions.is_empty()
        && missing_service.is_empty();

    PermissionVerdict {
        can_run,
        has_elevated_override: false,
        missing_caller_permissions,
        missing_caller_roles,
        missing_service_permissions: missing_service.names(),
    }
}

#[cfg(test)]
mod tests {
    use super::evaluate;
    use gatehouse_core::{Caller, CommandSpec, Permissions};
    use std::time::Duration;

    fn spec() -> CommandSpec {
        CommandSpec::builder("parse_run", "parse")
            .cooldown(Duration::from_secs(5))
            .require_role("Security")
            .require_role("Officer")
            .require_caller_permissions(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS)
            .require_service_permissions(Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS)
            .build()
    }

    fn full_service() -> Permissions {
        Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS
    }

    #[test]
    fn one_role_satisfies_the_any_of_gate() {
        let caller = Caller::new(1u64, "rook")
            .with_role("Officer")
            .with_permissions(Permissions::KICK_MEMBERS);
        let verdict = evaluate(&caller, full_service(), &spec(), false);
        assert!(verdict.can_run);
        assert!(!verdict.has_elevated_override);
        assert!(verdict.is_clean());
    }

    #[test]
    fn no_required_role_itemizes_all_of_them() {
        let caller = Caller::new(1u64, "rook").with_permissions(Permissions::KICK_MEMBERS);
        let verdict = evaluate(&caller, full_service(), &spec(), false);
        assert!(!verdict.can_run);
        assert_eq!(verdict.missing_caller_roles, vec!["Security", "Officer"]);
        assert!(verdict.missing_caller_permissions.is_empty());
    }

    #[test]
    fn one_permission_satisfies_the_any_of_gate() {
        let caller = Caller::new(1u64, "rook")
            .with_role("Security")
            .with_permissions(Permissions::BAN_MEMBERS);
        let verdict = evaluate(&caller, full_service(), &spec(), false);
        assert!(verdict.can_run);
    }

    #[test]
    fn service_permissions_are_all_of() {
        let caller = Caller::new(1u64, "rook")
            .with_role("Security")
            .with_permissions(Permissions::KICK_MEMBERS);
        let verdict = evaluate(&caller, Permissions::SEND_MESSAGES, &spec(), false);
        assert!(!verdict.can_run);
        assert_eq!(verdict.missing_service_permissions, vec!["EMBED_LINKS"]);
    }

    #[test]
    fn unrequired_gates_are_vacuously_satisfied() {
        let open = CommandSpec::builder("ping", "ping").build();
        let caller = Caller::new(1u64, "rook");
        let verdict = evaluate(&caller, Permissions::empty(), &open, false);
        assert!(verdict.can_run);
        assert!(verdict.is_clean());
    }

    #[test]
    fn operator_allow_list_overrides_everything() {
        let caller = Caller::new(1u64, "rook");
        let verdict = evaluate(&caller, Permissions::empty(), &spec(), true);
        assert!(verdict.can_run);
        assert!(verdict.has_elevated_override);
        assert!(verdict.is_clean());
    }

    #[test]
    fn administrator_carries_the_elevated_override() {
        let caller = Caller::new(1u64, "rook").with_permissions(Permissions::ADMINISTRATOR);
        let verdict = evaluate(&caller, Permissions::empty(), &spec(), false);
        assert!(verdict.can_run);
        assert!(verdict.has_elevated_override);
    }
}
