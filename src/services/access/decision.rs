//! The per-request access decision procedure.
//!
//! `decide` is deterministic and side-effect free apart from awaiting the
//! supplied role lookup. It never propagates a lookup error: every input
//! terminates in exactly one [`Decision`], and no error path ever allows
//! (fail closed).

use std::fmt;

use crate::services::access::role::Role;
use crate::services::access::route::RouteClass;
use crate::services::session::Identity;

/// Where denied visitors are sent.
pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Proof that a protected request was allowed through: who, and as what.
///
/// The middleware adapter turns this into the request-scoped auth context
/// handlers extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub user_id: String,
    pub role: Role,
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request through. `None` for public routes, `Some` when a
    /// protected route was granted to a resolved role.
    Allow(Option<Grant>),
    RedirectToLogin,
    /// Bare protected root canonicalized to the caller's role area
    /// (e.g. `/dashboard` -> `/dashboard/lecturer`). Carries the full target.
    RedirectToRoleHome(String),
    RedirectToUnauthorized,
}

impl Decision {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow(_) => None,
            Decision::RedirectToLogin => Some(LOGIN_PATH),
            Decision::RedirectToRoleHome(target) => Some(target),
            Decision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }
}

/// Decide whether this request may proceed.
///
/// `lookup` is the role lookup collaborator: given the resolved user id it
/// returns `Ok(Some(role))`, `Ok(None)` for a missing/unrecognized role
/// record, or an error. NotFound and errors are handled identically
/// (redirect to login); the distinction only matters for logging.
///
/// The caller owns timeout policy: wrap the lookup future before passing it
/// in and surface the timeout as an error.
pub async fn decide<F, Fut, E>(route: &RouteClass, identity: &Identity, lookup: F) -> Decision
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Option<Role>, E>>,
    E: fmt::Display,
{
    let (prefix, segment) = match route {
        RouteClass::Public => return Decision::Allow(None),
        RouteClass::Protected { prefix, segment } => (prefix, segment.as_deref()),
    };

    let user_id = match identity {
        Identity::Anonymous => return Decision::RedirectToLogin,
        Identity::User(id) => id.clone(),
    };

    let role = match lookup(user_id.clone()).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            tracing::debug!(user_id = %user_id, "no role assignment, denying");
            return Decision::RedirectToLogin;
        }
        Err(err) => {
            tracing::warn!(user_id = %user_id, error = %err, "role lookup failed, denying");
            return Decision::RedirectToLogin;
        }
    };

    match segment {
        None => Decision::RedirectToRoleHome(format!("{prefix}/{}", role.segment())),
        Some(s) if s != role.segment() => Decision::RedirectToUnauthorized,
        Some(_) => Decision::Allow(Some(Grant { user_id, role })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::access::route::classify;

    fn prefixes() -> Vec<String> {
        vec!["/dashboard".to_string()]
    }

    fn user(id: &str) -> Identity {
        Identity::User(id.to_string())
    }

    async fn decide_with_role(path: &str, identity: &Identity, role: Option<Role>) -> Decision {
        let route = classify(path, &prefixes());
        decide(&route, identity, |_id| async move {
            Ok::<_, std::convert::Infallible>(role)
        })
        .await
    }

    async fn decide_with_failure(path: &str, identity: &Identity) -> Decision {
        let route = classify(path, &prefixes());
        decide(&route, identity, |_id| async move {
            Err::<Option<Role>, _>("connection refused")
        })
        .await
    }

    #[tokio::test]
    async fn public_paths_always_allow() {
        for identity in [Identity::Anonymous, user("u1")] {
            for path in ["/", "/login", "/about", "/dashboard-help"] {
                assert_eq!(
                    decide_with_role(path, &identity, None).await,
                    Decision::Allow(None),
                    "{path:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn anonymous_on_protected_path_goes_to_login() {
        for path in ["/dashboard", "/dashboard/student", "/dashboard/admin/settings"] {
            let decision = decide_with_role(path, &Identity::Anonymous, Some(Role::Admin)).await;
            assert_eq!(decision, Decision::RedirectToLogin, "{path:?}");
            assert_eq!(decision.redirect_target(), Some("/login"));
        }
    }

    #[tokio::test]
    async fn missing_role_record_denies_not_allows() {
        let decision = decide_with_role("/dashboard/student", &user("u1"), None).await;
        assert_eq!(decision, Decision::RedirectToLogin);
    }

    #[tokio::test]
    async fn lookup_error_denies_not_allows() {
        for path in ["/dashboard", "/dashboard/student", "/dashboard/lecturer/x"] {
            assert_eq!(
                decide_with_failure(path, &user("u3")).await,
                Decision::RedirectToLogin,
                "{path:?}"
            );
        }
    }

    #[tokio::test]
    async fn bare_root_canonicalizes_to_role_home() {
        for role in Role::ALL {
            let decision = decide_with_role("/dashboard", &user("u1"), Some(role)).await;
            assert_eq!(
                decision,
                Decision::RedirectToRoleHome(format!("/dashboard/{}", role.segment()))
            );
        }
    }

    #[tokio::test]
    async fn segment_role_matrix() {
        // 4 matching pairs allow, 12 mismatches go to /unauthorized.
        for segment_role in Role::ALL {
            for actual_role in Role::ALL {
                let path = format!("/dashboard/{}", segment_role.segment());
                let decision = decide_with_role(&path, &user("u9"), Some(actual_role)).await;
                if segment_role == actual_role {
                    assert_eq!(
                        decision,
                        Decision::Allow(Some(Grant {
                            user_id: "u9".to_string(),
                            role: actual_role,
                        })),
                        "{segment_role} / {actual_role}"
                    );
                } else {
                    assert_eq!(
                        decision,
                        Decision::RedirectToUnauthorized,
                        "{segment_role} / {actual_role}"
                    );
                    assert_eq!(decision.redirect_target(), Some("/unauthorized"));
                }
            }
        }
    }

    #[tokio::test]
    async fn unknown_segment_is_a_mismatch_for_every_role() {
        for role in Role::ALL {
            assert_eq!(
                decide_with_role("/dashboard/archive", &user("u1"), Some(role)).await,
                Decision::RedirectToUnauthorized
            );
        }
    }

    #[tokio::test]
    async fn deeper_paths_only_check_the_first_segment() {
        let decision =
            decide_with_role("/dashboard/admin/settings", &user("u2"), Some(Role::Student)).await;
        assert_eq!(decision, Decision::RedirectToUnauthorized);

        let decision =
            decide_with_role("/dashboard/admin/settings", &user("u2"), Some(Role::Admin)).await;
        assert_eq!(
            decision,
            Decision::Allow(Some(Grant {
                user_id: "u2".to_string(),
                role: Role::Admin,
            }))
        );
    }

    #[tokio::test]
    async fn lecturer_scenario_from_bare_root() {
        let decision = decide_with_role("/dashboard", &user("U1"), Some(Role::Lecturer)).await;
        assert_eq!(decision.redirect_target(), Some("/dashboard/lecturer"));
    }

    #[tokio::test]
    async fn identical_inputs_yield_identical_decisions() {
        let first = decide_with_role("/dashboard/student", &user("u1"), Some(Role::Student)).await;
        let second = decide_with_role("/dashboard/student", &user("u1"), Some(Role::Student)).await;
        assert_eq!(first, second);
    }
}
