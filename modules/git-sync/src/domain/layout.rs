use cc_security::Environment;
use uuid::Uuid;

/// Where a policy's source lives in the working copy: one file per
/// policy under its environment folder, plus a sidecar metadata file
/// carrying everything push/pull needs besides the raw source.
#[must_use]
pub fn policy_path(environment: Environment, id: Uuid) -> String {
    format!("policies/{}/{id}.policy", environment.as_str())
}

#[must_use]
pub fn metadata_path(id: Uuid) -> String {
    format!("metadata/{id}.json")
}

/// Recovers the policy id from a path produced by [`policy_path`].
/// Returns `None` for anything outside `policies/<env>/` or whose file
/// stem is not a UUID, both of which are treated as foreign files the
/// synchronizer leaves untouched.
#[must_use]
pub fn parse_policy_path(relative_path: &str) -> Option<(Environment, Uuid)> {
    let rest = relative_path.strip_prefix("policies/")?;
    let (env, file) = rest.split_once('/')?;
    let environment: Environment = env.parse().ok()?;
    let id = file.strip_suffix(".policy")?.parse().ok()?;
    Some((environment, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_path_round_trips_through_parse() {
        let id = Uuid::new_v4();
        let path = policy_path(Environment::Production, id);
        assert_eq!(parse_policy_path(&path), Some((Environment::Production, id)));
    }

    #[test]
    fn parse_rejects_files_outside_the_policies_tree() {
        assert_eq!(parse_policy_path("metadata/whatever.json"), None);
        assert_eq!(parse_policy_path("policies/sandbox/not-a-uuid.policy"), None);
        assert_eq!(parse_policy_path("README.md"), None);
    }
}
