//! Network RBAC filter built from traffic permissions.
//!
//! Each permission becomes one ALLOW policy whose principals are the SPIFFE ids
//! of its source services, as presented in client certificates. Connections that
//! match no policy are rejected.

use std::collections::HashMap;

use envoy_types::pb::envoy::config::listener::v3::{filter::ConfigType, Filter};
use envoy_types::pb::envoy::config::rbac::v3::{
    permission::Rule, principal::Authenticated, principal::Identifier, rbac::Action, Permission,
    Policy, Principal, Rbac as RbacRules,
};
use envoy_types::pb::envoy::extensions::filters::network::rbac::v3::Rbac;
use envoy_types::pb::envoy::r#type::matcher::v3::{string_matcher::MatchPattern, StringMatcher};

use crate::domain::{Selector, TrafficPermission};
use crate::errors::Result;
use crate::sds::{Identity, SPIFFE_SCHEME};
use crate::xds::constants::{NETWORK_RBAC_FILTER, NETWORK_RBAC_TYPE_URL};
use crate::xds::typed::to_any;

const WILDCARD_SERVICE: &str = "*";

/// Build the RBAC filter guarding an inbound listener
pub fn build_rbac_filter(listener_name: &str, permissions: &[TrafficPermission]) -> Result<Filter> {
    let rbac = Rbac {
        rules: Some(rbac_rules(permissions)),
        stat_prefix: format!("{}.", listener_name),
        ..Default::default()
    };

    Ok(Filter {
        name: NETWORK_RBAC_FILTER.to_string(),
        config_type: Some(ConfigType::TypedConfig(to_any(NETWORK_RBAC_TYPE_URL, &rbac)?)),
    })
}

fn rbac_rules(permissions: &[TrafficPermission]) -> RbacRules {
    let policies: HashMap<String, Policy> = permissions
        .iter()
        .map(|permission| (permission.name.clone(), policy(permission)))
        .collect();

    RbacRules { action: Action::Allow as i32, policies, ..Default::default() }
}

fn policy(permission: &TrafficPermission) -> Policy {
    Policy {
        permissions: vec![Permission { rule: Some(Rule::Any(true)) }],
        principals: permission
            .sources
            .iter()
            .map(|source| principal(&permission.mesh, source))
            .collect(),
        ..Default::default()
    }
}

/// Authenticated principal for a source selector; `*` or no service tag matches
/// every identity in the mesh
fn principal(mesh: &str, source: &Selector) -> Principal {
    let match_pattern = match source.service_tag() {
        Some(service) if service != WILDCARD_SERVICE => {
            MatchPattern::Exact(Identity::new(mesh, service).spiffe_id())
        }
        _ => MatchPattern::Prefix(format!("{}{}/", SPIFFE_SCHEME, mesh)),
    };

    Principal {
        identifier: Some(Identifier::Authenticated(Authenticated {
            principal_name: Some(StringMatcher {
                match_pattern: Some(match_pattern),
                ..Default::default()
            }),
        })),
    }
}
