//! Read-only data sources

pub mod integration;
pub mod lookup;
pub mod process;
pub mod tenant;
pub mod workspace;

use std::collections::HashMap;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::DataSourceFactory;

use integration::{IntegrationLookup, IntegrationOwner};
use lookup::{Lookup, LookupAdapter};
use process::ProcessLookup;
use tenant::TenantLookup;
use workspace::WorkspaceLookup;

fn register<A, F>(factories: &mut HashMap<String, DataSourceFactory>, make: F)
where
    A: LookupAdapter,
    F: Fn() -> A + Send + Sync + 'static,
{
    let type_name = make().type_name().to_string();
    factories.insert(
        type_name,
        Box::new(move || -> Box<dyn DataSourceWithConfigure> { Box::new(Lookup::new(make())) }),
    );
}

/// Factories for every data source type, keyed by type name
pub fn factories() -> HashMap<String, DataSourceFactory> {
    let mut factories = HashMap::new();

    register(&mut factories, || TenantLookup);
    register(&mut factories, || WorkspaceLookup);
    register(&mut factories, || ProcessLookup);
    for owner in [
        IntegrationOwner::Identity,
        IntegrationOwner::Tenant,
        IntegrationOwner::User,
    ] {
        register(&mut factories, move || IntegrationLookup::new(owner));
    }

    factories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_sources_are_registered_by_type_name() {
        let factories = factories();
        let mut names: Vec<_> = factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "pipes_integration",
                "pipes_process",
                "pipes_tenant",
                "pipes_tenant_integration",
                "pipes_user_integration",
                "pipes_workspace",
            ]
        );
    }
}
