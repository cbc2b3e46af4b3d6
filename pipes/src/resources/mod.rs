//! Managed resources
//!
//! Every entity kind is a `ResourceAdapter` wrapped in the generic
//! `Managed` lifecycle driver.

pub mod aggregator;
pub mod attrs;
pub mod common;
pub mod connection;
pub mod connection_folder;
pub mod datatank;
pub mod lifecycle;
pub mod member;
pub mod mod_variable;
pub mod mods;
pub mod notifier;
pub mod organization;
pub mod permission;
pub mod pipeline;
pub mod workspace;
pub mod workspace_schema;

use std::collections::HashMap;
use tfplug::provider::{ProviderResource, ResourceFactory};

use crate::api::mods::ModFlavor;
use aggregator::AggregatorAdapter;
use connection::{ConnectionAdapter, ConnectionFamily};
use connection_folder::{ConnectionFolderAdapter, FolderParent};
use datatank::{DatatankAdapter, DatatankTableAdapter};
use lifecycle::{Managed, ResourceAdapter};
use member::{MemberAdapter, MemberParent};
use mod_variable::ModVariableAdapter;
use mods::ModAdapter;
use notifier::{NotifierAdapter, NotifierParent};
use organization::OrganizationAdapter;
use permission::{PermissionAdapter, PermissionOwner, PermissionTarget};
use pipeline::PipelineAdapter;
use workspace::WorkspaceAdapter;
use workspace_schema::WorkspaceSchemaAdapter;

pub use pipeline::run_pipeline;

fn register<A, F>(factories: &mut HashMap<String, ResourceFactory>, make: F)
where
    A: ResourceAdapter,
    F: Fn() -> A + Send + Sync + 'static,
{
    let type_name = make().type_name().to_string();
    factories.insert(
        type_name,
        Box::new(move || -> Box<dyn ProviderResource> { Box::new(Managed::new(make())) }),
    );
}

/// Factories for every resource type, keyed by type name
pub fn factories() -> HashMap<String, ResourceFactory> {
    let mut factories = HashMap::new();

    register(&mut factories, || OrganizationAdapter);
    register(&mut factories, || WorkspaceAdapter);

    for parent in [
        MemberParent::Organization,
        MemberParent::OrganizationWorkspace,
        MemberParent::Workspace,
        MemberParent::Tenant,
    ] {
        register(&mut factories, move || MemberAdapter::new(parent));
    }

    for family in [
        ConnectionFamily::Identity,
        ConnectionFamily::Tenant,
        ConnectionFamily::Organization,
        ConnectionFamily::Workspace,
    ] {
        register(&mut factories, move || ConnectionAdapter::new(family));
    }

    for parent in [
        FolderParent::Tenant,
        FolderParent::Organization,
        FolderParent::Workspace,
    ] {
        register(&mut factories, move || ConnectionFolderAdapter::new(parent));
    }

    for owner in [PermissionOwner::Tenant, PermissionOwner::Organization] {
        for target in [PermissionTarget::Connection, PermissionTarget::Folder] {
            register(&mut factories, move || PermissionAdapter::new(owner, target));
        }
    }

    for flavor in [ModFlavor::Steampipe, ModFlavor::Flowpipe] {
        register(&mut factories, move || ModAdapter::new(flavor));
        register(&mut factories, move || ModVariableAdapter::new(flavor));
    }

    for parent in [NotifierParent::Tenant, NotifierParent::Workspace] {
        register(&mut factories, move || NotifierAdapter::new(parent));
    }

    register(&mut factories, || AggregatorAdapter);
    register(&mut factories, || DatatankAdapter);
    register(&mut factories, || DatatankTableAdapter);
    register(&mut factories, || PipelineAdapter);
    register(&mut factories, || WorkspaceSchemaAdapter);

    factories
}
