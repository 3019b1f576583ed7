// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type catalogs.

pub mod builtin;
pub mod custom;

use crate::node::NodeRegistry;

/// Registry with every built-in and user-defined node type
pub fn create_default_registry() -> NodeRegistry {
    let mut registry = builtin::create_builtin_registry();
    custom::register_custom_nodes(&mut registry);
    registry
}
