//! Feature-entitlement collaborator

use std::fmt::Debug;

/// Answers whether a licensed capability is available to this installation
pub trait FeatureGate: Debug + Send + Sync {
	fn has_feature(&self, tag: &str) -> bool;
}

// vim: ts=4
