//! Feature gates for embedding applications and tests

use std::collections::HashSet;

use strata_types::feature_gate::FeatureGate;

/// Entitlement to a fixed set of feature tags
#[derive(Debug, Clone, Default)]
pub struct StaticFeatures {
	tags: HashSet<String>,
}

impl StaticFeatures {
	pub fn new<I, S>(tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { tags: tags.into_iter().map(Into::into).collect() }
	}

	/// No feature is entitled
	pub fn none() -> Self {
		Self::default()
	}
}

impl FeatureGate for StaticFeatures {
	fn has_feature(&self, tag: &str) -> bool {
		self.tags.contains(tag)
	}
}

/// Every feature is entitled
#[derive(Debug, Clone, Copy, Default)]
pub struct AllFeatures;

impl FeatureGate for AllFeatures {
	fn has_feature(&self, _tag: &str) -> bool {
		true
	}
}


// vim: ts=4
