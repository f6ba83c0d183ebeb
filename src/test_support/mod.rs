//! Test utilities for gnport unit tests.
//!
//! Provides a builder for GN descriptors so tests can describe a target graph
//! without writing JSON by hand, plus source-tree fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use gnport::test_support::DescBuilder;
//!
//! let desc = DescBuilder::new()
//!     .source_set("//a:a", &["//a:b"], &["a/x.cc"])
//!     .source_set("//a:b", &[], &["a/y.h"])
//!     .build();
//! ```

pub mod fixtures;

use serde_json::{json, Map, Value};

use crate::gn::Descriptor;

pub use fixtures::*;

/// Builder for in-memory GN descriptors.
#[derive(Debug, Clone, Default)]
pub struct DescBuilder {
    targets: Map<String, Value>,
}

impl DescBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target of any GN type.
    pub fn target(mut self, label: &str, kind: &str, deps: &[&str], sources: &[&str]) -> Self {
        self.targets.insert(
            label.to_string(),
            json!({
                "deps": deps,
                "testonly": false,
                "type": kind,
                "sources": sources,
                "public": "*",
            }),
        );
        self
    }

    pub fn source_set(self, label: &str, deps: &[&str], sources: &[&str]) -> Self {
        self.target(label, "source_set", deps, sources)
    }

    pub fn executable(self, label: &str, deps: &[&str], sources: &[&str]) -> Self {
        self.target(label, "executable", deps, sources)
    }

    /// Replace the `public` list of an already added target.
    pub fn public(mut self, label: &str, headers: &[&str]) -> Self {
        if let Some(Value::Object(target)) = self.targets.get_mut(label) {
            target.insert("public".to_string(), json!(headers));
        }
        self
    }

    pub fn testonly(mut self, label: &str) -> Self {
        if let Some(Value::Object(target)) = self.targets.get_mut(label) {
            target.insert("testonly".to_string(), Value::Bool(true));
        }
        self
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.targets.clone()).to_string()
    }

    pub fn build(&self) -> Descriptor {
        Descriptor::from_json(&self.to_json()).expect("test descriptor must decode")
    }
}
