//! GN build graph input.

pub mod desc;

pub use desc::{DescError, Descriptor, ExternalTarget, GnTargetType, PublicHeaders};
