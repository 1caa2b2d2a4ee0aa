//! Package mode
//!
//! - **builder**: package-builder offer and composition pricing
//! - **reconciler**: committing a composition to the selection

pub mod builder;
pub mod reconciler;

pub use builder::{PackageBuilder, PackageComposition, PackageOffer};
pub use reconciler::PackageReconciler;
