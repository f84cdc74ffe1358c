//! Skill and item effect resolution.
//!
//! [`resolve`] turns an [`EffectDefinition`] and the current participants into
//! an ordered list of [`Delta`]s without touching its inputs. The combat engine
//! applies the deltas and reports them as events.
mod delta;
mod error;
mod kinds;
mod resolver;

pub use delta::{Delta, DeltaKind};
pub use error::ResolveError;
pub use kinds::{Attribute, EffectDefinition, EffectKind, ResolutionMode};
pub use resolver::{ResolveContext, resolve, resolve_periodic, select_targets};
