//! Naming, sweep expansion and provenance utilities for reproducible runs.

mod expand;
mod produce;
mod savename;
mod tag;

pub use expand::{count, expand, Expansion};
pub use produce::{produce_or_load, Origin, ProduceOptions, Produced};
pub use savename::{render_value, savename, NamingPolicy, MAX_DIGITS};
pub use tag::{tag, tagsave, CommitSource, GitRepo, COMMIT_FIELD, DIRTY_SUFFIX};
