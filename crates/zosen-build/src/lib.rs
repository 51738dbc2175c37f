//! Zosen build orchestration
//!
//! This crate decides *what* to build and *in what order*: it resolves the
//! ordered list of image build targets (with a convention-based fallback),
//! applies skip and pull-policy rules, maintains the run-scoped build
//! context, and drives build-then-tag sequencing against a Docker daemon.

pub mod archive;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod policy;
pub mod resolver;
pub mod service;

pub use context::{BuildContext, TIMESTAMP_MARKER};
pub use error::{BuildError, BuildResult};
pub use orchestrator::{BuildOrchestrator, RunConfig};
pub use policy::resolve_pull_policy;
pub use resolver::{ImageTarget, TargetResolver};
pub use service::{BuildService, DockerBuildService, split_image_name, validate_tag};
