//! Operator-facing run configuration.
//!
//! Every setting is a command-line flag with an environment-variable
//! fallback (`STAMPEDE_*`), read once at startup and immutable for the
//! run. The catalog document carries everything scenario-specific; this
//! is only the orchestration-level half: where the target is, how to
//! authenticate, which expectation profile is active, and how hard to
//! push.

use crate::plan::{InjectionProfile, ProtocolProfile};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Virtual-user concurrency strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InjectionMode {
    /// N concurrent users sustained for `--duration` seconds.
    Constant,
    /// 0 to N users over `--ramp` seconds, then `--hold` seconds steady.
    Ramp,
}

impl std::fmt::Display for InjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectionMode::Constant => write!(f, "constant"),
            InjectionMode::Ramp => write!(f, "ramp"),
        }
    }
}

/// Configuration for one load-test run.
#[derive(Debug, Clone, Args)]
pub struct RunConfig {
    /// Base URL of the target instance
    #[arg(long, env = "STAMPEDE_INSTANCE")]
    pub instance: String,

    /// Username for basic authentication
    #[arg(long, env = "STAMPEDE_USERNAME")]
    pub username: String,

    /// Password for basic authentication
    #[arg(long, env = "STAMPEDE_PASSWORD")]
    pub password: String,

    /// Target system version, matched against scenario version ranges
    #[arg(long, env = "STAMPEDE_VERSION", default_value_t = 0.0)]
    pub version: f64,

    /// Active expectation profile key
    #[arg(long, env = "STAMPEDE_PROFILE", default_value = "baseline")]
    pub profile: String,

    /// Run only the scenario whose query equals this value
    #[arg(long, env = "STAMPEDE_QUERY")]
    pub query: Option<String>,

    /// Catalog locator: bundled resource name or file path
    #[arg(long, env = "STAMPEDE_SCENARIO")]
    pub scenario: String,

    /// Directory of bundled scenario documents
    #[arg(long, env = "STAMPEDE_RESOURCES", default_value = "scenarios")]
    pub resources: PathBuf,

    /// Path requested once, unmeasured, before injection starts
    #[arg(long, env = "STAMPEDE_WARMUP")]
    pub warmup: Option<String>,

    /// Injection profile applied to every qualifying scenario
    #[arg(long, value_enum, default_value_t = InjectionMode::Constant)]
    pub injection: InjectionMode,

    /// Concurrent virtual users (ramp target when --injection ramp)
    #[arg(long, default_value_t = 1)]
    pub users: u32,

    /// Sustained injection duration in seconds (constant mode)
    #[arg(long, default_value_t = 15)]
    pub duration: u64,

    /// Ramp window in seconds (ramp mode)
    #[arg(long, default_value_t = 3)]
    pub ramp: u64,

    /// Steady-state hold in seconds after the ramp (ramp mode)
    #[arg(long, default_value_t = 20)]
    pub hold: u64,
}

impl RunConfig {
    /// The injection profile shared by every load unit this run builds.
    pub fn injection_profile(&self) -> InjectionProfile {
        match self.injection {
            InjectionMode::Constant => InjectionProfile::Constant {
                users: self.users,
                duration: Duration::from_secs(self.duration),
            },
            InjectionMode::Ramp => InjectionProfile::Ramp {
                users: self.users,
                ramp: Duration::from_secs(self.ramp),
                hold: Duration::from_secs(self.hold),
            },
        }
    }

    /// Build the shared protocol profile for this run.
    pub fn protocol_profile(&self) -> anyhow::Result<ProtocolProfile> {
        ProtocolProfile::new(&self.instance, &self.username, &self.password, self.warmup.clone())
    }
}
