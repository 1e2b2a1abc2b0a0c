//! `bazel info` keys

/// Keys accepted by `bazel info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    // Configuration-independent
    Release,
    Workspace,
    InstallBase,
    OutputBase,
    ExecutionRoot,
    OutputPath,
    ServerPid,
    ServerLog,
    CommandLog,
    UsedHeapSize,
    CommittedHeapSize,
    MaxHeapSize,
    GcTime,
    GcCount,
    PackagePath,

    // Configuration-specific
    BazelBin,
    BazelTestlogs,
    BazelGenfiles,
}

impl InfoKey {
    /// The key as passed on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Workspace => "workspace",
            Self::InstallBase => "install_base",
            Self::OutputBase => "output_base",
            Self::ExecutionRoot => "execution_root",
            Self::OutputPath => "output_path",
            Self::ServerPid => "server_pid",
            Self::ServerLog => "server_log",
            Self::CommandLog => "command_log",
            Self::UsedHeapSize => "used-heap-size",
            Self::CommittedHeapSize => "committed-heap-size",
            Self::MaxHeapSize => "max-heap-size",
            Self::GcTime => "gc-time",
            Self::GcCount => "gc-count",
            Self::PackagePath => "package_path",
            Self::BazelBin => "bazel-bin",
            Self::BazelTestlogs => "bazel-testlogs",
            Self::BazelGenfiles => "bazel-genfiles",
        }
    }
}
