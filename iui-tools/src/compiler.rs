use std::env;
use std::fmt;

/// Compiler selection inputs, following the Kbuild `CROSS_COMPILE`/`CC`
/// conventions. Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerEnv {
    pub cross_compile: Option<String>,
    pub cc: Option<String>,
}

impl CompilerEnv {
    pub fn new(cross_compile: Option<String>, cc: Option<String>) -> Self {
        Self {
            cross_compile: cross_compile.filter(|s| !s.is_empty()),
            cc: cc.filter(|s| !s.is_empty()),
        }
    }

    /// Reads `CROSS_COMPILE` and `CC` from the process environment.
    pub fn from_env() -> Self {
        Self::new(env::var("CROSS_COMPILE").ok(), env::var("CC").ok())
    }

    /// The command line used to invoke the compiler.
    ///
    /// `CC` wins verbatim; otherwise the cross prefix gets `gcc` appended;
    /// otherwise the host `cc`.
    pub fn invocation(&self) -> String {
        match (&self.cc, &self.cross_compile) {
            (Some(cc), _) if !cc.is_empty() => cc.clone(),
            (_, Some(prefix)) if !prefix.is_empty() => format!("{prefix}gcc"),
            _ => "cc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilerFamily {
    Gcc,
    Clang,
    Emscripten,
    Unknown,
}

impl CompilerFamily {
    /// Ordered banner markers. Emscripten comes first since `emcc --version`
    /// also mentions clang.
    const MARKERS: &'static [(&'static str, CompilerFamily)] = &[
        ("emcc", CompilerFamily::Emscripten),
        ("clang", CompilerFamily::Clang),
        ("gcc", CompilerFamily::Gcc),
        ("free software foundation", CompilerFamily::Gcc),
    ];

    /// Classifies a `--version` banner. First matching marker wins.
    pub fn classify(banner: &str) -> Self {
        let lower = banner.to_lowercase();
        Self::MARKERS
            .iter()
            .find(|(marker, _)| lower.contains(marker))
            .map(|&(_, family)| family)
            .unwrap_or(CompilerFamily::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            CompilerFamily::Gcc => "GCC",
            CompilerFamily::Clang => "Clang",
            CompilerFamily::Emscripten => "Emscripten",
            CompilerFamily::Unknown => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != CompilerFamily::Unknown
    }

    /// Case-insensitive comparison against a family name given by the user.
    /// Names that are not families never match.
    pub fn matches(self, requested: &str) -> bool {
        self.name().eq_ignore_ascii_case(requested)
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
