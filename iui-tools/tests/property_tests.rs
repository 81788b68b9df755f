use iui_tools::{CompilerEnv, CompilerFamily};
use proptest::prelude::*;

/// Text that cannot contain any banner marker: no `c` rules out emcc, clang
/// and gcc, no `w` rules out "free software foundation".
const MARKER_FREE: &str = "[abd-vx-zABD-VX-Z0-9 .,()+/_-]{0,64}";

fn family() -> impl Strategy<Value = CompilerFamily> {
    prop_oneof![
        Just(CompilerFamily::Gcc),
        Just(CompilerFamily::Clang),
        Just(CompilerFamily::Emscripten),
        Just(CompilerFamily::Unknown),
    ]
}

proptest! {
    #[test]
    fn prop_cc_wins_over_cross_compile(
        cc in "[a-zA-Z0-9/_. -]{1,32}",
        cross in proptest::option::of("[a-zA-Z0-9_-]{0,24}"),
    ) {
        let env = CompilerEnv::new(cross, Some(cc.clone()));
        prop_assert_eq!(env.invocation(), cc);
    }

    #[test]
    fn prop_cross_compile_appends_gcc(prefix in "[a-zA-Z0-9/_.-]{1,32}") {
        let env = CompilerEnv::new(Some(prefix.clone()), None);
        prop_assert_eq!(env.invocation(), format!("{prefix}gcc"));

        let env = CompilerEnv::new(Some(prefix.clone()), Some(String::new()));
        prop_assert_eq!(env.invocation(), format!("{prefix}gcc"));
    }

    #[test]
    fn prop_emcc_beats_clang(
        head in MARKER_FREE,
        middle in MARKER_FREE,
        tail in MARKER_FREE,
        clang_first in any::<bool>(),
    ) {
        let banner = if clang_first {
            format!("{head}clang{middle}EMCC{tail}")
        } else {
            format!("{head}emcc{middle}Clang{tail}")
        };
        prop_assert_eq!(CompilerFamily::classify(&banner), CompilerFamily::Emscripten);
    }

    #[test]
    fn prop_clang_beats_gcc(head in MARKER_FREE, tail in MARKER_FREE) {
        let banner = format!("{head}gcc compatible clang{tail}");
        prop_assert_eq!(CompilerFamily::classify(&banner), CompilerFamily::Clang);
    }

    #[test]
    fn prop_no_marker_is_unknown(banner in MARKER_FREE) {
        prop_assert_eq!(CompilerFamily::classify(&banner), CompilerFamily::Unknown);
    }

    #[test]
    fn prop_matches_own_name_in_any_case(family in family(), upper in any::<bool>()) {
        let name = if upper {
            family.name().to_uppercase()
        } else {
            family.name().to_lowercase()
        };
        prop_assert!(family.matches(&name));
    }
}

#[test]
fn both_unset_is_cc() {
    assert_eq!(CompilerEnv::new(None, None).invocation(), "cc");
    assert_eq!(
        CompilerEnv::new(Some(String::new()), Some(String::new())).invocation(),
        "cc"
    );
}
