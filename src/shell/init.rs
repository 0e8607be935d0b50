//! Shell wrapper generation
//!
//! A child process can't change its parent's directory, so the binary only
//! prints a path. These wrappers run it and `cd` into that path on success,
//! or re-print the diagnostic and keep its exit status on failure.

use clap::ValueEnum;

/// Subcommands that get a `cd`-ing wrapper
pub const WRAPPED: [&str; 2] = ["locate", "clone"];

/// Shells with supported wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

fn posix_function(program: &str, sub: &str) -> String {
    // `status` is read-only in zsh
    format!(
        r#"{program}-{sub}() {{
    local out rc
    out="$(command {program} {sub} "$@")"
    rc=$?
    if [ $rc -eq 0 ]; then
        cd -- "$out"
    else
        [ -n "$out" ] && printf '%s\n' "$out"
        return $rc
    fi
}}
"#
    )
}

fn fish_function(program: &str, sub: &str) -> String {
    format!(
        r#"function {program}-{sub}
    set -l out (command {program} {sub} $argv)
    set -l rc $status
    if test $rc -eq 0
        cd $out
    else
        test -n "$out"; and printf '%s\n' $out
        return $rc
    end
end
"#
    )
}

/// Script defining `<program>-locate` and `<program>-clone` for `shell`
///
/// Intended for `eval "$(osbs init bash)"` or `osbs init fish | source`.
pub fn render(shell: Shell, program: &str) -> String {
    WRAPPED
        .iter()
        .map(|sub| match shell {
            Shell::Bash | Shell::Zsh => posix_function(program, sub),
            Shell::Fish => fish_function(program, sub),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
