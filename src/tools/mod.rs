//! Built-in tool names that never need the virtual environment.
//!
//! These form the default allow-list when no configuration replaces it.

/// Names of built-in allow-listed tools.
pub mod names {
    /// npm package manager.
    pub const NPM: &str = "npm";
    /// npm package runner.
    pub const NPX: &str = "npx";
    /// Node.js runtime.
    pub const NODE: &str = "node";
    /// pnpm package manager.
    pub const PNPM: &str = "pnpm";
    /// Yarn package manager.
    pub const YARN: &str = "yarn";
    /// ESLint linter.
    pub const ESLINT: &str = "eslint";
    /// Prettier formatter.
    pub const PRETTIER: &str = "prettier";
    /// Commit message linter.
    pub const COMMITLINT: &str = "commitlint";
    /// Git hook manager.
    pub const HUSKY: &str = "husky";
    /// Git itself.
    pub const GIT: &str = "git";
}

/// Returns the built-in allow-list in match order.
#[must_use]
pub const fn defaults() -> &'static [&'static str] {
    &[
        names::NPM,
        names::NPX,
        names::NODE,
        names::PNPM,
        names::YARN,
        names::ESLINT,
        names::PRETTIER,
        names::COMMITLINT,
        names::HUSKY,
        names::GIT,
    ]
}

/// Returns true if a tool name is on the built-in allow-list.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    defaults().contains(&name)
}
