//! Command families exposed through `cargo xtask`.

pub mod css;
