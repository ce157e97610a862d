mod codechef;
mod codeforces;
mod common;
mod gfg;
mod leetcode;

pub use codechef::*;
pub use codeforces::*;
pub use common::*;
pub use gfg::*;
pub use leetcode::*;
