// SPDX-License-Identifier: MIT

pub mod cli;
pub mod config;
pub mod diff;
pub mod diff_color;
pub mod node_id;
pub mod panel;
pub mod render;
pub mod tree;
pub mod utils;
pub mod visibility;
