//! `dpo hpwl`: print the total half-perimeter wirelength of a design.

use dpo_place::Design;

use crate::pipeline::resolve_settings;
use crate::{DesignArg, GlobalArgs};

/// Runs the `dpo hpwl` command.
pub fn run(args: &DesignArg, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = resolve_settings(args.design.as_deref(), global)?;
    println!("{}", design_hpwl(&Design::load(&settings.design)?));
    Ok(0)
}

/// Total HPWL over every net.
pub fn design_hpwl(design: &Design) -> i64 {
    dpo_network::total_hpwl(&design.network)
}
